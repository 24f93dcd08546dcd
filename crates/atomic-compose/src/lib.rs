//! Atomic Compose - Component tree composition engine
//!
//! Entities run an action that assembles a tree of components by name. The
//! tree is validated top-down, fail-fast, and rendered either through an
//! external template renderer or as the concatenation of its children.
//!
//! ```
//! use atomic_compose::{Composite, EntityType, Factory};
//! use atomic_core::props;
//!
//! let factory = Factory::builder()
//!     .component("section", Composite)
//!     .entity(EntityType::new("Home").action("show", |root, _data| {
//!         root.add_child("section", props! { "id" => "main" })?;
//!         Ok(())
//!     }))
//!     .build();
//!
//! let mut entity = factory.make("Home@show", None).unwrap();
//! let root = entity.execute().unwrap().component().unwrap();
//! assert_eq!(root.child_count(), 1);
//! ```

mod builder;
mod component;
mod component_type;
mod config;
mod entity;
mod factory;
mod global;
mod registry;
mod render;

pub use builder::Builder;
pub use component::{BuildFn, Children, Component, ComponentArgs};
pub use component_type::{ComponentType, Composite, View};
pub use config::{
    AtomicConfig, ComponentDefinition, DeclaredComponent, EntityDefinition, NodeDefinition,
    NodeSpec, Settings,
};
pub use entity::{Action, Entity, EntityType};
pub use factory::{Factory, FactoryBuilder, DEFAULT_ENTITY_VIEW};
pub use global::{atomic, install, installed};
pub use registry::ComponentRegistry;
pub use render::{ComponentContext, EntityContext, ViewRenderer};
