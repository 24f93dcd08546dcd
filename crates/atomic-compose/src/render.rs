//! Template renderer contract

use crate::component::Component;
use crate::entity::Entity;
use atomic_core::{Props, Result};

/// Context handed to the renderer for a component with a template view
#[derive(Debug)]
pub struct ComponentContext<'a> {
    pub component: &'a Component,
    pub properties: Props,
}

/// Context handed to the renderer for an entity.
///
/// The builder itself does not outlive `execute`; `validated` is what it
/// leaves behind, the number of components it checked.
#[derive(Debug)]
pub struct EntityContext<'a> {
    pub entity: &'a Entity,
    pub component: &'a Component,
    pub data: &'a Props,
    pub validated: usize,
}

/// External template engine that turns a view name and a context into markup
pub trait ViewRenderer {
    fn render_component(&self, view: &str, ctx: &ComponentContext<'_>) -> Result<String>;

    fn render_entity(&self, view: &str, ctx: &EntityContext<'_>) -> Result<String>;
}
