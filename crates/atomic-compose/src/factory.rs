//! Entity factory and startup wiring

use crate::component::Component;
use crate::component_type::ComponentType;
use crate::config::AtomicConfig;
use crate::entity::{Entity, EntityType};
use crate::registry::ComponentRegistry;
use atomic_core::{AtomicError, Result};
use atomic_schema::{PropValidator, SchemaValidator};
use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Default view used to render entities
pub const DEFAULT_ENTITY_VIEW: &str = "atomic::entity";

struct Shared {
    components: ComponentRegistry,
    entities: HashMap<String, Arc<EntityType>>,
    validator: Box<dyn PropValidator>,
    entity_view: String,
}

/// Makes entities from `Type@action` references.
///
/// Cloning is cheap; every clone shares the same read-only registries.
#[derive(Clone)]
pub struct Factory {
    shared: Arc<Shared>,
}

impl Factory {
    pub fn builder() -> FactoryBuilder {
        FactoryBuilder::new()
    }

    /// Make a new, unexecuted entity.
    ///
    /// Without an explicit action the reference must read `Type@action`.
    pub fn make(&self, reference: &str, action: Option<&str>) -> Result<Entity> {
        let (entity, action) = match action {
            Some(action) => (reference, action),
            None => reference
                .split_once('@')
                .ok_or_else(|| AtomicError::InvalidReference(reference.to_string()))?,
        };

        if entity.is_empty() || action.is_empty() {
            return Err(AtomicError::InvalidReference(reference.to_string()));
        }

        let ty = self
            .shared
            .entities
            .get(entity)
            .cloned()
            .ok_or_else(|| AtomicError::UnknownEntity(entity.to_string()))?;

        debug!("Made entity {}@{}", entity, action);
        Ok(Entity::new(self.clone(), ty, action.to_string()))
    }

    /// A fresh, empty root component bound to this factory
    pub fn root(&self) -> Component {
        Component::root(self.clone())
    }

    pub fn components(&self) -> &ComponentRegistry {
        &self.shared.components
    }

    pub fn validator(&self) -> &dyn PropValidator {
        self.shared.validator.as_ref()
    }

    pub fn entity_view(&self) -> &str {
        &self.shared.entity_view
    }

    pub fn has_entity(&self, name: &str) -> bool {
        self.shared.entities.contains_key(name)
    }

    pub fn entity_type(&self, name: &str) -> Option<&EntityType> {
        self.shared.entities.get(name).map(Arc::as_ref)
    }

    /// List all entity type names, sorted
    pub fn entity_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.shared.entities.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("components", &self.shared.components)
            .field("entities", &self.entity_names())
            .field("entity_view", &self.shared.entity_view)
            .finish()
    }
}

/// Collects registrations at startup; [`build`](Self::build) freezes them.
pub struct FactoryBuilder {
    components: ComponentRegistry,
    entities: HashMap<String, Arc<EntityType>>,
    validator: Box<dyn PropValidator>,
    entity_view: String,
}

impl Default for FactoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FactoryBuilder {
    pub fn new() -> Self {
        Self {
            components: ComponentRegistry::new(),
            entities: HashMap::new(),
            validator: Box::new(SchemaValidator),
            entity_view: DEFAULT_ENTITY_VIEW.to_string(),
        }
    }

    /// Register a component type
    pub fn component(mut self, name: impl Into<String>, ty: impl ComponentType + 'static) -> Self {
        self.components.register(name, ty);
        self
    }

    /// Replace the component registry wholesale
    pub fn components(mut self, registry: ComponentRegistry) -> Self {
        self.components = registry;
        self
    }

    /// Register an entity type. A later registration for the same name wins.
    pub fn entity(mut self, ty: EntityType) -> Self {
        debug!("Registered entity '{}'", ty.name());
        self.entities.insert(ty.name().to_string(), Arc::new(ty));
        self
    }

    pub fn validator(mut self, validator: impl PropValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    pub fn entity_view(mut self, view: impl Into<String>) -> Self {
        self.entity_view = view.into();
        self
    }

    /// Register everything declared in a configuration document
    pub fn configure(mut self, config: &AtomicConfig) -> Result<Self> {
        self.components.register_all(config.component_types()?);
        for ty in config.entity_types()? {
            self = self.entity(ty);
        }
        if let Some(view) = &config.atomic.entity_view {
            self.entity_view = view.clone();
        }
        Ok(self)
    }

    pub fn build(self) -> Factory {
        Factory {
            shared: Arc::new(Shared {
                components: self.components,
                entities: self.entities,
                validator: self.validator,
                entity_view: self.entity_view,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component_type::Composite;

    fn make_factory() -> Factory {
        Factory::builder()
            .component("section", Composite)
            .entity(EntityType::new("Foo").action("bar", |_, _| Ok(())))
            .build()
    }

    #[test]
    fn test_make_from_reference() {
        let entity = make_factory().make("Foo@bar", None).unwrap();
        assert_eq!(entity.entity_name(), "Foo");
        assert_eq!(entity.action(), "bar");
        assert!(!entity.is_executed());
    }

    #[test]
    fn test_make_with_explicit_action() {
        let entity = make_factory().make("Foo", Some("bar")).unwrap();
        assert_eq!(entity.action(), "bar");
    }

    #[test]
    fn test_reference_without_action() {
        assert!(matches!(
            make_factory().make("Foo", None),
            Err(AtomicError::InvalidReference(r)) if r == "Foo"
        ));
        assert!(matches!(
            make_factory().make("Foo@", None),
            Err(AtomicError::InvalidReference(_))
        ));
    }

    #[test]
    fn test_splits_on_first_separator() {
        let factory = Factory::builder()
            .entity(EntityType::new("Foo").action("bar@baz", |_, _| Ok(())))
            .build();
        let entity = factory.make("Foo@bar@baz", None).unwrap();
        assert_eq!(entity.action(), "bar@baz");
    }

    #[test]
    fn test_unknown_entity() {
        assert!(matches!(
            make_factory().make("Nope@bar", None),
            Err(AtomicError::UnknownEntity(name)) if name == "Nope"
        ));
    }

    #[test]
    fn test_make_returns_fresh_entities() {
        let factory = make_factory();
        let mut first = factory.make("Foo@bar", None).unwrap();
        first.execute().unwrap();
        let second = factory.make("Foo@bar", None).unwrap();
        assert!(first.is_executed());
        assert!(!second.is_executed());
    }

    #[test]
    fn test_defaults() {
        let factory = make_factory();
        assert_eq!(factory.entity_view(), DEFAULT_ENTITY_VIEW);
        assert!(factory.components().has("section"));
        assert!(factory.has_entity("Foo"));
        assert_eq!(factory.entity_names(), vec!["Foo"]);
    }

    #[test]
    fn test_factory_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Factory>();
    }
}
