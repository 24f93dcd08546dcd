//! Name to component type registry

use crate::component_type::ComponentType;
use atomic_core::{AtomicError, Result};
use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Registry of component types, keyed by the name children are added under
#[derive(Default, Clone)]
pub struct ComponentRegistry {
    types: HashMap<String, Arc<dyn ComponentType>>,
}

impl ComponentRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type under a name. A later registration for the same name wins.
    pub fn register(&mut self, name: impl Into<String>, ty: impl ComponentType + 'static) -> &mut Self {
        self.register_shared(name, Arc::new(ty))
    }

    /// Register an already shared type
    pub fn register_shared(&mut self, name: impl Into<String>, ty: Arc<dyn ComponentType>) -> &mut Self {
        let name = name.into();
        if self.types.insert(name.clone(), ty).is_some() {
            warn!("Component '{}' re-registered; the previous type is replaced", name);
        } else {
            debug!("Registered component '{}'", name);
        }
        self
    }

    /// Register a batch of types, entry by entry
    pub fn register_all<N, I>(&mut self, entries: I) -> &mut Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Arc<dyn ComponentType>)>,
    {
        for (name, ty) in entries {
            self.register_shared(name, ty);
        }
        self
    }

    /// Check whether a name is registered
    pub fn has(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Look up the type registered under a name
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn ComponentType>> {
        self.types
            .get(name)
            .cloned()
            .ok_or_else(|| AtomicError::UnknownComponent(name.to_string()))
    }

    /// List all registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component_type::{Composite, View};
    use crate::component::Component;

    struct Fixed(&'static str);

    impl ComponentType for Fixed {
        fn view(&self, _component: &Component) -> View {
            View::Markup(self.0.to_string())
        }

        fn description(&self) -> Option<&str> {
            Some(self.0)
        }
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = ComponentRegistry::new();
        registry.register("badge", Fixed("first"));
        registry.register("badge", Fixed("second"));

        let ty = registry.resolve("badge").unwrap();
        assert_eq!(ty.description(), Some("second"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = ComponentRegistry::new();
        assert!(!registry.has("missing"));
        assert!(matches!(
            registry.resolve("missing"),
            Err(AtomicError::UnknownComponent(name)) if name == "missing"
        ));
    }

    #[test]
    fn test_register_all() {
        let section: Arc<dyn ComponentType> = Arc::new(Composite);
        let label: Arc<dyn ComponentType> = Arc::new(Fixed("label"));
        let replacement: Arc<dyn ComponentType> = Arc::new(Fixed("override"));
        let entries = vec![("section", section), ("label", label), ("section", replacement)];

        let mut registry = ComponentRegistry::new();
        registry.register_all(entries);

        assert_eq!(registry.names(), vec!["label", "section"]);
        assert_eq!(registry.resolve("section").unwrap().description(), Some("override"));
    }
}
