//! Process-wide convenience entry point

use crate::entity::Entity;
use crate::factory::Factory;
use atomic_core::{AtomicError, Result};
use std::sync::OnceLock;

static FACTORY: OnceLock<Factory> = OnceLock::new();

/// Install the factory used by [`atomic`]. Can only happen once per process.
pub fn install(factory: Factory) -> Result<()> {
    FACTORY
        .set(factory)
        .map_err(|_| AtomicError::Config("a factory is already installed".to_string()))
}

/// The installed factory, if any
pub fn installed() -> Option<&'static Factory> {
    FACTORY.get()
}

/// Make an entity through the installed factory
pub fn atomic(reference: &str, action: Option<&str>) -> Result<Entity> {
    FACTORY
        .get()
        .ok_or(AtomicError::FactoryNotInstalled)?
        .make(reference, action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityType;

    // The only test that touches the process-wide factory.
    #[test]
    fn test_install_and_make() {
        assert!(matches!(atomic("Page@show", None), Err(AtomicError::FactoryNotInstalled)));

        let factory = Factory::builder()
            .entity(EntityType::new("Page").action("show", |_, _| Ok(())))
            .build();
        install(factory.clone()).unwrap();

        let mut entity = atomic("Page@show", None).unwrap();
        assert!(entity.execute().is_ok());
        assert!(installed().is_some());
        assert!(matches!(install(factory), Err(AtomicError::Config(_))));
    }
}
