//! Error types for Atomic

use thiserror::Error;

/// The main error type for Atomic operations
#[derive(Debug, Error)]
pub enum AtomicError {
    #[error("Unable to find component {0}")]
    UnknownComponent(String),

    #[error("Call to undefined method Component::{0}()")]
    UndefinedOperation(String),

    #[error("No entity action provided in reference '{0}'")]
    InvalidReference(String),

    #[error("Unknown entity type: {0}")]
    UnknownEntity(String),

    #[error("Entity {entity} has no action '{action}'")]
    UnknownAction { entity: String, action: String },

    #[error("Invalid props on {component}: {}", .messages.join(", "))]
    PropValidation {
        component: String,
        messages: Vec<String>,
    },

    #[error("Prop '{prop}' has the wrong shape: {message}")]
    PropType { prop: String, message: String },

    #[error("Component {0} is already attached to a parent")]
    AlreadyAttached(String),

    #[error("Entity has not been executed")]
    NotExecuted,

    #[error("Render error: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Rule parse error: {0}")]
    RuleParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("No factory installed; call atomic_compose::install first")]
    FactoryNotInstalled,
}

/// Result type alias for Atomic operations
pub type Result<T> = std::result::Result<T, AtomicError>;

impl From<toml::de::Error> for AtomicError {
    fn from(err: toml::de::Error) -> Self {
        AtomicError::TomlParse(err.to_string())
    }
}
