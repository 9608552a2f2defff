//! Error types for the schema layer.

use thiserror::Error;

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors raised while describing, introspecting or loading schemas.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Malformed attribute declaration.
    #[error("invalid attribute {path:?}: {reason}")]
    InvalidAttribute { path: String, reason: String },

    /// Classification flags that cannot hold together.
    #[error("conflicting flags on {path:?}: {reason}")]
    ConflictingFlags { path: String, reason: String },

    #[error("entity {0:?} is registered more than once")]
    DuplicateEntity(String),

    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    /// TOML configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Type(#[from] vastate_types::Error),
}
