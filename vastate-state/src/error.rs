//! Error types for state containers.

use thiserror::Error;
use vastate_schema::SchemaError;

/// Result type for state operations.
pub type StateResult<T> = Result<T, StateError>;

/// Errors raised by [`EntityState`](crate::EntityState) operations.
#[derive(Debug, Error)]
pub enum StateError {
    /// A schema-dependent operation was called on a disabled container.
    #[error("state is disabled: no schema bound")]
    Disabled,

    /// The path is not a declared field of the entity.
    #[error("field {0:?} is not declared")]
    UndeclaredField(String),

    #[error("no classification for {0:?}")]
    MetaNotFound(String),

    /// The value at `path` has a different type than the accessor expects.
    #[error("type mismatch at {path:?}: expected {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    /// A float64 read as int64 has a fractional part.
    #[error("value at {path:?} is not a whole number: {value}")]
    NotWholeNumber { path: String, value: f64 },

    #[error(transparent)]
    Types(#[from] vastate_types::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl From<vastate_types::PathParseError> for StateError {
    fn from(e: vastate_types::PathParseError) -> Self {
        Self::Types(e.into())
    }
}
