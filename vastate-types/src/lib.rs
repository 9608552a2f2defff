//! Core type definitions for the vastate entity state model.
//!
//! This crate defines the typed value model shared by the schema and state
//! crates:
//! - [`AttrType`] — the closed attribute type lattice (scalars, list, set, map, object)
//! - [`AttrValue`] — a typed value that is Null, Unknown or Known
//! - [`RawValue`] / [`Record`] — the loosely-typed payload exchanged with the remote API
//! - [`AttrPath`] — dotted/indexed paths (`spec.items[2].name`) and their resolution
//! - [`lift`] / [`lower`] — recursive conversion between raw and typed values
//!
//! Nothing here knows about schemas or field classification; that lives in
//! `vastate-schema` and `vastate-state`.

mod attr_type;
mod convert;
mod path;
mod raw;
mod value;

pub use attr_type::AttrType;
pub use convert::{is_whole, lift, lift_at, lift_record, lower, lower_record};
pub use path::{AttrPath, PathParseError, PathSegment, resolve, resolve_mut};
pub use raw::{RawValue, Record, record_from_json, record_to_pretty_json, update_record};
pub use value::{AttrValue, ValueState};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting, building or addressing values.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A raw value does not fit the declared attribute type.
    #[error("conversion error at {path:?}: expected {expected}, got {actual}")]
    Conversion {
        path: String,
        expected: String,
        actual: String,
    },

    /// A typed value was combined with a container of a different type.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("invalid path: {0}")]
    PathParse(#[from] PathParseError),

    /// Path lookup failed; `path` is the offending sub-path.
    #[error("cannot resolve {path:?}: {reason}")]
    PathResolution { path: String, reason: String },

    #[error("invalid type expression: {0}")]
    TypeParse(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
