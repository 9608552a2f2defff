//! Schema layer for the vastate entity state model.
//!
//! An [`EntitySchema`] declares the attributes of one remote entity kind.
//! Together with its [`StateHints`] it is introspected once into a flat
//! type map and a [`FieldMeta`] map keyed by dotted path, and the result is
//! held in an immutable [`Registry`] shared by every state container.
//!
//! Schemas are usually declared programmatically, but can also be loaded from
//! a TOML file through [`RegistryConfig`].

mod config;
mod error;
mod hints;
mod introspect;
mod meta;
mod registry;
mod schema;
mod visualize;

pub use config::{EntityConfig, RegistryConfig};
pub use error::{Result, SchemaError};
pub use hints::StateHints;
pub use introspect::{Introspection, MetaMap, TypeMap, introspect};
pub use meta::FieldMeta;
pub use registry::{BoundEntity, Registry, RegistryBuilder};
pub use schema::{AttributeSchema, AttributeShape, EntitySchema};
pub use visualize::{render_entity, render_schema};
