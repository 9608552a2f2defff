//! State containers for the vastate entity state model.
//!
//! An [`EntityState`] bridges the typed attribute tree of one entity and the
//! raw records exchanged with the remote API:
//! - path-addressed typed reads and writes
//! - classification-filtered projections ([`FieldFilter`], [`FieldSet`])
//! - request parameter derivation (search, create, edit-only, delete-only)
//! - order-insensitive structural diffing ([`structural_eq`], [`diff_map`])

mod diff;
mod error;
mod filter;
mod params;
mod render;
mod state;

pub use diff::{diff_map, prune_nil, prune_record, structural_diff, structural_eq};
pub use error::{StateError, StateResult};
pub use filter::{FieldFilter, FieldSet, FilterCombination, matches};
pub use params::COMMON_SEARCHABLE_FIELDS;
pub use state::EntityState;
