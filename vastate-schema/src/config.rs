//! TOML configuration for entity schemas.
//!
//! ```toml
//! [[entity]]
//! name = "view"
//!
//! [entity.hints]
//! searchable_fields = ["path"]
//!
//! [entity.attributes.tags]
//! kind = "set"
//! element = "string"
//! optional = true
//! ```

use crate::{AttributeSchema, EntitySchema, Registry, RegistryBuilder, Result, StateHints};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// One `[[entity]]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub hints: StateHints,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeSchema>,
}

impl EntityConfig {
    /// Splits the table into its schema and hints.
    pub fn into_parts(self) -> (EntitySchema, StateHints) {
        let schema = EntitySchema {
            name: self.name,
            description: self.description,
            attributes: self.attributes,
        };
        (schema, self.hints)
    }
}

/// A whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default, rename = "entity")]
    pub entities: Vec<EntityConfig>,
}

impl RegistryConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads and parses a configuration file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).inspect_err(|e| {
            warn!("Failed to read schema config {:?}: {}", path, e);
        })?;
        let config = Self::from_toml_str(&contents).inspect_err(|e| {
            warn!("Failed to parse schema config {:?}: {}", path, e);
        })?;
        debug!(
            "Loaded {} entity schemas from {:?}",
            config.entities.len(),
            path
        );
        Ok(config)
    }

    /// Adds every entity to `builder`.
    pub fn register_into(self, builder: RegistryBuilder) -> RegistryBuilder {
        self.entities.into_iter().fold(builder, |b, entity| {
            let (schema, hints) = entity.into_parts();
            b.register(schema, hints)
        })
    }

    /// Builds a registry holding exactly the configured entities.
    pub fn into_registry(self) -> Result<Registry> {
        self.register_into(RegistryBuilder::new()).build()
    }
}
