//! Immutable registry of introspected entity schemas.
//!
//! Built once at startup through [`RegistryBuilder`] and then shared
//! read-only; entries are handed out as `Arc<BoundEntity>` so state
//! containers can hold on to them without copying the maps.

use crate::{
    EntitySchema, FieldMeta, Introspection, MetaMap, Result, SchemaError, StateHints, TypeMap,
    introspect,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;
use vastate_types::AttrType;

/// A schema bound to its hints, with its type and meta maps derived.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundEntity {
    schema: EntitySchema,
    hints: StateHints,
    introspection: Introspection,
}

impl BoundEntity {
    /// Introspects `schema` with `hints`.
    pub fn new(schema: EntitySchema, hints: StateHints) -> Result<Self> {
        let introspection = introspect(&schema, &hints)?;
        Ok(Self {
            schema,
            hints,
            introspection,
        })
    }

    pub fn name(&self) -> &str {
        &self.schema.name
    }

    pub fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    pub fn hints(&self) -> &StateHints {
        &self.hints
    }

    pub fn type_map(&self) -> &TypeMap {
        &self.introspection.type_map
    }

    pub fn meta_map(&self) -> &MetaMap {
        &self.introspection.meta
    }

    /// Declared type at a dotted path.
    pub fn type_of(&self, path: &str) -> Option<&AttrType> {
        self.introspection.type_map.get(path)
    }

    /// Classification at a dotted path.
    pub fn meta(&self, path: &str) -> Option<&FieldMeta> {
        self.introspection.meta.get(path)
    }

    /// Top-level attribute names with their types.
    pub fn top_level(&self) -> impl Iterator<Item = (&str, &AttrType)> {
        self.introspection.top_level()
    }

    /// True when `name` is a declared top-level attribute.
    pub fn has_attribute(&self, name: &str) -> bool {
        !name.contains('.') && self.introspection.type_map.contains_key(name)
    }
}

/// Collects schemas before the registry is frozen.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: Vec<(EntitySchema, StateHints)>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an entity (builder pattern).
    pub fn register(mut self, schema: EntitySchema, hints: StateHints) -> Self {
        self.entries.push((schema, hints));
        self
    }

    /// Introspects every queued entity and freezes the registry.
    pub fn build(self) -> Result<Registry> {
        let mut entities = BTreeMap::new();
        for (schema, hints) in self.entries {
            let name = schema.name.clone();
            if entities.contains_key(&name) {
                return Err(SchemaError::DuplicateEntity(name));
            }
            let bound = BoundEntity::new(schema, hints)?;
            debug!(
                "registered entity {:?} with {} fields",
                name,
                bound.type_map().len()
            );
            entities.insert(name, Arc::new(bound));
        }
        Ok(Registry { entities })
    }
}

/// Read-only mapping from entity name to its bound schema.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entities: BTreeMap<String, Arc<BoundEntity>>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Looks up an entity by name.
    pub fn get(&self, name: &str) -> Result<Arc<BoundEntity>> {
        self.entities
            .get(name)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownEntity(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    /// Registered entity names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
