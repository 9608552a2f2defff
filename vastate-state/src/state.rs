//! The entity state container.
//!
//! An [`EntityState`] holds the typed values of one entity for the duration
//! of one operation. Its schema binding (type map, classification, hints) is
//! shared and read-only; only the values change.

use crate::diff::prune_nil;
use crate::filter::{self, FieldFilter, FieldSet, FilterCombination};
use crate::render;
use crate::{StateError, StateResult};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;
use vastate_schema::{BoundEntity, FieldMeta};
use vastate_types::{
    AttrPath, AttrType, AttrValue, RawValue, Record, is_whole, lift_at, lift_record, lower,
    record_from_json, resolve, resolve_mut,
};

/// Typed values of one entity plus their schema binding.
#[derive(Debug, Clone)]
pub struct EntityState {
    values: BTreeMap<String, AttrValue>,
    entity: Option<Arc<BoundEntity>>,
}

impl EntityState {
    /// Binds `values` to `entity`. Every value must be a declared top-level
    /// field holding a value of its declared type.
    pub fn new(entity: Arc<BoundEntity>, values: BTreeMap<String, AttrValue>) -> StateResult<Self> {
        for (key, value) in &values {
            let declared = entity
                .type_of(key)
                .filter(|_| entity.has_attribute(key))
                .ok_or_else(|| StateError::UndeclaredField(key.clone()))?;
            let actual = value.attr_type();
            if &actual != declared {
                return Err(StateError::TypeMismatch {
                    path: key.clone(),
                    expected: declared.to_string(),
                    actual: actual.to_string(),
                });
            }
        }
        Ok(Self {
            values,
            entity: Some(entity),
        })
    }

    /// Lifts a remote record. Declared fields missing from the record are Null.
    pub fn from_record(entity: Arc<BoundEntity>, record: &Record) -> StateResult<Self> {
        let values = lift_record(entity.top_level(), record)?;
        Ok(Self {
            values,
            entity: Some(entity),
        })
    }

    /// Like [`from_record`](Self::from_record) for a JSON object.
    pub fn from_json(entity: Arc<BoundEntity>, json: serde_json::Value) -> StateResult<Self> {
        let record = record_from_json(json)?;
        Self::from_record(entity, &record)
    }

    /// A container with no schema bound. Only existence checks work on it.
    pub fn disabled(values: BTreeMap<String, AttrValue>) -> Self {
        Self {
            values,
            entity: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.entity.is_some()
    }

    /// True when `name` is a declared top-level attribute. Always false
    /// for a disabled container.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.entity.as_ref().is_some_and(|e| e.has_attribute(name))
    }

    /// The bound entity.
    pub fn entity(&self) -> StateResult<&BoundEntity> {
        self.entity.as_deref().ok_or(StateError::Disabled)
    }

    /// All top-level values.
    pub fn values(&self) -> &BTreeMap<String, AttrValue> {
        &self.values
    }

    // ── Lookup ───────────────────────────────────────────────────

    /// The value at `path` (`name`, `spec.owner`, `rules[0].host`).
    pub fn get(&self, path: &str) -> StateResult<&AttrValue> {
        self.entity()?;
        let parsed: AttrPath = path.parse()?;
        Ok(resolve(&self.values, &parsed)?)
    }

    pub fn string(&self, path: &str) -> StateResult<Option<String>> {
        match self.get(path)? {
            AttrValue::String(s) => Ok(s.known().cloned()),
            other => Err(mismatch(path, "string", other)),
        }
    }

    pub fn bool(&self, path: &str) -> StateResult<Option<bool>> {
        match self.get(path)? {
            AttrValue::Bool(b) => Ok(b.known().copied()),
            other => Err(mismatch(path, "bool", other)),
        }
    }

    /// Reads an int64. A float64 field is accepted when it holds a whole
    /// number inside the i64 range.
    pub fn int64(&self, path: &str) -> StateResult<Option<i64>> {
        match self.get(path)? {
            AttrValue::Int64(i) => Ok(i.known().copied()),
            AttrValue::Float64(f) => match f.known() {
                None => Ok(None),
                Some(&value) if is_whole(value) => Ok(Some(value as i64)),
                Some(&value) => Err(StateError::NotWholeNumber {
                    path: path.to_string(),
                    value,
                }),
            },
            other => Err(mismatch(path, "int64", other)),
        }
    }

    pub fn float64(&self, path: &str) -> StateResult<Option<f64>> {
        match self.get(path)? {
            AttrValue::Float64(f) => Ok(f.known().copied()),
            other => Err(mismatch(path, "float64", other)),
        }
    }

    /// Attributes of an object field, `None` when Null or Unknown.
    pub fn object(&self, path: &str) -> StateResult<Option<&BTreeMap<String, AttrValue>>> {
        match self.get(path)? {
            v @ AttrValue::Object { .. } => Ok(v.attributes()),
            other => Err(mismatch(path, "object", other)),
        }
    }

    /// Items of a list field, `None` when Null or Unknown.
    pub fn list(&self, path: &str) -> StateResult<Option<&[AttrValue]>> {
        match self.get(path)? {
            v @ AttrValue::List { .. } => Ok(v.elements()),
            other => Err(mismatch(path, "list", other)),
        }
    }

    /// Items of a set field, `None` when Null or Unknown.
    pub fn set_items(&self, path: &str) -> StateResult<Option<&[AttrValue]>> {
        match self.get(path)? {
            v @ AttrValue::Set { .. } => Ok(v.elements()),
            other => Err(mismatch(path, "set", other)),
        }
    }

    pub fn is_null(&self, path: &str) -> StateResult<bool> {
        Ok(self.get(path)?.is_null())
    }

    pub fn is_unknown(&self, path: &str) -> StateResult<bool> {
        Ok(self.get(path)?.is_unknown())
    }

    pub fn is_known_and_not_null(&self, path: &str) -> StateResult<bool> {
        Ok(self.get(path)?.is_known())
    }

    // ── Mutation ─────────────────────────────────────────────────

    /// Replaces the value at an existing `path` with `raw` lifted against
    /// the value's declared type.
    pub fn set(&mut self, path: &str, raw: impl Into<RawValue>) -> StateResult<()> {
        let entity = self.entity.clone().ok_or(StateError::Disabled)?;
        let parsed: AttrPath = path.parse()?;
        let raw = raw.into();

        if parsed.is_top_level() {
            if !self.values.contains_key(path) {
                return Err(StateError::UndeclaredField(path.to_string()));
            }
            let ty = entity
                .type_of(path)
                .ok_or_else(|| StateError::UndeclaredField(path.to_string()))?;
            let value = lift_at(ty, &raw, path)?;
            self.values.insert(path.to_string(), value);
            return Ok(());
        }

        let slot = resolve_mut(&mut self.values, &parsed)?;
        *slot = lift_at(&slot.attr_type(), &raw, path)?;
        Ok(())
    }

    /// Sets a declared top-level field, adding it when the container does
    /// not hold it yet. Used by import flows.
    pub fn set_or_add(&mut self, key: &str, raw: impl Into<RawValue>) -> StateResult<()> {
        let entity = self.entity()?;
        if !entity.has_attribute(key) {
            return Err(StateError::UndeclaredField(key.to_string()));
        }
        let ty = entity
            .type_of(key)
            .ok_or_else(|| StateError::UndeclaredField(key.to_string()))?;
        let value = lift_at(ty, &raw.into(), key)?;
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    /// Overwrites computed fields from a remote record. Keys that are not
    /// declared, or not computed, are left alone.
    pub fn fill_from_record(&mut self, record: &Record) -> StateResult<()> {
        let entity = self.entity.clone().ok_or(StateError::Disabled)?;
        for (key, raw) in record {
            let (Some(ty), Some(meta)) = (entity.type_of(key), entity.meta(key)) else {
                debug!("fill_from_record: skipping undeclared key {:?}", key);
                continue;
            };
            if !entity.has_attribute(key) || !meta.computed {
                continue;
            }
            let value = lift_at(ty, raw, key)?;
            self.values.insert(key.clone(), value);
        }
        Ok(())
    }

    /// Copies every Known value into `other`, where `other` declares the
    /// same field with the same type.
    pub fn copy_non_empty_fields_to(&self, other: &mut EntityState) -> StateResult<()> {
        self.entity()?;
        let target = other.entity.clone().ok_or(StateError::Disabled)?;
        for (key, value) in self.values.iter().filter(|(_, v)| v.is_known()) {
            if target.type_of(key) == Some(&value.attr_type()) {
                other.values.insert(key.clone(), value.clone());
            } else {
                debug!("copy_non_empty_fields_to: target does not declare {:?}", key);
            }
        }
        Ok(())
    }

    // ── Lowering ─────────────────────────────────────────────────

    /// The list or set at `path` in raw form. Null and Unknown give an
    /// empty list; Null items are pruned.
    pub fn to_slice(&self, path: &str) -> StateResult<Vec<RawValue>> {
        let value = self.get(path)?;
        if !matches!(value, AttrValue::List { .. } | AttrValue::Set { .. }) {
            return Err(mismatch(path, "list or set", value));
        }
        match prune_nil(&lower(value)) {
            RawValue::List(items) => Ok(items),
            _ => Ok(Vec::new()),
        }
    }

    /// The map or object at `path` in raw form. Null and Unknown give an
    /// empty record; Null entries are pruned.
    pub fn to_map(&self, path: &str) -> StateResult<Record> {
        let value = self.get(path)?;
        if !matches!(value, AttrValue::Map { .. } | AttrValue::Object { .. }) {
            return Err(mismatch(path, "map or object", value));
        }
        match prune_nil(&lower(value)) {
            RawValue::Map(map) => Ok(map),
            _ => Ok(Record::new()),
        }
    }

    /// Copies the Known values at `paths` into `record`, keyed by path.
    /// Returns true when at least one value was copied.
    pub fn set_to_map_if_available(&self, record: &mut Record, paths: &[&str]) -> StateResult<bool> {
        let mut updated = false;
        for path in paths {
            let value = self.get(path)?;
            if value.is_known() {
                record.insert((*path).to_string(), lower(value));
                updated = true;
            }
        }
        Ok(updated)
    }

    /// Record of the Known values at `paths`.
    pub fn set_if_available(&self, paths: &[&str]) -> StateResult<Record> {
        let mut record = Record::new();
        self.set_to_map_if_available(&mut record, paths)?;
        Ok(record)
    }

    // ── Classification ───────────────────────────────────────────

    /// Classification of a dotted schema path. Indices are ignored, so
    /// `rules[1].host` reads the meta of `rules.host`.
    pub fn meta(&self, path: &str) -> StateResult<&FieldMeta> {
        let key = schema_key(path)?;
        self.entity()?
            .meta(&key)
            .ok_or(StateError::MetaNotFound(key))
    }

    pub fn is_required(&self, path: &str) -> StateResult<bool> {
        Ok(self.meta(path)?.required)
    }

    pub fn is_optional(&self, path: &str) -> StateResult<bool> {
        Ok(self.meta(path)?.optional)
    }

    pub fn is_computed(&self, path: &str) -> StateResult<bool> {
        Ok(self.meta(path)?.computed)
    }

    /// Declared type of a dotted schema path.
    pub fn type_of(&self, path: &str) -> StateResult<&AttrType> {
        let key = schema_key(path)?;
        self.entity()?
            .type_of(&key)
            .ok_or(StateError::UndeclaredField(key))
    }

    // ── Projections ──────────────────────────────────────────────

    /// Raw values of the top-level fields that pass `flags` under
    /// `combination` and `field_set`.
    ///
    /// Only Known values are returned unless `flags` holds
    /// [`FieldFilter::IncludeEmpty`], which lets Null and Unknown fields
    /// through as explicit `Null`.
    pub fn get_filtered_values(
        &self,
        combination: FilterCombination,
        field_set: Option<&FieldSet>,
        flags: &[FieldFilter],
    ) -> StateResult<Record> {
        let entity = self.entity()?;
        let include_empty = filter::has(flags, FieldFilter::IncludeEmpty);
        let primitives_only = filter::has(flags, FieldFilter::PrimitivesOnly);

        let mut result = Record::new();
        for (key, value) in &self.values {
            if field_set.is_some_and(|fs| !fs.should_include(key)) {
                continue;
            }
            let Some(ty) = entity.type_of(key) else {
                continue;
            };
            if primitives_only && !ty.is_primitive() {
                continue;
            }
            match entity.meta(key) {
                Some(meta) if filter::matches(meta, combination, flags) => {}
                _ => continue,
            }
            if value.is_known() {
                result.insert(key.clone(), lower(value));
            } else if include_empty {
                result.insert(key.clone(), RawValue::Null);
            }
        }

        if !include_empty {
            result = crate::diff::prune_record(&result);
        }
        Ok(result)
    }

    /// Every top-level value lowered, Null and Unknown as `Null`.
    pub fn get_all_values(&self) -> StateResult<Record> {
        self.entity()?;
        Ok(self.values.iter().map(|(k, v)| (k.clone(), lower(v))).collect())
    }

    /// Fields whose value here differs from `other`.
    ///
    /// Candidates are `fields` when given, otherwise every field passing
    /// `flags` under `combination`. A candidate is reported with this
    /// container's value when `other` lacks it, holds Null/Unknown, or holds
    /// a different value. Null/Unknown candidates are skipped unless
    /// `flags` holds [`FieldFilter::IncludeEmpty`].
    pub fn diff_fields(
        &self,
        other: &EntityState,
        combination: FilterCombination,
        fields: Option<&[&str]>,
        flags: &[FieldFilter],
    ) -> StateResult<Record> {
        let entity = self.entity()?;
        other.entity()?;
        let include_empty = filter::has(flags, FieldFilter::IncludeEmpty);

        let candidates: Vec<&str> = match fields {
            Some(list) => {
                for field in list {
                    if !entity.has_attribute(field) {
                        return Err(StateError::UndeclaredField((*field).to_string()));
                    }
                }
                list.to_vec()
            }
            None => self
                .values
                .keys()
                .filter(|k| {
                    entity
                        .meta(k)
                        .is_some_and(|m| filter::matches(m, combination, flags))
                })
                .map(String::as_str)
                .collect(),
        };

        let mut diff = Record::new();
        for key in candidates {
            let Some(value) = self.values.get(key) else {
                continue;
            };
            if !value.is_known() {
                if include_empty {
                    diff.insert(key.to_string(), RawValue::Null);
                }
                continue;
            }
            let differs = other
                .values
                .get(key)
                .is_none_or(|theirs| !theirs.is_known() || theirs != value);
            if differs {
                diff.insert(key.to_string(), lower(value));
            }
        }

        if !include_empty {
            diff = crate::diff::prune_record(&diff);
        }
        Ok(diff)
    }

    /// Multi-line dump of the values annotated with their classification.
    /// Sensitive values are redacted.
    pub fn pretty(&self) -> StateResult<String> {
        Ok(render::pretty_with_meta(&self.values, self.entity()?.meta_map()))
    }
}

fn schema_key(path: &str) -> StateResult<String> {
    Ok(path.parse::<AttrPath>()?.schema_key())
}

fn mismatch(path: &str, expected: &str, actual: &AttrValue) -> StateError {
    StateError::TypeMismatch {
        path: path.to_string(),
        expected: expected.to_string(),
        actual: actual.kind_name().to_string(),
    }
}
