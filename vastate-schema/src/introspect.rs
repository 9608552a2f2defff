//! Schema introspection: flattens a nested [`EntitySchema`] into a type map
//! and a classification map, both keyed by dotted path.

use crate::hints::contains;
use crate::{AttributeSchema, AttributeShape, EntitySchema, FieldMeta, Result, SchemaError, StateHints};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;
use vastate_types::AttrType;

/// Declared type of every attribute, keyed by dotted path (`spec.owner`).
pub type TypeMap = BTreeMap<String, AttrType>;

/// Classification of every attribute, keyed by dotted path.
pub type MetaMap = BTreeMap<String, FieldMeta>;

/// Output of [`introspect`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Introspection {
    pub type_map: TypeMap,
    pub meta: MetaMap,
}

impl Introspection {
    /// Top-level attribute names with their types.
    pub fn top_level(&self) -> impl Iterator<Item = (&str, &AttrType)> {
        self.type_map
            .iter()
            .filter(|(k, _)| !k.contains('.'))
            .map(|(k, v)| (k.as_str(), v))
    }
}

/// Walks `schema` once, recording the type and classification of every
/// attribute and overlaying `hints`.
///
/// Any malformed declaration is an error; no attribute is skipped silently.
pub fn introspect(schema: &EntitySchema, hints: &StateHints) -> Result<Introspection> {
    check_hint_conflicts(hints)?;

    let mut out = Introspection::default();
    walk(&schema.attributes, "", hints, &mut out)?;

    let unknown: BTreeSet<&String> = hints
        .classified_paths()
        .filter(|p| !out.meta.contains_key(*p))
        .collect();
    if !unknown.is_empty() {
        debug!(
            "entity {:?}: hints name undeclared fields {:?}",
            schema.name, unknown
        );
    }
    Ok(out)
}

fn check_hint_conflicts(hints: &StateHints) -> Result<()> {
    if let Some(path) = hints
        .required_fields
        .iter()
        .find(|f| contains(&hints.optional_fields, f))
    {
        return Err(SchemaError::ConflictingFlags {
            path: path.clone(),
            reason: "listed in both required_fields and optional_fields".into(),
        });
    }
    Ok(())
}

fn walk(
    attributes: &BTreeMap<String, AttributeSchema>,
    prefix: &str,
    hints: &StateHints,
    out: &mut Introspection,
) -> Result<()> {
    for (name, attr) in attributes {
        let path = join(prefix, name);
        check_name(name, &path)?;
        if contains(&hints.excluded_fields, &path) {
            debug!("excluding {:?} and its subtree", path);
            continue;
        }

        let ty = attr_type(&path, attr, hints)?;
        let meta = classify(&path, attr, hints)?;
        out.type_map.insert(path.clone(), ty);
        out.meta.insert(path.clone(), meta);

        if let Some(children) = attr.shape.nested_attributes() {
            walk(children, &path, hints, out)?;
        }
    }
    Ok(())
}

/// Type of one attribute, recursing into nested declarations.
fn attr_type(path: &str, attr: &AttributeSchema, hints: &StateHints) -> Result<AttrType> {
    let keep_order = contains(&hints.preserve_order_fields, path);
    let ty = match &attr.shape {
        AttributeShape::String => AttrType::String,
        AttributeShape::Int64 => AttrType::Int64,
        AttributeShape::Float64 => AttrType::Float64,
        AttributeShape::Bool => AttrType::Bool,
        AttributeShape::List { element } => AttrType::list(element.clone()),
        AttributeShape::Set { element } if keep_order => AttrType::list(element.clone()),
        AttributeShape::Set { element } => AttrType::set(element.clone()),
        AttributeShape::Map { element } => AttrType::map(element.clone()),
        AttributeShape::SingleNested { attributes } => object_type(path, attributes, hints)?,
        AttributeShape::ListNested { attributes } => {
            AttrType::list(object_type(path, attributes, hints)?)
        }
        AttributeShape::SetNested { attributes } if keep_order => {
            AttrType::list(object_type(path, attributes, hints)?)
        }
        AttributeShape::SetNested { attributes } => {
            AttrType::set(object_type(path, attributes, hints)?)
        }
        AttributeShape::MapNested { attributes } => {
            AttrType::map(object_type(path, attributes, hints)?)
        }
    };
    if keep_order && !matches!(attr.shape, AttributeShape::Set { .. } | AttributeShape::SetNested { .. }) {
        debug!("preserve_order hint on non-set attribute {:?} has no effect", path);
    }
    Ok(ty)
}

fn object_type(
    path: &str,
    attributes: &BTreeMap<String, AttributeSchema>,
    hints: &StateHints,
) -> Result<AttrType> {
    if attributes.is_empty() {
        return Err(SchemaError::InvalidAttribute {
            path: path.to_string(),
            reason: "nested attribute declares no child attributes".into(),
        });
    }
    let mut fields = BTreeMap::new();
    for (name, child) in attributes {
        let child_path = join(path, name);
        check_name(name, &child_path)?;
        if contains(&hints.excluded_fields, &child_path) {
            continue;
        }
        fields.insert(name.clone(), attr_type(&child_path, child, hints)?);
    }
    Ok(AttrType::Object(fields))
}

/// Declared classification with the hint lists overlaid in a fixed order.
fn classify(path: &str, attr: &AttributeSchema, hints: &StateHints) -> Result<FieldMeta> {
    if attr.required && attr.optional {
        return Err(SchemaError::ConflictingFlags {
            path: path.to_string(),
            reason: "declared both required and optional".into(),
        });
    }
    let mut meta = FieldMeta::declared(attr);

    if contains(&hints.required_fields, path) {
        meta.required = true;
        meta.optional = false;
    }
    if contains(&hints.not_required_fields, path) {
        meta.required = false;
    }
    if contains(&hints.optional_fields, path) {
        meta.optional = true;
        meta.required = false;
    }
    if contains(&hints.not_optional_fields, path) {
        meta.optional = false;
    }
    if contains(&hints.computed_fields, path) {
        meta.computed = true;
    }
    if contains(&hints.not_computed_fields, path) {
        meta.computed = false;
    }
    if contains(&hints.sensitive_fields, path) {
        meta.sensitive = true;
    }

    // Flag lists always win over the declaration.
    meta.read_only |= contains(&hints.read_only_fields, path);
    meta.write_only |= contains(&hints.write_only_fields, path);
    meta.edit_only |= contains(&hints.edit_only_fields, path);
    meta.delete_only |= contains(&hints.delete_only_fields, path);
    meta.searchable |= contains(&hints.searchable_fields, path);

    meta.validate(path)?;
    Ok(meta)
}

fn check_name(name: &str, path: &str) -> Result<()> {
    if name.is_empty() || name.contains(['.', '[', ']']) {
        return Err(SchemaError::InvalidAttribute {
            path: path.to_string(),
            reason: format!("attribute name {name:?} must be non-empty and free of '.', '[' and ']'"),
        });
    }
    Ok(())
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}
