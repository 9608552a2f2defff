//! Classification overrides layered on top of a schema's own declarations.

use serde::{Deserialize, Serialize};

/// Per-entity overrides applied during introspection.
///
/// Every list holds full dotted paths: `name` matches only the top-level
/// attribute, `spec.name` only the nested one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateHints {
    pub required_fields: Vec<String>,
    pub not_required_fields: Vec<String>,
    pub optional_fields: Vec<String>,
    pub not_optional_fields: Vec<String>,
    pub computed_fields: Vec<String>,
    pub not_computed_fields: Vec<String>,
    pub sensitive_fields: Vec<String>,
    pub searchable_fields: Vec<String>,
    pub read_only_fields: Vec<String>,
    pub write_only_fields: Vec<String>,
    pub edit_only_fields: Vec<String>,
    pub delete_only_fields: Vec<String>,
    /// Removed from the type and meta maps together with their subtree.
    pub excluded_fields: Vec<String>,
    /// Declared sets that keep their order and are typed as lists.
    pub preserve_order_fields: Vec<String>,
}

impl StateHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn searchable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend(&mut self.searchable_fields, fields);
        self
    }

    pub fn read_only<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend(&mut self.read_only_fields, fields);
        self
    }

    pub fn write_only<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend(&mut self.write_only_fields, fields);
        self
    }

    pub fn edit_only<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend(&mut self.edit_only_fields, fields);
        self
    }

    pub fn delete_only<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend(&mut self.delete_only_fields, fields);
        self
    }

    pub fn excluded<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend(&mut self.excluded_fields, fields);
        self
    }

    pub fn preserve_order<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend(&mut self.preserve_order_fields, fields);
        self
    }

    pub fn required<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend(&mut self.required_fields, fields);
        self
    }

    pub fn optional<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend(&mut self.optional_fields, fields);
        self
    }

    pub fn sensitive<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend(&mut self.sensitive_fields, fields);
        self
    }

    /// Fields that must never appear in create requests or lookups:
    /// the edit-only fields followed by the delete-only fields.
    #[must_use]
    pub fn edit_or_delete_only(&self) -> Vec<String> {
        self.edit_only_fields
            .iter()
            .chain(&self.delete_only_fields)
            .cloned()
            .collect()
    }

    /// Every path mentioned by any classification list.
    pub(crate) fn classified_paths(&self) -> impl Iterator<Item = &String> {
        [
            &self.required_fields,
            &self.not_required_fields,
            &self.optional_fields,
            &self.not_optional_fields,
            &self.computed_fields,
            &self.not_computed_fields,
            &self.sensitive_fields,
            &self.searchable_fields,
            &self.read_only_fields,
            &self.write_only_fields,
            &self.edit_only_fields,
            &self.delete_only_fields,
            &self.preserve_order_fields,
        ]
        .into_iter()
        .flatten()
    }
}

fn extend<I, S>(dst: &mut Vec<String>, fields: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    dst.extend(fields.into_iter().map(Into::into));
}

pub(crate) fn contains(list: &[String], path: &str) -> bool {
    list.iter().any(|f| f == path)
}
