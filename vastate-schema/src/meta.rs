//! Per-field classification flags.

use crate::{AttributeSchema, Result, SchemaError};
use serde::{Deserialize, Serialize};

/// Classification of one field, keyed by dotted path in a [`MetaMap`](crate::MetaMap).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldMeta {
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    /// Usable to look up an existing remote entity.
    pub searchable: bool,
    /// Only sent on lookups, never on create or update.
    pub read_only: bool,
    pub write_only: bool,
    /// Only sent on update requests.
    pub edit_only: bool,
    /// Only sent on delete requests.
    pub delete_only: bool,
}

impl FieldMeta {
    /// Classification declared by the schema itself. An attribute that
    /// declares none of required/optional/computed is computed.
    pub fn declared(attr: &AttributeSchema) -> Self {
        let mut meta = Self {
            required: attr.required,
            optional: attr.optional,
            computed: attr.computed,
            sensitive: attr.sensitive,
            write_only: attr.write_only,
            ..Self::default()
        };
        if !meta.required && !meta.optional && !meta.computed {
            meta.computed = true;
        }
        meta
    }

    /// Checks the flag combinations that can never hold together.
    pub fn validate(&self, path: &str) -> Result<()> {
        if self.required && self.optional {
            return Err(SchemaError::ConflictingFlags {
                path: path.to_string(),
                reason: "required and optional are mutually exclusive".into(),
            });
        }
        if self.write_only && self.computed {
            return Err(SchemaError::ConflictingFlags {
                path: path.to_string(),
                reason: "a write-only field cannot be computed".into(),
            });
        }
        Ok(())
    }

    /// Names of the flags that are set, in declaration order.
    #[must_use]
    pub fn flag_names(&self) -> Vec<&'static str> {
        [
            (self.required, "required"),
            (self.optional, "optional"),
            (self.computed, "computed"),
            (self.sensitive, "sensitive"),
            (self.searchable, "searchable"),
            (self.read_only, "read_only"),
            (self.write_only, "write_only"),
            (self.edit_only, "edit_only"),
            (self.delete_only, "delete_only"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undeclared_attribute_defaults_to_computed() {
        let meta = FieldMeta::declared(&AttributeSchema::string());
        assert!(meta.computed);
        assert!(!meta.required && !meta.optional);
    }

    #[test]
    fn optional_attribute_is_not_forced_computed() {
        let meta = FieldMeta::declared(&AttributeSchema::string().optional());
        assert!(!meta.computed);
        assert_eq!(meta.flag_names(), vec!["optional"]);
    }
}
