//! Field selection by classification.

use vastate_schema::FieldMeta;

/// Selects fields by their [`FieldMeta`].
///
/// `IncludeEmpty` and `PrimitivesOnly` are modifiers: they never match a
/// classification themselves and only change how matching fields are
/// projected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldFilter {
    Required,
    Optional,
    Computed,
    Sensitive,
    Searchable,
    ReadOnly,
    WriteOnly,
    EditOnly,
    DeleteOnly,
    NotRequired,
    NotOptional,
    NotSensitive,
    NotSearchable,
    NotWriteOnly,
    /// Let Null and Unknown fields through as explicit nulls.
    IncludeEmpty,
    /// Restrict to string, int64, float64 and bool fields.
    PrimitivesOnly,
}

impl FieldFilter {
    #[must_use]
    pub fn is_modifier(self) -> bool {
        matches!(self, Self::IncludeEmpty | Self::PrimitivesOnly)
    }

    /// Whether `meta` carries this classification. Modifiers return `None`.
    fn test(self, meta: &FieldMeta) -> Option<bool> {
        Some(match self {
            Self::Required => meta.required,
            Self::Optional => meta.optional,
            Self::Computed => meta.computed,
            Self::Sensitive => meta.sensitive,
            Self::Searchable => meta.searchable,
            Self::ReadOnly => meta.read_only,
            Self::WriteOnly => meta.write_only,
            Self::EditOnly => meta.edit_only,
            Self::DeleteOnly => meta.delete_only,
            Self::NotRequired => !meta.required,
            Self::NotOptional => !meta.optional,
            Self::NotSensitive => !meta.sensitive,
            Self::NotSearchable => !meta.searchable,
            Self::NotWriteOnly => !meta.write_only,
            Self::IncludeEmpty | Self::PrimitivesOnly => return None,
        })
    }
}

/// How several classification filters combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FilterCombination {
    And,
    #[default]
    Or,
}

/// Evaluates the classification filters in `flags` against `meta`.
///
/// A list without classification filters matches every field.
pub fn matches(meta: &FieldMeta, combination: FilterCombination, flags: &[FieldFilter]) -> bool {
    let mut results = flags.iter().filter_map(|f| f.test(meta)).peekable();
    if results.peek().is_none() {
        return true;
    }
    match combination {
        FilterCombination::Or => results.any(|hit| hit),
        FilterCombination::And => results.all(|hit| hit),
    }
}

pub(crate) fn has(flags: &[FieldFilter], flag: FieldFilter) -> bool {
    flags.contains(&flag)
}

/// Allow/deny lists of top-level field names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl FieldSet {
    /// Only the named fields.
    pub fn include<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include: fields.into_iter().map(Into::into).collect(),
            exclude: Vec::new(),
        }
    }

    /// Every field except the named ones.
    pub fn exclude<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include: Vec::new(),
            exclude: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Exclusion always wins; a non-empty include list is an allow-list.
    #[must_use]
    pub fn should_include(&self, field: &str) -> bool {
        if self.exclude.iter().any(|f| f == field) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|f| f == field)
    }
}
