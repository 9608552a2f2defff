//! Typed attribute values.
//!
//! An [`AttrValue`] always matches exactly one [`AttrType`]. Each variant
//! carries a [`ValueState`] so that any node of the tree can independently be
//! Null, Unknown (pending computation) or Known. Composite variants keep their
//! declared element or field types so a Null list still knows what it holds.

use crate::{AttrType, Error, Result};
use std::collections::BTreeMap;

/// Presence state of a value.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueState<T> {
    Null,
    /// The value is not determined yet.
    Unknown,
    Known(T),
}

impl<T> ValueState<T> {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Borrows the payload when Known.
    #[must_use]
    pub fn known(&self) -> Option<&T> {
        match self {
            Self::Known(v) => Some(v),
            _ => None,
        }
    }
}

/// A typed value.
#[derive(Debug, Clone)]
pub enum AttrValue {
    String(ValueState<String>),
    Int64(ValueState<i64>),
    Float64(ValueState<f64>),
    Bool(ValueState<bool>),
    List {
        element: AttrType,
        items: ValueState<Vec<AttrValue>>,
    },
    Set {
        element: AttrType,
        items: ValueState<Vec<AttrValue>>,
    },
    Map {
        element: AttrType,
        entries: ValueState<BTreeMap<String, AttrValue>>,
    },
    Object {
        fields: BTreeMap<String, AttrType>,
        attributes: ValueState<BTreeMap<String, AttrValue>>,
    },
}

impl AttrValue {
    /// Null value of the given type.
    pub fn null(ty: &AttrType) -> Self {
        Self::with_state(ty, StateKind::Null)
    }

    /// Unknown value of the given type.
    pub fn unknown(ty: &AttrType) -> Self {
        Self::with_state(ty, StateKind::Unknown)
    }

    fn with_state(ty: &AttrType, kind: StateKind) -> Self {
        fn state<T>(kind: StateKind) -> ValueState<T> {
            match kind {
                StateKind::Null => ValueState::Null,
                StateKind::Unknown => ValueState::Unknown,
            }
        }
        match ty {
            AttrType::String => Self::String(state(kind)),
            AttrType::Int64 => Self::Int64(state(kind)),
            AttrType::Float64 => Self::Float64(state(kind)),
            AttrType::Bool => Self::Bool(state(kind)),
            AttrType::List(e) => Self::List {
                element: (**e).clone(),
                items: state(kind),
            },
            AttrType::Set(e) => Self::Set {
                element: (**e).clone(),
                items: state(kind),
            },
            AttrType::Map(e) => Self::Map {
                element: (**e).clone(),
                entries: state(kind),
            },
            AttrType::Object(fields) => Self::Object {
                fields: fields.clone(),
                attributes: state(kind),
            },
        }
    }

    pub fn string(v: impl Into<String>) -> Self {
        Self::String(ValueState::Known(v.into()))
    }

    pub fn int64(v: i64) -> Self {
        Self::Int64(ValueState::Known(v))
    }

    pub fn float64(v: f64) -> Self {
        Self::Float64(ValueState::Known(v))
    }

    pub fn bool(v: bool) -> Self {
        Self::Bool(ValueState::Known(v))
    }

    /// Known list; every item must have type `element`.
    pub fn list(element: AttrType, items: Vec<AttrValue>) -> Result<Self> {
        check_elements(&element, items.iter())?;
        Ok(Self::List {
            element,
            items: ValueState::Known(items),
        })
    }

    /// Known set; every item must have type `element`.
    pub fn set(element: AttrType, items: Vec<AttrValue>) -> Result<Self> {
        check_elements(&element, items.iter())?;
        Ok(Self::Set {
            element,
            items: ValueState::Known(items),
        })
    }

    /// Known map; every entry must have type `element`.
    pub fn map(element: AttrType, entries: BTreeMap<String, AttrValue>) -> Result<Self> {
        check_elements(&element, entries.values())?;
        Ok(Self::Map {
            element,
            entries: ValueState::Known(entries),
        })
    }

    /// Known object. `attributes` must hold exactly the declared fields.
    pub fn object(
        fields: BTreeMap<String, AttrType>,
        attributes: BTreeMap<String, AttrValue>,
    ) -> Result<Self> {
        let same_keys = fields.len() == attributes.len()
            && fields.keys().all(|k| attributes.contains_key(k));
        if !same_keys {
            return Err(Error::TypeMismatch {
                expected: AttrType::Object(fields).to_string(),
                actual: format!(
                    "object with fields [{}]",
                    attributes.keys().cloned().collect::<Vec<_>>().join(",")
                ),
            });
        }
        for (name, ty) in &fields {
            check_elements(ty, attributes.get(name))?;
        }
        Ok(Self::Object {
            fields,
            attributes: ValueState::Known(attributes),
        })
    }

    /// The declared type of this value.
    #[must_use]
    pub fn attr_type(&self) -> AttrType {
        match self {
            Self::String(_) => AttrType::String,
            Self::Int64(_) => AttrType::Int64,
            Self::Float64(_) => AttrType::Float64,
            Self::Bool(_) => AttrType::Bool,
            Self::List { element, .. } => AttrType::list(element.clone()),
            Self::Set { element, .. } => AttrType::set(element.clone()),
            Self::Map { element, .. } => AttrType::map(element.clone()),
            Self::Object { fields, .. } => AttrType::Object(fields.clone()),
        }
    }

    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Int64(_) => "int64",
            Self::Float64(_) => "float64",
            Self::Bool(_) => "bool",
            Self::List { .. } => "list",
            Self::Set { .. } => "set",
            Self::Map { .. } => "map",
            Self::Object { .. } => "object",
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        match self {
            Self::String(s) => s.is_null(),
            Self::Int64(s) => s.is_null(),
            Self::Float64(s) => s.is_null(),
            Self::Bool(s) => s.is_null(),
            Self::List { items, .. } | Self::Set { items, .. } => items.is_null(),
            Self::Map { entries, .. } => entries.is_null(),
            Self::Object { attributes, .. } => attributes.is_null(),
        }
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        match self {
            Self::String(s) => s.is_unknown(),
            Self::Int64(s) => s.is_unknown(),
            Self::Float64(s) => s.is_unknown(),
            Self::Bool(s) => s.is_unknown(),
            Self::List { items, .. } | Self::Set { items, .. } => items.is_unknown(),
            Self::Map { entries, .. } => entries.is_unknown(),
            Self::Object { attributes, .. } => attributes.is_unknown(),
        }
    }

    /// Neither Null nor Unknown.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !self.is_null() && !self.is_unknown()
    }

    /// Items of a Known list or set.
    #[must_use]
    pub fn elements(&self) -> Option<&[AttrValue]> {
        match self {
            Self::List { items, .. } | Self::Set { items, .. } => items.known().map(Vec::as_slice),
            _ => None,
        }
    }

    /// Attributes of a Known object.
    #[must_use]
    pub fn attributes(&self) -> Option<&BTreeMap<String, AttrValue>> {
        match self {
            Self::Object { attributes, .. } => attributes.known(),
            _ => None,
        }
    }

    /// Entries of a Known map.
    #[must_use]
    pub fn entries(&self) -> Option<&BTreeMap<String, AttrValue>> {
        match self {
            Self::Map { entries, .. } => entries.known(),
            _ => None,
        }
    }
}

#[derive(Clone, Copy)]
enum StateKind {
    Null,
    Unknown,
}

fn check_elements<'a>(
    element: &AttrType,
    values: impl IntoIterator<Item = &'a AttrValue>,
) -> Result<()> {
    for value in values {
        let actual = value.attr_type();
        if &actual != element {
            return Err(Error::TypeMismatch {
                expected: element.to_string(),
                actual: actual.to_string(),
            });
        }
    }
    Ok(())
}

/// Sets compare as unordered multisets; everything else compares in order.
impl PartialEq for AttrValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Int64(a), Self::Int64(b)) => a == b,
            (Self::Float64(a), Self::Float64(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (
                Self::List { element: ea, items: a },
                Self::List { element: eb, items: b },
            ) => ea == eb && a == b,
            (
                Self::Set { element: ea, items: a },
                Self::Set { element: eb, items: b },
            ) => {
                ea == eb
                    && match (a, b) {
                        (ValueState::Known(a), ValueState::Known(b)) => multiset_eq(a, b),
                        (ValueState::Null, ValueState::Null) => true,
                        (ValueState::Unknown, ValueState::Unknown) => true,
                        _ => false,
                    }
            }
            (
                Self::Map { element: ea, entries: a },
                Self::Map { element: eb, entries: b },
            ) => ea == eb && a == b,
            (
                Self::Object { fields: fa, attributes: a },
                Self::Object { fields: fb, attributes: b },
            ) => fa == fb && a == b,
            _ => false,
        }
    }
}

fn multiset_eq(a: &[AttrValue], b: &[AttrValue]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    a.iter().all(|x| {
        let hit = b
            .iter()
            .enumerate()
            .position(|(i, y)| !used[i] && x == y);
        match hit {
            Some(i) => {
                used[i] = true;
                true
            }
            None => false,
        }
    })
}
