//! Raw (untyped) values as exchanged with the remote API.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A string-keyed raw payload, e.g. one remote entity or a request body.
pub type Record = BTreeMap<String, RawValue>;

/// Loosely-typed value: the JSON data model with integers and floats kept apart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<RawValue>),
    Map(BTreeMap<String, RawValue>),
}

impl RawValue {
    /// Name of the raw kind, used in conversion errors.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "nil",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int64",
            Self::Float(_) => "float64",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[RawValue]> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&BTreeMap<String, RawValue>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Looks up a key when this is a map.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.as_map().and_then(|m| m.get(key))
    }
}

impl From<serde_json::Value> for RawValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                // u64 above i64::MAX and real floats
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            serde_json::Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<RawValue> for serde_json::Value {
    fn from(v: RawValue) -> Self {
        match v {
            RawValue::Null => Self::Null,
            RawValue::Bool(b) => Self::Bool(b),
            RawValue::Int(i) => Self::from(i),
            // Non-finite floats have no JSON form.
            RawValue::Float(f) => serde_json::Number::from_f64(f)
                .map(Self::Number)
                .unwrap_or(Self::Null),
            RawValue::String(s) => Self::String(s),
            RawValue::List(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            RawValue::Map(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl From<BTreeMap<String, RawValue>> for RawValue {
    fn from(v: BTreeMap<String, RawValue>) -> Self {
        Self::Map(v)
    }
}

/// Converts a JSON object into a record. Anything other than an object is rejected.
pub fn record_from_json(value: serde_json::Value) -> Result<Record> {
    match RawValue::from(value) {
        RawValue::Map(map) => Ok(map),
        other => Err(Error::Conversion {
            path: String::new(),
            expected: "map".into(),
            actual: other.kind_name().into(),
        }),
    }
}

/// Pretty JSON rendering of a record, for diagnostics.
pub fn record_to_pretty_json(record: &Record) -> String {
    let json = serde_json::Value::from(RawValue::Map(record.clone()));
    serde_json::to_string_pretty(&json).unwrap_or_else(|_| format!("{record:?}"))
}

/// Merges `src` into `dst`. With `overwrite == false` keys already in `dst` win.
pub fn update_record(dst: &mut Record, src: Record, overwrite: bool) {
    for (key, value) in src {
        if overwrite {
            dst.insert(key, value);
        } else {
            dst.entry(key).or_insert(value);
        }
    }
}
