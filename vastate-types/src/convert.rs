//! Conversion between raw values and typed values.
//!
//! [`lift`] turns a raw value into an [`AttrValue`] of a declared type;
//! [`lower`] goes the other way. The two are inverse for Known values, with
//! one deliberate asymmetry: lowering a list or set drops Null/Unknown items,
//! while maps and objects keep them as explicit `Null` entries.

use crate::{AttrType, AttrValue, Error, RawValue, Record, Result, ValueState};
use std::collections::BTreeMap;
use tracing::debug;

/// Lifts `raw` into a typed value of type `ty`.
pub fn lift(ty: &AttrType, raw: &RawValue) -> Result<AttrValue> {
    lift_at(ty, raw, "")
}

/// Like [`lift`], reporting conversion errors relative to `path`.
pub fn lift_at(ty: &AttrType, raw: &RawValue, path: &str) -> Result<AttrValue> {
    if raw.is_null() {
        return Ok(AttrValue::null(ty));
    }

    match ty {
        AttrType::String => Ok(AttrValue::string(stringify(raw))),
        AttrType::Int64 => match raw {
            RawValue::Int(i) => Ok(AttrValue::int64(*i)),
            RawValue::Float(f) if is_whole(*f) => Ok(AttrValue::int64(*f as i64)),
            _ => Err(mismatch(ty, raw, path)),
        },
        AttrType::Float64 => match raw {
            RawValue::Int(i) => Ok(AttrValue::float64(*i as f64)),
            RawValue::Float(f) => Ok(AttrValue::float64(*f)),
            RawValue::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(AttrValue::float64)
                .ok_or_else(|| mismatch(ty, raw, path)),
            _ => Err(mismatch(ty, raw, path)),
        },
        AttrType::Bool => match raw {
            RawValue::Bool(b) => Ok(AttrValue::bool(*b)),
            _ => Err(mismatch(ty, raw, path)),
        },
        AttrType::List(element) | AttrType::Set(element) => {
            let Some(raw_items) = raw.as_list() else {
                return Err(mismatch(ty, raw, path));
            };
            let items = raw_items
                .iter()
                .enumerate()
                .map(|(i, item)| lift_at(element, item, &format!("{path}[{i}]")))
                .collect::<Result<Vec<_>>>()?;
            let element = (**element).clone();
            Ok(match ty {
                AttrType::List(_) => AttrValue::List {
                    element,
                    items: ValueState::Known(items),
                },
                _ => AttrValue::Set {
                    element,
                    items: ValueState::Known(items),
                },
            })
        }
        AttrType::Map(element) => {
            let Some(raw_entries) = raw.as_map() else {
                return Err(mismatch(ty, raw, path));
            };
            let entries = raw_entries
                .iter()
                .map(|(k, v)| Ok((k.clone(), lift_at(element, v, &format!("{path}[{k:?}]"))?)))
                .collect::<Result<BTreeMap<_, _>>>()?;
            Ok(AttrValue::Map {
                element: (**element).clone(),
                entries: ValueState::Known(entries),
            })
        }
        AttrType::Object(fields) => {
            let Some(raw_attrs) = raw.as_map() else {
                return Err(mismatch(ty, raw, path));
            };
            let mut attributes = BTreeMap::new();
            for (name, field_ty) in fields {
                let value = match raw_attrs.get(name) {
                    Some(v) => lift_at(field_ty, v, &child_path(path, name))?,
                    None => AttrValue::null(field_ty),
                };
                attributes.insert(name.clone(), value);
            }
            Ok(AttrValue::Object {
                fields: fields.clone(),
                attributes: ValueState::Known(attributes),
            })
        }
    }
}

/// Lowers a typed value into its raw form. Null and Unknown become `Null`.
pub fn lower(value: &AttrValue) -> RawValue {
    match value {
        AttrValue::String(ValueState::Known(s)) => RawValue::String(s.clone()),
        AttrValue::Int64(ValueState::Known(i)) => RawValue::Int(*i),
        AttrValue::Float64(ValueState::Known(f)) => RawValue::Float(*f),
        AttrValue::Bool(ValueState::Known(b)) => RawValue::Bool(*b),
        AttrValue::List {
            items: ValueState::Known(items),
            ..
        }
        | AttrValue::Set {
            items: ValueState::Known(items),
            ..
        } => RawValue::List(items.iter().filter(|v| v.is_known()).map(lower).collect()),
        AttrValue::Map {
            entries: ValueState::Known(entries),
            ..
        } => RawValue::Map(entries.iter().map(|(k, v)| (k.clone(), lower(v))).collect()),
        AttrValue::Object {
            attributes: ValueState::Known(attrs),
            ..
        } => RawValue::Map(attrs.iter().map(|(k, v)| (k.clone(), lower(v))).collect()),
        _ => RawValue::Null,
    }
}

/// Lifts every declared top-level key of `record`.
///
/// Keys the record lacks become Null; keys nobody declared are skipped.
pub fn lift_record<'a, I>(types: I, record: &Record) -> Result<BTreeMap<String, AttrValue>>
where
    I: IntoIterator<Item = (&'a str, &'a AttrType)>,
{
    let mut values = BTreeMap::new();
    for (key, ty) in types {
        let value = match record.get(key) {
            Some(raw) => lift_at(ty, raw, key)?,
            None => AttrValue::null(ty),
        };
        values.insert(key.to_string(), value);
    }
    for key in record.keys().filter(|k| !values.contains_key(*k)) {
        debug!("lift_record: skipping undeclared key {:?}", key);
    }
    Ok(values)
}

/// Lowers a whole value map into a record.
pub fn lower_record(values: &BTreeMap<String, AttrValue>) -> Record {
    values.iter().map(|(k, v)| (k.clone(), lower(v))).collect()
}

/// Best-effort string form of any raw value.
fn stringify(raw: &RawValue) -> String {
    match raw {
        RawValue::Null => String::new(),
        RawValue::Bool(b) => b.to_string(),
        RawValue::Int(i) => i.to_string(),
        RawValue::Float(f) => f.to_string(),
        RawValue::String(s) => s.clone(),
        composite => serde_json::Value::from(composite.clone()).to_string(),
    }
}

/// Finite, integral and inside the i64 range.
pub fn is_whole(f: f64) -> bool {
    f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64
}

fn child_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

fn mismatch(ty: &AttrType, raw: &RawValue, path: &str) -> Error {
    Error::Conversion {
        path: path.to_string(),
        expected: ty.to_string(),
        actual: raw.kind_name().to_string(),
    }
}
