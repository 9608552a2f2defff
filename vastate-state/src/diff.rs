//! Structural comparison of raw values.
//!
//! Remote services reorder list-valued attributes (host lists, permission
//! tuples) without changing their meaning, so lists of strings and lists of
//! string lists compare as unordered at any depth. Everything else compares
//! exactly.

use similar::{ChangeTag, TextDiff};
use std::fmt::Write;
use vastate_types::{RawValue, Record};

/// Deep equality with string lists compared order-insensitively.
pub fn structural_eq(a: &RawValue, b: &RawValue) -> bool {
    normalize(a) == normalize(b)
}

/// `None` when the values are structurally equal, otherwise a line diff of
/// their pretty-printed normalized forms (`-` expected, `+` actual).
pub fn structural_diff(expected: &RawValue, actual: &RawValue) -> Option<String> {
    let (a, b) = (normalize(expected), normalize(actual));
    if a == b {
        return None;
    }
    let (text_a, text_b) = (pretty(a), pretty(b));
    let diff = TextDiff::from_lines(&text_a, &text_b);
    let mut out = String::from("mismatch:\n");
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => '-',
            ChangeTag::Insert => '+',
            ChangeTag::Equal => ' ',
        };
        let _ = write!(out, "{sign} {change}");
        if change.missing_newline() {
            out.push('\n');
        }
    }
    Some(out)
}

/// Keys of `a` that are missing from `b` or differ under [`structural_eq`],
/// with Null values pruned.
pub fn diff_map(a: &Record, b: &Record) -> Record {
    let diff: Record = a
        .iter()
        .filter(|(k, v)| b.get(*k).is_none_or(|other| !structural_eq(v, other)))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    prune_record(&diff)
}

/// Recursively drops Null map entries and Null list items.
///
/// Collections left empty by pruning stay in place as empty collections.
pub fn prune_nil(value: &RawValue) -> RawValue {
    match value {
        RawValue::Map(map) => RawValue::Map(prune_record(map)),
        RawValue::List(items) => RawValue::List(
            items
                .iter()
                .filter(|v| !v.is_null())
                .map(prune_nil)
                .collect(),
        ),
        other => other.clone(),
    }
}

/// [`prune_nil`] applied to every entry of a record.
pub fn prune_record(record: &Record) -> Record {
    record
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k.clone(), prune_nil(v)))
        .collect()
}

fn normalize(value: &RawValue) -> RawValue {
    match value {
        RawValue::Map(map) => {
            RawValue::Map(map.iter().map(|(k, v)| (k.clone(), normalize(v))).collect())
        }
        RawValue::List(items) => {
            let mut items: Vec<RawValue> = items.iter().map(normalize).collect();
            if !items.is_empty() && items.iter().all(|v| matches!(v, RawValue::String(_))) {
                items.sort_by(|a, b| a.as_str().cmp(&b.as_str()));
            } else if !items.is_empty() && items.iter().all(is_string_list) {
                items.sort_by_key(string_items);
            }
            RawValue::List(items)
        }
        other => other.clone(),
    }
}

fn is_string_list(value: &RawValue) -> bool {
    value
        .as_list()
        .is_some_and(|items| items.iter().all(|v| matches!(v, RawValue::String(_))))
}

fn string_items(value: &RawValue) -> Vec<String> {
    value
        .as_list()
        .unwrap_or_default()
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect()
}

fn pretty(value: RawValue) -> String {
    let json = serde_json::Value::from(value);
    let mut text = serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string());
    text.push('\n');
    text
}
