//! Human-readable dump of a value tree.

use std::collections::BTreeMap;
use std::fmt::Write;
use vastate_schema::MetaMap;
use vastate_types::{AttrValue, lower};

const REDACTED: &str = "<sensitive>";

/// One line per value, nested object attributes indented under their
/// parent:
///
/// ```text
/// name: string (required,searchable) = "alpha"
/// spec: object (optional)
///   owner: string (computed) = <null>
/// ```
pub(crate) fn pretty_with_meta(values: &BTreeMap<String, AttrValue>, meta: &MetaMap) -> String {
    let mut out = String::new();
    for (key, value) in values {
        walk(&mut out, key, key, value, meta, 0);
    }
    out
}

fn walk(out: &mut String, name: &str, path: &str, value: &AttrValue, meta: &MetaMap, depth: usize) {
    let field_meta = meta.get(path);
    let mods = field_meta
        .map(|m| m.flag_names())
        .filter(|names| !names.is_empty())
        .map(|names| format!(" ({})", names.join(",")))
        .unwrap_or_default();
    let indent = "  ".repeat(depth);
    let sensitive = field_meta.is_some_and(|m| m.sensitive);

    if let (Some(attrs), false) = (value.attributes(), sensitive) {
        let _ = writeln!(out, "{indent}{name}: object{mods}");
        for (child, child_value) in attrs {
            walk(out, child, &format!("{path}.{child}"), child_value, meta, depth + 1);
        }
        return;
    }

    let rendered = if value.is_null() {
        "<null>".to_string()
    } else if value.is_unknown() {
        "<unknown>".to_string()
    } else if sensitive {
        REDACTED.to_string()
    } else {
        serde_json::Value::from(lower(value)).to_string()
    };
    let _ = writeln!(out, "{indent}{name}: {}{mods} = {rendered}", value.kind_name());
}
