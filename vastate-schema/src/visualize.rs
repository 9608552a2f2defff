//! Plain-text rendering of schemas, used in diagnostics and error reports.

use crate::{AttributeSchema, BoundEntity, EntitySchema};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Renders the declared attributes of `schema`, one line per attribute,
/// nested attributes indented under their parent.
///
/// ```text
/// view
///   path (string) [req=true opt=false comp=false sens=false wo=false]
///   spec (object) [req=false opt=true comp=false sens=false wo=false]
///     owner (string) [req=false opt=false comp=true sens=false wo=false]
/// ```
pub fn render_schema(schema: &EntitySchema) -> String {
    let mut out = String::new();
    out.push_str(&schema.name);
    out.push('\n');
    render_attributes(&mut out, &schema.attributes, 1);
    out
}

fn render_attributes(out: &mut String, attrs: &BTreeMap<String, AttributeSchema>, depth: usize) {
    let indent = "  ".repeat(depth);
    for (name, attr) in attrs {
        let _ = writeln!(
            out,
            "{indent}{name} ({}) [req={} opt={} comp={} sens={} wo={}]",
            attr.shape.label(),
            attr.required,
            attr.optional,
            attr.computed,
            attr.sensitive,
            attr.write_only,
        );
        if let Some(children) = attr.shape.nested_attributes() {
            render_attributes(out, children, depth + 1);
        }
    }
}

/// Renders the effective classification of a bound entity: every dotted path
/// with its introspected type and the flags left after hints were applied.
pub fn render_entity(entity: &BoundEntity) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", entity.name());
    for (path, ty) in entity.type_map() {
        let depth = path.matches('.').count() + 1;
        let leaf = path.rsplit('.').next().unwrap_or(path);
        let flags = entity
            .meta(path)
            .map(|m| m.flag_names().join(","))
            .unwrap_or_default();
        let _ = writeln!(out, "{}{leaf}: {ty} ({flags})", "  ".repeat(depth));
    }
    out
}
