use pretty_assertions::assert_eq;
use std::io::Write;
use vastate_schema::{
    AttributeSchema, AttributeShape, EntitySchema, Registry, RegistryConfig, SchemaError,
    StateHints, render_entity, render_schema,
};
use vastate_types::AttrType;

const CONFIG: &str = r#"
[[entity]]
name = "view"
description = "NFS/S3 view"

[entity.hints]
searchable_fields = ["path"]
read_only_fields = ["tenant_name"]
edit_only_fields = ["enabled"]

[entity.attributes.id]
kind = "int64"
computed = true

[entity.attributes.path]
kind = "string"
required = true

[entity.attributes.tenant_name]
kind = "string"
optional = true

[entity.attributes.enabled]
kind = "bool"
optional = true

[entity.attributes.tags]
kind = "set"
element = "string"
optional = true

[entity.attributes.share_acl]
kind = "single_nested"
optional = true

[entity.attributes.share_acl.attributes.enabled]
kind = "bool"
optional = true

[entity.attributes.share_acl.attributes.acl]
kind = "list"
element = "object{fqdn:string,grantee:string}"
optional = true

[[entity]]
name = "quota"

[entity.attributes.hard_limit]
kind = "float64"
optional = true
"#;

fn user_schema() -> EntitySchema {
    EntitySchema::new("user")
        .attribute("id", AttributeSchema::int64().computed())
        .attribute("uid", AttributeSchema::int64().optional())
        .attribute("name", AttributeSchema::string().required())
}

// ── Builder ──────────────────────────────────────────────────────

#[test]
fn builder_registers_entities_by_name() {
    let registry = Registry::builder()
        .register(user_schema(), StateHints::default())
        .register(
            EntitySchema::new("group").attribute("gid", AttributeSchema::int64().optional()),
            StateHints::new().searchable(["gid"]),
        )
        .build()
        .unwrap();

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["group", "user"]);
    let group = registry.get("group").unwrap();
    assert!(group.meta("gid").unwrap().searchable);
    assert_eq!(group.type_of("gid"), Some(&AttrType::Int64));
    assert!(group.has_attribute("gid"));
    assert!(!group.has_attribute("uid"));
}

#[test]
fn duplicate_entity_names_are_rejected() {
    let err = Registry::builder()
        .register(user_schema(), StateHints::default())
        .register(user_schema(), StateHints::default())
        .build()
        .unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateEntity(ref n) if n == "user"));
}

#[test]
fn unknown_entity_lookup_fails() {
    let registry = Registry::builder().build().unwrap();
    assert!(registry.is_empty());
    assert!(matches!(
        registry.get("nope"),
        Err(SchemaError::UnknownEntity(_))
    ));
}

#[test]
fn invalid_schema_fails_the_whole_build() {
    let bad = EntitySchema::new("bad").attribute("x", AttributeSchema::string().required().optional());
    let result = Registry::builder()
        .register(user_schema(), StateHints::default())
        .register(bad, StateHints::default())
        .build();
    assert!(result.is_err());
}

#[test]
fn bound_entities_are_shared_not_copied() {
    let registry = Registry::builder()
        .register(user_schema(), StateHints::default())
        .build()
        .unwrap();
    let a = registry.get("user").unwrap();
    let b = registry.get("user").unwrap();
    assert!(std::sync::Arc::ptr_eq(&a, &b));
}

// ── TOML configuration ───────────────────────────────────────────

#[test]
fn config_parses_shapes_and_hints() {
    let config = RegistryConfig::from_toml_str(CONFIG).unwrap();
    assert_eq!(config.entities.len(), 2);

    let view = &config.entities[0];
    assert_eq!(view.name, "view");
    assert_eq!(view.hints.searchable_fields, vec!["path".to_string()]);
    assert_eq!(
        view.attributes["tags"].shape,
        AttributeShape::Set {
            element: AttrType::String
        }
    );
    assert!(view.attributes["path"].required);
    assert!(matches!(
        view.attributes["share_acl"].shape,
        AttributeShape::SingleNested { .. }
    ));
}

#[test]
fn config_builds_registry() {
    let registry = RegistryConfig::from_toml_str(CONFIG)
        .unwrap()
        .into_registry()
        .unwrap();
    let view = registry.get("view").unwrap();

    assert!(view.meta("path").unwrap().searchable);
    assert!(view.meta("tenant_name").unwrap().read_only);
    assert!(view.meta("enabled").unwrap().edit_only);
    assert!(!view.meta("share_acl.enabled").unwrap().edit_only);
    assert_eq!(
        view.type_of("share_acl.acl").unwrap().to_string(),
        "list<object{fqdn:string,grantee:string}>"
    );
    assert_eq!(view.hints().edit_or_delete_only(), vec!["enabled".to_string()]);
    assert_eq!(
        registry.get("quota").unwrap().type_of("hard_limit"),
        Some(&AttrType::Float64)
    );
}

#[test]
fn config_rejects_unknown_kind() {
    let toml = r#"
[[entity]]
name = "x"
[entity.attributes.a]
kind = "tuple"
"#;
    assert!(matches!(
        RegistryConfig::from_toml_str(toml),
        Err(SchemaError::Config(_))
    ));
}

#[test]
fn config_rejects_bad_element_type() {
    let toml = r#"
[[entity]]
name = "x"
[entity.attributes.a]
kind = "list"
element = "list<"
"#;
    assert!(RegistryConfig::from_toml_str(toml).is_err());
}

#[test]
fn config_loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();
    let config = RegistryConfig::load_from(file.path()).unwrap();
    assert_eq!(config.entities[1].name, "quota");
}

#[test]
fn missing_config_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = RegistryConfig::load_from(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, SchemaError::Io(_)));
}

// ── Rendering ────────────────────────────────────────────────────

#[test]
fn render_schema_indents_nested_attributes() {
    let schema = EntitySchema::new("view").attribute(
        "spec",
        AttributeSchema::single_nested([("owner", AttributeSchema::string().required())]).optional(),
    );
    assert_eq!(
        render_schema(&schema),
        "view\n\
         \x20 spec (object) [req=false opt=true comp=false sens=false wo=false]\n\
         \x20   owner (string) [req=true opt=false comp=false sens=false wo=false]\n"
    );
}

#[test]
fn render_entity_shows_effective_flags() {
    let registry = RegistryConfig::from_toml_str(CONFIG)
        .unwrap()
        .into_registry()
        .unwrap();
    let rendered = render_entity(&registry.get("view").unwrap());
    assert!(rendered.starts_with("view\n"));
    assert!(rendered.contains("  path: string (required,searchable)\n"));
    assert!(rendered.contains("    enabled: bool (optional)\n"));
}
