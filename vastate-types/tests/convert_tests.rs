use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::BTreeMap;
use vastate_types::{
    AttrType, AttrValue, Error, RawValue, Record, lift, lift_at, lift_record, lower, lower_record,
};

fn raw(v: serde_json::Value) -> RawValue {
    RawValue::from(v)
}

fn conversion_path(err: Error) -> String {
    match err {
        Error::Conversion { path, .. } => path,
        other => panic!("expected a conversion error, got {other:?}"),
    }
}

// ── Scalars ──────────────────────────────────────────────────────

#[test]
fn string_stringifies_any_scalar() {
    assert_eq!(lift(&AttrType::String, &raw(json!(42))).unwrap(), AttrValue::string("42"));
    assert_eq!(lift(&AttrType::String, &raw(json!(2.5))).unwrap(), AttrValue::string("2.5"));
    assert_eq!(lift(&AttrType::String, &raw(json!(true))).unwrap(), AttrValue::string("true"));
    assert_eq!(lift(&AttrType::String, &raw(json!("x"))).unwrap(), AttrValue::string("x"));
}

#[test]
fn string_renders_composites_as_compact_json() {
    let v = lift(&AttrType::String, &raw(json!({"a": 1, "b": [true]}))).unwrap();
    assert_eq!(v, AttrValue::string(r#"{"a":1,"b":[true]}"#));
}

#[test]
fn int64_accepts_whole_floats() {
    assert_eq!(lift(&AttrType::Int64, &RawValue::Float(3.0)).unwrap(), AttrValue::int64(3));
    assert_eq!(lift(&AttrType::Int64, &RawValue::Int(-7)).unwrap(), AttrValue::int64(-7));
}

#[test]
fn int64_rejects_fractional_floats_and_strings() {
    let err = lift(&AttrType::Int64, &RawValue::Float(3.5)).unwrap_err();
    match err {
        Error::Conversion { expected, actual, .. } => {
            assert_eq!(expected, "int64");
            assert_eq!(actual, "float64");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(lift(&AttrType::Int64, &raw(json!("3"))).is_err());
}

#[test]
fn float64_accepts_ints_and_numeric_strings() {
    assert_eq!(lift(&AttrType::Float64, &RawValue::Int(2)).unwrap(), AttrValue::float64(2.0));
    assert_eq!(lift(&AttrType::Float64, &raw(json!("1.25"))).unwrap(), AttrValue::float64(1.25));
    assert!(lift(&AttrType::Float64, &raw(json!("abc"))).is_err());
    assert!(lift(&AttrType::Float64, &raw(json!("inf"))).is_err());
    assert!(lift(&AttrType::Float64, &raw(json!("NaN"))).is_err());
    assert_eq!(lift(&AttrType::Float64, &raw(json!(" 0.5 "))).unwrap(), AttrValue::float64(0.5));
}

#[test]
fn bool_requires_bool() {
    assert_eq!(lift(&AttrType::Bool, &raw(json!(false))).unwrap(), AttrValue::bool(false));
    assert!(lift(&AttrType::Bool, &raw(json!(1))).is_err());
    assert!(lift(&AttrType::Bool, &raw(json!("true"))).is_err());
}

// ── Null handling ────────────────────────────────────────────────

#[test]
fn null_lifts_to_typed_null() {
    let ty = AttrType::list(AttrType::Int64);
    let v = lift(&ty, &RawValue::Null).unwrap();
    assert!(v.is_null());
    assert_eq!(v.attr_type(), ty);
}

#[test]
fn object_fills_absent_fields_with_null_and_ignores_extras() {
    let ty = AttrType::object([("a", AttrType::Int64), ("b", AttrType::String)]);
    let v = lift(&ty, &raw(json!({"a": 1, "z": true}))).unwrap();
    let attrs = v.attributes().unwrap();
    assert_eq!(attrs.len(), 2);
    assert_eq!(attrs["a"], AttrValue::int64(1));
    assert!(attrs["b"].is_null());
    assert!(!attrs.contains_key("z"));
}

// ── Error paths ──────────────────────────────────────────────────

#[test]
fn list_error_names_the_index() {
    let ty = AttrType::list(AttrType::Int64);
    let err = lift_at(&ty, &raw(json!([1, "x"])), "tags").unwrap_err();
    assert_eq!(conversion_path(err), "tags[1]");
}

#[test]
fn nested_error_names_the_dotted_path() {
    let ty = AttrType::object([("owner", AttrType::Int64)]);
    let err = lift_at(&ty, &raw(json!({"owner": "bob"})), "spec").unwrap_err();
    assert_eq!(conversion_path(err), "spec.owner");
}

#[test]
fn map_error_names_the_quoted_key() {
    let ty = AttrType::map(AttrType::Int64);
    let err = lift_at(&ty, &raw(json!({"k": "x"})), "labels").unwrap_err();
    assert_eq!(conversion_path(err), r#"labels["k"]"#);
}

#[test]
fn composite_shape_mismatch_is_an_error() {
    assert!(lift(&AttrType::list(AttrType::String), &raw(json!({"a": 1}))).is_err());
    assert!(lift(&AttrType::map(AttrType::String), &raw(json!(["a"]))).is_err());
    assert!(lift(&AttrType::object([("a", AttrType::String)]), &raw(json!("a"))).is_err());
}

// ── Lowering ─────────────────────────────────────────────────────

#[test]
fn lower_drops_empty_list_items() {
    let v = AttrValue::list(
        AttrType::String,
        vec![
            AttrValue::string("a"),
            AttrValue::null(&AttrType::String),
            AttrValue::unknown(&AttrType::String),
        ],
    )
    .unwrap();
    assert_eq!(lower(&v), raw(json!(["a"])));
}

#[test]
fn lower_keeps_empty_map_and_object_entries() {
    let map = AttrValue::map(
        AttrType::Int64,
        BTreeMap::from([
            ("a".to_string(), AttrValue::int64(1)),
            ("b".to_string(), AttrValue::null(&AttrType::Int64)),
        ]),
    )
    .unwrap();
    assert_eq!(lower(&map), raw(json!({"a": 1, "b": null})));

    let ty = AttrType::object([("a", AttrType::Int64), ("b", AttrType::String)]);
    let obj = lift(&ty, &raw(json!({"a": 1}))).unwrap();
    assert_eq!(lower(&obj), raw(json!({"a": 1, "b": null})));
}

#[test]
fn lower_unknown_is_null() {
    assert_eq!(lower(&AttrValue::unknown(&AttrType::Bool)), RawValue::Null);
}

// ── Records ──────────────────────────────────────────────────────

#[test]
fn lift_record_fills_declared_and_skips_undeclared() {
    let types = BTreeMap::from([
        ("id".to_string(), AttrType::Int64),
        ("name".to_string(), AttrType::String),
    ]);
    let record: Record = BTreeMap::from([
        ("id".to_string(), RawValue::Int(1)),
        ("extra".to_string(), RawValue::Bool(true)),
    ]);

    let values = lift_record(types.iter().map(|(k, v)| (k.as_str(), v)), &record).unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(values["id"], AttrValue::int64(1));
    assert!(values["name"].is_null());

    let lowered = lower_record(&values);
    assert_eq!(lowered["id"], RawValue::Int(1));
    assert_eq!(lowered["name"], RawValue::Null);
}

#[test]
fn lift_record_reports_the_top_level_key() {
    let types = [("id", AttrType::Int64)];
    let record: Record = BTreeMap::from([("id".to_string(), RawValue::from("abc"))]);
    let err = lift_record(types.iter().map(|(k, v)| (*k, v)), &record).unwrap_err();
    assert_eq!(conversion_path(err), "id");
}
