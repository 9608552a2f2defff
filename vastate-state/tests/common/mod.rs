//! Shared test helpers for state tests.

#![allow(dead_code)]

use serde_json::json;
use std::sync::Arc;
use vastate_schema::{AttributeSchema, BoundEntity, EntitySchema, StateHints};
use vastate_state::EntityState;
use vastate_types::AttrType;

/// Installs a `tracing` subscriber honouring `RUST_LOG`, once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A view-like entity with scalars, a set, a nested object and a nested list.
pub fn view_entity() -> Arc<BoundEntity> {
    view_entity_with(StateHints::new().searchable(["name"]))
}

pub fn view_entity_with(hints: StateHints) -> Arc<BoundEntity> {
    let schema = EntitySchema::new("view")
        .attribute("id", AttributeSchema::int64().computed())
        .attribute("guid", AttributeSchema::string().computed())
        .attribute("name", AttributeSchema::string().required())
        .attribute("path", AttributeSchema::string().optional())
        .attribute("ratio", AttributeSchema::float64().optional().computed())
        .attribute("enabled", AttributeSchema::bool().optional())
        .attribute("secret", AttributeSchema::string().optional().sensitive())
        .attribute("tags", AttributeSchema::set(AttrType::String).optional())
        .attribute("labels", AttributeSchema::map(AttrType::String).optional())
        .attribute(
            "spec",
            AttributeSchema::single_nested([
                ("owner", AttributeSchema::string().optional()),
                ("quota", AttributeSchema::int64().optional()),
            ])
            .optional(),
        )
        .attribute(
            "rules",
            AttributeSchema::list_nested([
                ("host", AttributeSchema::string().required()),
                ("ports", AttributeSchema::list(AttrType::Int64).optional()),
            ])
            .optional(),
        );
    Arc::new(BoundEntity::new(schema, hints).unwrap())
}

/// A view state lifted from a representative remote record.
pub fn view_state() -> EntityState {
    EntityState::from_json(
        view_entity(),
        json!({
            "id": 7,
            "name": "alpha",
            "path": "/alpha",
            "ratio": 3.0,
            "enabled": true,
            "secret": "hunter2",
            "tags": ["x", "y"],
            "labels": {"env": "prod", "team": null},
            "spec": {"owner": "root"},
            "rules": [
                {"host": "10.0.0.1", "ports": [22, 80]},
                {"host": "10.0.0.2"}
            ],
            "unrelated": "ignored"
        }),
    )
    .unwrap()
}
