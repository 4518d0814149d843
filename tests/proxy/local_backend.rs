//! Local backend through the registry.

use entity_proxy::dispatch::codes;
use serde_json::json;

use crate::support::{call, error_code, local_registry, result};

#[test]
fn create_read_update_patch_delete() {
    let (registry, _) = local_registry();

    let created = result(&call(
        &registry,
        1,
        "widget.create",
        json!({ "entity": { "id": "w-1", "name": "a", "status": "new" } }),
    ));
    assert_eq!(created, json!({ "id": "w-1", "name": "a", "status": "new" }));

    let read = result(&call(&registry, 2, "widget.read", json!({ "id": "w-1" })));
    assert_eq!(read, created);

    let updated = result(&call(
        &registry,
        3,
        "widget.update",
        json!({ "id": "w-1", "entity": { "name": "b", "status": "active" } }),
    ));
    assert_eq!(updated, json!({ "id": "w-1", "name": "b", "status": "active" }));

    let patched = result(&call(
        &registry,
        4,
        "widget.patch",
        json!({ "id": "w-1", "data": { "status": "archived" } }),
    ));
    assert_eq!(patched["status"], "archived");
    assert_eq!(patched["name"], "b");

    let deleted = result(&call(&registry, 5, "widget.delete", json!({ "id": "w-1" })));
    assert_eq!(deleted, json!({}));

    let gone = call(&registry, 6, "widget.read", json!({ "id": "w-1" }));
    assert_eq!(error_code(&gone), codes::NOT_FOUND);
}

#[test]
fn update_is_validated() {
    let (registry, store) = local_registry();
    call(&registry, 1, "widget.create", json!({ "entity": { "id": "w-1", "name": "a" } }));

    let response = call(
        &registry,
        2,
        "widget.update",
        json!({ "id": "w-1", "entity": { "name": "" } }),
    );
    assert_eq!(error_code(&response), codes::INVALID_PARAMS);
    assert_eq!(store.calls(), 1);
}

// Patch skips validation while create/update enforce it.
#[test]
fn patch_can_clear_a_required_field() {
    let (registry, _) = local_registry();
    call(&registry, 1, "widget.create", json!({ "entity": { "id": "w-1", "name": "a" } }));

    let patched = result(&call(
        &registry,
        2,
        "widget.patch",
        json!({ "id": "w-1", "data": { "name": "" } }),
    ));
    assert_eq!(patched["name"], "");
}

#[test]
fn search_applies_declared_filters_only() {
    let (registry, _) = local_registry();
    for (id, status) in [("w-1", "active"), ("w-2", "idle"), ("w-3", "active")] {
        call(
            &registry,
            id,
            "widget.create",
            json!({ "entity": { "id": id, "name": id, "status": status } }),
        );
    }

    let page = result(&call(
        &registry,
        "s-1",
        "widget.search",
        json!({
            "skip": 0,
            "take": 0,
            "sort": { "id": "desc" },
            "filters": {
                "withStatus": { "status": "active" },
                "undeclared": { "x": "y" }
            }
        }),
    ));

    assert_eq!(page["total"], 2);
    let ids: Vec<&str> = page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["w-3", "w-1"]);
}

#[test]
fn search_accepts_hooks_alias_and_where() {
    let (registry, _) = local_registry();
    call(&registry, 1, "widget.create", json!({ "entity": { "id": "w-1", "name": "a", "status": "active" } }));
    call(&registry, 2, "widget.create", json!({ "entity": { "id": "w-2", "name": "b", "status": "active" } }));

    let page = result(&call(
        &registry,
        3,
        "widget.search",
        json!({
            "where": { "name": "b" },
            "hooks": { "withStatus": { "status": "active" } }
        }),
    ));
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["id"], "w-2");
}

#[test]
fn empty_id_is_rejected_before_storage() {
    let (registry, store) = local_registry();

    let response = call(&registry, 1, "widget.read", json!({ "id": "" }));
    assert_eq!(error_code(&response), codes::INVALID_PARAMS);
    assert_eq!(store.calls(), 0);
}

#[test]
fn mistyped_params_are_a_parse_error() {
    let (registry, store) = local_registry();

    let response = call(&registry, "p-1", "widget.search", json!({ "skip": "zero" }));
    assert_eq!(response.id, json!("p-1"));
    assert_eq!(error_code(&response), codes::PARSE_ERROR);
    assert_eq!(store.calls(), 0);
}

#[test]
fn unknown_method() {
    let (registry, _) = local_registry();
    let response = call(&registry, 1, "gadget.create", json!({}));
    assert_eq!(error_code(&response), codes::METHOD_NOT_FOUND);
}

#[test]
fn malformed_envelope_gets_null_id() {
    let (registry, _) = local_registry();
    let response = registry.handle_slice(b"{ not json");
    assert_eq!(response.id, serde_json::Value::Null);
    assert_eq!(error_code(&response), codes::PARSE_ERROR);
}
