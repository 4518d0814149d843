//! The four end-to-end scenarios, through the registry.

use entity_proxy::dispatch::codes;
use entity_proxy::Registry;
use serde_json::json;

use crate::support::{call, error_code, local_registry, result, start_upstream};

#[test]
fn create_with_name_succeeds() {
    let (registry, store) = local_registry();

    let response = call(&registry, "req-1", "widget.create", json!({ "entity": { "name": "a" } }));
    assert_eq!(response.id, json!("req-1"));

    let widget = result(&response);
    assert_eq!(widget["name"], "a");
    assert!(!widget["id"].as_str().unwrap().is_empty());
    assert_eq!(store.calls(), 1);
    assert_eq!(store.inner.count("widget"), 1);
}

#[test]
fn create_without_name_never_reaches_storage() {
    let (registry, store) = local_registry();

    let response = call(&registry, "req-2", "widget.create", json!({ "entity": {} }));
    assert_eq!(response.id, json!("req-2"));
    assert_eq!(error_code(&response), codes::INVALID_PARAMS);
    assert!(response.error.unwrap().message.contains("name"));
    assert_eq!(store.calls(), 0);
    assert_eq!(store.inner.count("widget"), 0);
}

#[test]
fn http_search_defaults_take() {
    let base = start_upstream();
    let mut registry = Registry::new();
    entity_proxy::setup::http_proxy(&mut registry, &base, "widget");

    let response = call(
        &registry,
        "req-3",
        "widget.search",
        json!({ "skip": 0, "take": 0, "where": { "status": "active" } }),
    );

    let body = result(&response);
    let query = body["query"].as_str().unwrap();
    assert!(query.contains("skip=0&take=25&where[status]=active"), "{query}");
}

#[test]
fn delete_missing_is_an_error_with_the_same_id() {
    let (registry, _) = local_registry();

    let response = call(&registry, "req-4", "widget.delete", json!({ "id": "missing" }));
    assert_eq!(response.id, json!("req-4"));
    assert_eq!(error_code(&response), codes::NOT_FOUND);

    let encoded = serde_json::to_string(&response).unwrap();
    assert!(!encoded.contains("\"result\""), "{encoded}");
}

#[test]
fn delete_missing_over_http_is_an_error_with_the_same_id() {
    let base = start_upstream();
    let mut registry = Registry::new();
    entity_proxy::setup::http_proxy(&mut registry, &base, "widget");

    let response = call(&registry, 42, "widget.delete", json!({ "id": "missing" }));
    assert_eq!(response.id, json!(42));
    assert_eq!(error_code(&response), codes::NOT_FOUND);
}
