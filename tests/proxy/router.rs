//! JSON-RPC over HTTP via the axum router.

use std::sync::Arc;

use entity_proxy::dispatch::{self, codes, Registry};
use entity_proxy::InMemoryEntityStore;
use serde_json::{json, Value};

use crate::support::{start_upstream, Widget};

/// Bind to port 0 and return the actual address.
async fn start_server() -> String {
    let mut registry = Registry::new();
    entity_proxy::setup::local::<Widget, _>(&mut registry, InMemoryEntityStore::new()).unwrap();

    let app = dispatch::router(Arc::new(registry));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn health_lists_methods() {
    let base = start_server().await;
    let body: Value = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["ok"], true);
    let methods = body["methods"].as_array().unwrap();
    assert_eq!(methods.len(), 6);
    assert!(methods.iter().any(|m| m == "widget.patch"));
}

#[tokio::test]
async fn rpc_create_then_read() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/rpc"))
        .json(&json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "widget.create",
            "params": { "entity": { "id": "w-1", "name": "a" } }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["id"], 7);
    assert_eq!(body["result"]["name"], "a");

    let body: Value = client
        .post(format!("{base}/rpc"))
        .json(&json!({ "id": 8, "method": "widget.read", "params": { "id": "w-1" } }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["result"]["id"], "w-1");
}

#[tokio::test]
async fn rpc_errors_travel_in_the_envelope() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let body: Value = client
        .post(format!("{base}/rpc"))
        .json(&json!({ "id": "x", "method": "widget.create", "params": { "entity": {} } }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["id"], "x");
    assert_eq!(body["error"]["code"], codes::INVALID_PARAMS);
    assert!(body.get("result").is_none());

    let body: Value = client
        .post(format!("{base}/rpc"))
        .body("garbage")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["id"], Value::Null);
    assert_eq!(body["error"]["code"], codes::PARSE_ERROR);
}

#[tokio::test(flavor = "multi_thread")]
async fn http_backend_wired_inside_the_runtime() {
    let upstream = start_upstream();

    let mut registry = Registry::new();
    entity_proxy::setup::http_proxy(&mut registry, &upstream, "widget");

    let app = dispatch::router(Arc::new(registry));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let body: Value = reqwest::Client::new()
        .post(format!("http://{addr}/rpc"))
        .json(&json!({ "id": 1, "method": "widget.read", "params": { "id": "w-1" } }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["id"], 1);
    assert_eq!(body["result"]["name"], "a");
}
