//! RPC backend: a proxy registry talking over the bus to a responder that
//! serves widgets from local storage.

use std::sync::Arc;
use std::time::Duration;

use entity_proxy::bus::InMemoryBus;
use entity_proxy::dispatch::codes;
use entity_proxy::rpc::{self, BusRpcClient, RpcClient};
use entity_proxy::{setup, Action, Registry};
use serde_json::json;

use crate::support::{call, error_code, local_registry, result, CountingStore};

/// Client registry + responder over one in-memory bus.
fn connected() -> (Registry, rpc::ResponderHandle, CountingStore) {
    connected_over(InMemoryBus::new())
}

fn connected_over(bus: InMemoryBus) -> (Registry, rpc::ResponderHandle, CountingStore) {
    let (server, store) = local_registry();
    let responder = rpc::serve(
        Arc::new(server),
        bus.clone(),
        "svc",
        "widget",
        Duration::from_millis(10),
    );

    let client: Arc<dyn RpcClient> = Arc::new(BusRpcClient::new(bus));
    let mut registry = Registry::new();
    setup::rpc_proxy(&mut registry, client, "svc", "widget", Duration::from_secs(2));

    (registry, responder, store)
}

#[test]
fn create_and_read_round_trip() {
    let (registry, responder, store) = connected();

    let created = result(&call(
        &registry,
        "c-1",
        "widget.create",
        json!({ "entity": { "id": "w-1", "name": "a" } }),
    ));
    assert_eq!(created["name"], "a");

    let read = result(&call(&registry, "c-2", "widget.read", json!({ "id": "w-1" })));
    assert_eq!(read["id"], "w-1");

    let stats = responder.stop();
    assert_eq!(stats.handled, 2);
    assert_eq!(store.calls(), 2);
}

#[test]
fn remote_validation_error_keeps_its_code() {
    let (registry, responder, store) = connected();

    let response = call(&registry, "c-3", "widget.create", json!({ "entity": {} }));
    assert_eq!(response.id, json!("c-3"));
    assert_eq!(error_code(&response), codes::INVALID_PARAMS);
    assert!(response.error.unwrap().message.contains("name"));

    let stats = responder.stop();
    assert_eq!(stats.failed, 1);
    assert_eq!(store.calls(), 0);
}

#[test]
fn remote_not_found_keeps_its_code() {
    let (registry, responder, _) = connected();

    let response = call(&registry, "c-4", "widget.delete", json!({ "id": "missing" }));
    assert_eq!(response.id, json!("c-4"));
    assert_eq!(error_code(&response), codes::NOT_FOUND);

    responder.stop();
}

#[test]
fn search_and_patch_over_the_bus() {
    let (registry, responder, _) = connected();
    call(&registry, 1, "widget.create", json!({ "entity": { "id": "w-1", "name": "a", "status": "idle" } }));
    call(&registry, 2, "widget.create", json!({ "entity": { "id": "w-2", "name": "b", "status": "active" } }));

    let patched = result(&call(
        &registry,
        3,
        "widget.patch",
        json!({ "id": "w-1", "data": { "status": "active" } }),
    ));
    assert_eq!(patched["status"], "active");

    let page = result(&call(
        &registry,
        4,
        "widget.search",
        json!({ "filters": { "withStatus": { "status": "active" } } }),
    ));
    assert_eq!(page["total"], 2);

    responder.stop();
}

#[test]
fn no_responder_times_out() {
    let client: Arc<dyn RpcClient> = Arc::new(BusRpcClient::new(InMemoryBus::new()));
    let mut registry = Registry::new();
    setup::rpc_proxy(&mut registry, client, "svc", "widget", Duration::from_millis(20));

    let response = call(&registry, "t-1", "widget.read", json!({ "id": "w-1" }));
    assert_eq!(response.id, json!("t-1"));
    assert_eq!(error_code(&response), codes::UPSTREAM_ERROR);
}

#[test]
fn repeated_calls_leave_no_reply_queues() {
    let bus = InMemoryBus::new();
    let (registry, responder, _) = connected_over(bus.clone());

    call(
        &registry,
        "c-0",
        "widget.create",
        json!({ "entity": { "id": "w-1", "name": "a" } }),
    );
    for n in 0..100 {
        let read = result(&call(&registry, n, "widget.read", json!({ "id": "w-1" })));
        assert_eq!(read["id"], "w-1");
    }

    assert!(bus.queues().len() <= Action::ALL.len());
    assert!(bus.queues().iter().all(|queue| !queue.contains(".reply.")));
    assert_eq!(responder.stop().handled, 101);
}
