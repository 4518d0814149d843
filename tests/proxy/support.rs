//! Test domain: a Widget entity, a store that counts calls, and a small
//! REST upstream.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use axum::extract::{Path, RawQuery};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use entity_proxy::api::StringMap;
use entity_proxy::dispatch::{Registry, Request, Response};
use entity_proxy::local::{
    EntityStore, Hook, InMemoryEntityStore, NamedFilter, Page, SearchQuery, StoreError,
    ValidationError,
};
use entity_proxy::Entity;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// A widget requires a name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Widget {
    pub id: String,
    pub name: String,
    pub status: String,
}

impl Entity for Widget {
    const NAME: &'static str = "widget";

    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::required("name"));
        }
        Ok(())
    }

    fn scopes() -> Vec<NamedFilter> {
        vec![NamedFilter::new("withStatus", |args: &StringMap| {
            let status = args.get("status").cloned().unwrap_or_default();
            Hook::new("withStatus", move |doc: &Value| doc["status"] == status.as_str())
        })]
    }
}

/// In-memory store that counts every storage call.
#[derive(Clone, Default)]
pub struct CountingStore {
    pub inner: InMemoryEntityStore,
    calls: Arc<AtomicUsize>,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl EntityStore for CountingStore {
    fn prepare<E: Entity>(&self) -> Result<(), StoreError> {
        self.inner.prepare::<E>()
    }

    fn create<E: Entity>(&self, entity: E) -> Result<E, StoreError> {
        self.tick();
        self.inner.create(entity)
    }

    fn read<E: Entity>(&self, id: &str, preload: &StringMap) -> Result<E, StoreError> {
        self.tick();
        self.inner.read(id, preload)
    }

    fn update<E: Entity>(&self, id: &str, entity: E) -> Result<E, StoreError> {
        self.tick();
        self.inner.update(id, entity)
    }

    fn delete<E: Entity>(&self, id: &str) -> Result<(), StoreError> {
        self.tick();
        self.inner.delete::<E>(id)
    }

    fn search<E: Entity>(&self, query: &SearchQuery) -> Result<Page<E>, StoreError> {
        self.tick();
        self.inner.search(query)
    }

    fn patch<E: Entity>(
        &self,
        id: &str,
        data: &Map<String, Value>,
        preload: &StringMap,
    ) -> Result<E, StoreError> {
        self.tick();
        self.inner.patch(id, data, preload)
    }
}

/// Dispatch one call through the registry.
pub fn call(registry: &Registry, id: impl Into<Value>, method: &str, params: Value) -> Response {
    let request = Request::encode(id, method, &params).unwrap();
    registry.handle(&request)
}

/// The result payload as JSON; panics on an error response.
pub fn result(response: &Response) -> Value {
    match response.decode::<Value>() {
        Some(Ok(value)) => value,
        other => panic!("expected a result, got {:?} / {:?}", other, response.error),
    }
}

/// The error code; panics on a result response.
pub fn error_code(response: &Response) -> i64 {
    assert!(response.result.is_none(), "error response carries a result");
    response.error.as_ref().expect("expected an error").code
}

/// A registry serving widgets from a fresh counting store.
pub fn local_registry() -> (Registry, CountingStore) {
    let store = CountingStore::default();
    let mut registry = Registry::new();
    entity_proxy::setup::local::<Widget, _>(&mut registry, store.clone()).unwrap();
    (registry, store)
}

// =============================================================================
// REST upstream
// =============================================================================

async fn create(Json(mut body): Json<Value>) -> (StatusCode, Json<Value>) {
    body["id"] = json!("w-1");
    (StatusCode::CREATED, Json(body))
}

async fn read(Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    if id == "w-1" {
        Ok(Json(json!({ "id": "w-1", "name": "a" })))
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

async fn update(Path(id): Path<String>, Json(mut body): Json<Value>) -> Json<Value> {
    body["id"] = json!(id);
    Json(body)
}

async fn delete(Path(id): Path<String>) -> StatusCode {
    if id == "w-1" {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// Echo the raw query string so tests can inspect it.
async fn search(RawQuery(query): RawQuery) -> Json<Value> {
    Json(json!({ "query": query }))
}

async fn patch(RawQuery(query): RawQuery, Json(body): Json<Value>) -> Json<Value> {
    Json(json!({ "query": query, "data": body }))
}

fn upstream_router() -> Router {
    Router::new()
        .route("/widget/", post(create).get(search).patch(patch))
        .route("/widget/:id", get(read).put(update).delete(delete))
}

/// Run the REST upstream on its own runtime thread; returns its base url.
///
/// The proxy side uses a blocking client, so it must be driven from a plain
/// test thread rather than inside a runtime.
pub fn start_upstream() -> String {
    let (tx, rx) = mpsc::channel::<SocketAddr>();
    thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, upstream_router()).await.unwrap();
        });
    });
    format!("http://{}", rx.recv().unwrap())
}
