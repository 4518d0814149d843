//! HTTP transport for a registry — one JSON-RPC endpoint.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `POST /rpc` — body is a request envelope, reply is a response envelope
//!   (always `200`; failures travel inside the envelope).
//! - `GET /health` — returns `{ "ok": true, "methods": [...] }`.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use entity_proxy::dispatch::{self, Registry};
//!
//! let mut registry = Registry::new();
//! entity_proxy::setup::http_proxy(&mut registry, "http://widgets.svc", "widget");
//!
//! dispatch::serve(Arc::new(registry), "0.0.0.0:3000").await?;
//! ```

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::{error, info};

use super::codes;
use super::envelope::{ErrorObject, Response};
use super::registry::Registry;

/// Build an axum `Router` that dispatches envelopes through the registry.
pub fn router(registry: Arc<Registry>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/rpc", post(rpc_handler))
        .with_state(registry)
}

/// Serve the registry over HTTP at the given address (e.g. `"0.0.0.0:3000"`).
pub async fn serve(registry: Arc<Registry>, addr: &str) -> Result<(), std::io::Error> {
    let app = router(registry);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "serving json-rpc");
    axum::serve(listener, app).await
}

/// `GET /health`
async fn health_handler(State(registry): State<Arc<Registry>>) -> impl IntoResponse {
    Json(json!({ "ok": true, "methods": registry.methods() }))
}

/// `POST /rpc` — handlers block on backend I/O, so they run on the blocking pool.
async fn rpc_handler(State(registry): State<Arc<Registry>>, body: Bytes) -> impl IntoResponse {
    let outcome = tokio::task::spawn_blocking(move || registry.handle_slice(&body)).await;

    match outcome {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!(error = %e, "dispatch task failed");
            let response = Response::error(
                Value::Null,
                ErrorObject::new(codes::INTERNAL_ERROR, e.to_string()),
            );
            (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response()
        }
    }
}
