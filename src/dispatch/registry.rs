//! Registry — method name → handler, and dispatch.
//!
//! The registry is an explicit object handed to the wiring functions; there
//! is no process-wide instance.
//!
//! ## Example
//!
//! ```ignore
//! use entity_proxy::dispatch::{Registry, Request};
//!
//! let mut registry = Registry::new();
//! entity_proxy::setup::http_proxy(&mut registry, "http://widgets.svc", "widget");
//!
//! let response = registry.handle(&request);
//! ```

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use super::envelope::{ErrorObject, Request, Response};

/// A bound method: one request in, exactly one response out.
pub type Handler = Box<dyn Fn(&Request) -> Response + Send + Sync>;

/// Method-name-keyed handler table.
#[derive(Default)]
pub struct Registry {
    handlers: HashMap<String, Handler>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. A second registration for the same method
    /// replaces the first.
    pub fn register(&mut self, method: impl Into<String>, handler: Handler) {
        let method = method.into();
        if self.handlers.insert(method.clone(), handler).is_some() {
            warn!(%method, "handler replaced");
        }
    }

    /// Register a handler, builder style.
    pub fn with(mut self, method: impl Into<String>, handler: Handler) -> Self {
        self.register(method, handler);
        self
    }

    /// Dispatch one request.
    pub fn handle(&self, request: &Request) -> Response {
        let Some(handler) = self.handlers.get(&request.method) else {
            warn!(method = %request.method, id = %request.id, "unknown method");
            return Response::error(
                request.id.clone(),
                ErrorObject::method_not_found(&request.method),
            );
        };

        debug!(method = %request.method, id = %request.id, "dispatch");
        handler(request)
    }

    /// Parse a raw envelope and dispatch it.
    ///
    /// A body that is not an envelope at all gets a parse error with a null id.
    pub fn handle_slice(&self, bytes: &[u8]) -> Response {
        match serde_json::from_slice::<Request>(bytes) {
            Ok(request) => self.handle(&request),
            Err(e) => {
                warn!(error = %e, "malformed envelope");
                Response::error(Value::Null, ErrorObject::parse_error(e.to_string()))
            }
        }
    }

    /// Registered method names, sorted.
    pub fn methods(&self) -> Vec<&str> {
        let mut methods: Vec<&str> = self.handlers.keys().map(|s| s.as_str()).collect();
        methods.sort_unstable();
        methods
    }

    pub fn contains(&self, method: &str) -> bool {
        self.handlers.contains_key(method)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
