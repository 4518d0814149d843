//! dispatch — method-name-keyed handlers over a JSON-RPC style envelope.
//!
//! A [`Registry`] maps method names (`widget.create`, `widget.search`, ...)
//! to handlers. Handlers are produced by [`bind`] / [`bind_unit`], which turn
//! any typed `Fn(Req) -> Result<Res, ProxyError>` into an untyped handler:
//! decode the params, call the backend, encode a result or an error, and
//! keep the correlation id on both paths.
//!
//! ```ignore
//! use entity_proxy::dispatch::{bind, Registry, Request};
//!
//! let mut registry = Registry::new();
//! registry.register("widget.read", bind(move |req| proxy.read(req)));
//!
//! let response = registry.handle_slice(br#"{"jsonrpc":"2.0","id":7,"method":"widget.read","params":{"id":"w-1"}}"#);
//! assert_eq!(response.id, 7);
//! ```

mod binder;
pub mod codes;
mod envelope;
mod registry;

pub use binder::{bind, bind_unit};
pub use envelope::{ErrorObject, Request, Response, JSONRPC_VERSION};
pub use registry::{Handler, Registry};

// HTTP transport (requires "http" feature)
#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{router, serve};
