//! api — the capability contract every backend implements.
//!
//! A backend is anything that can run the six entity actions against some
//! store: the local storage adapter, the HTTP/REST adapter, or the
//! message-bus RPC adapter. Callers only ever see [`Proxy`], so one set of
//! handlers works unchanged against any of them.
//!
//! ```ignore
//! use std::sync::Arc;
//! use entity_proxy::api::{Proxy, Read};
//!
//! fn fetch(proxy: &Arc<dyn Proxy>) -> Result<String, entity_proxy::ProxyError> {
//!     let raw = proxy.read(Read::new("w-1"))?;
//!     Ok(raw.get().to_string())
//! }
//! ```

mod action;
mod error;
mod proxy;
mod request;

pub use action::{method, topic, Action};
pub use error::ProxyError;
pub use proxy::{empty_object, Proxy, RawResult};
pub(crate) use proxy::raw_from_bytes;
pub use request::{Create, Delete, Filters, Params, Patch, Read, Search, StringMap, Update};

/// Page size used when a search asks for `take == 0`.
pub const DEFAULT_TAKE: u64 = 25;
