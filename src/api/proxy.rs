use serde_json::value::RawValue;

use super::error::ProxyError;
use super::request::{Create, Delete, Patch, Read, Search, Update};

/// An encoded result. Remote backends hand their response body through
/// untouched; the local backend encodes the stored entity.
pub type RawResult = Box<RawValue>;

/// The capability contract.
///
/// Implemented by the local storage adapter, the HTTP adapter and the RPC
/// adapter. The trait is object safe so wiring can pick a backend once and
/// hand out an `Arc<dyn Proxy>`.
pub trait Proxy: Send + Sync {
    fn create(&self, req: Create) -> Result<RawResult, ProxyError>;

    fn read(&self, req: Read) -> Result<RawResult, ProxyError>;

    fn update(&self, req: Update) -> Result<RawResult, ProxyError>;

    fn delete(&self, req: Delete) -> Result<(), ProxyError>;

    /// Returns one page of entities.
    fn search(&self, req: Search) -> Result<RawResult, ProxyError>;

    /// Applies a sparse field map; fields not present are left untouched.
    fn patch(&self, req: Patch) -> Result<RawResult, ProxyError>;
}

/// Wrap bytes that are expected to hold a JSON document.
pub(crate) fn raw_from_bytes(bytes: Vec<u8>) -> Result<RawResult, ProxyError> {
    let text = String::from_utf8(bytes).map_err(|e| ProxyError::Decode(e.to_string()))?;
    RawValue::from_string(text).map_err(ProxyError::from)
}

/// `{}` as a raw result.
pub fn empty_object() -> Result<RawResult, ProxyError> {
    RawValue::from_string("{}".to_string()).map_err(|e| ProxyError::Encode(e.to_string()))
}
