//! Error type shared by every backend.

use thiserror::Error;

use crate::dispatch::codes;
use crate::http::TransportError;
use crate::local::{StoreError, ValidationError};
use crate::rpc::RpcError;

/// A failed capability call. Every backend surfaces exactly one of these and
/// never a partial result.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The request itself is unusable (e.g. an empty id).
    #[error("invalid params: {0}")]
    InvalidParams(String),
    /// A payload could not be decoded into the expected shape.
    #[error("decode failed: {0}")]
    Decode(String),
    /// The hydrated entity failed field validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The storage engine rejected the call.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The HTTP service answered with a non-2xx status.
    #[error("upstream returned status {status} for {url}")]
    Status { status: u16, url: String },
    /// The HTTP request never produced a response.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The RPC call failed or timed out.
    #[error(transparent)]
    Rpc(#[from] RpcError),
    /// A result could not be encoded.
    #[error("encode failed: {0}")]
    Encode(String),
}

impl ProxyError {
    /// Map this error to a JSON-RPC error code.
    pub fn code(&self) -> i64 {
        match self {
            ProxyError::InvalidParams(_) => codes::INVALID_PARAMS,
            ProxyError::Decode(_) => codes::PARSE_ERROR,
            ProxyError::Validation(_) => codes::INVALID_PARAMS,
            ProxyError::Store(StoreError::NotFound { .. }) => codes::NOT_FOUND,
            ProxyError::Store(_) => codes::SERVER_ERROR,
            ProxyError::Status { status: 404, .. } => codes::NOT_FOUND,
            ProxyError::Status { .. } => codes::UPSTREAM_ERROR,
            ProxyError::Transport(_) => codes::UPSTREAM_ERROR,
            ProxyError::Rpc(RpcError::Remote { code, .. }) => *code,
            ProxyError::Rpc(_) => codes::UPSTREAM_ERROR,
            ProxyError::Encode(_) => codes::INTERNAL_ERROR,
        }
    }
}

impl From<serde_json::Error> for ProxyError {
    fn from(err: serde_json::Error) -> Self {
        ProxyError::Decode(err.to_string())
    }
}
