//! Request / response envelope.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::Value;

use super::codes;
use crate::api::ProxyError;

pub const JSONRPC_VERSION: &str = "2.0";

fn version() -> String {
    JSONRPC_VERSION.to_string()
}

/// An inbound call.
///
/// `id` is the correlation id and is copied verbatim onto the response.
/// `params` is kept raw so the binder can decode it into the request type
/// the method expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    #[serde(default = "version")]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Box<RawValue>>,
}

impl Request {
    pub fn new(id: impl Into<Value>, method: impl Into<String>, params: Box<RawValue>) -> Self {
        Self {
            jsonrpc: version(),
            id: id.into(),
            method: method.into(),
            params: Some(params),
        }
    }

    /// Build a request from any serializable params.
    pub fn encode<T: Serialize>(
        id: impl Into<Value>,
        method: impl Into<String>,
        params: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(id, method, serde_json::value::to_raw_value(params)?))
    }
}

/// A structured error payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorObject {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(codes::PARSE_ERROR, message)
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(codes::METHOD_NOT_FOUND, format!("method not found: {}", method))
    }
}

impl From<&ProxyError> for ErrorObject {
    fn from(err: &ProxyError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

/// An outbound reply: exactly one of `result` / `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    #[serde(default = "version")]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Box<RawValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
}

impl Response {
    pub fn result(id: Value, result: Box<RawValue>) -> Self {
        Self {
            jsonrpc: version(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, error: ErrorObject) -> Self {
        Self {
            jsonrpc: version(),
            id,
            result: None,
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Decode the result into a typed value.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T, serde_json::Error>> {
        self.result.as_ref().map(|raw| serde_json::from_str(raw.get()))
    }
}
