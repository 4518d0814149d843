//! The unit carried on a queue.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// A message sent to a named queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Unique identifier for this message
    pub id: String,
    /// Queue the message was sent to
    pub topic: String,
    /// Serialized payload (JSON)
    pub payload: Vec<u8>,
    /// Headers such as `reply-to` and `correlation-id`
    pub metadata: Vec<(String, String)>,
}

impl Message {
    pub fn new(id: impl Into<String>, topic: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            topic: topic.into(),
            payload,
            metadata: Vec::new(),
        }
    }

    /// Create a message with a JSON-serialized payload.
    pub fn encode<T: Serialize>(
        id: impl Into<String>,
        topic: impl Into<String>,
        payload: &T,
    ) -> Result<Self, BusError> {
        let bytes =
            serde_json::to_vec(payload).map_err(|e| BusError::Serialization(e.to_string()))?;
        Ok(Self::new(id, topic, bytes))
    }

    /// Decode the JSON payload.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, BusError> {
        serde_json::from_slice(&self.payload).map_err(|e| BusError::Serialization(e.to_string()))
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((key.into(), value.into()));
        self
    }

    /// First metadata value stored under `key`.
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Get the payload as a string (if valid UTF-8).
    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}

/// Bus-level failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("serialization failed: {0}")]
    Serialization(String),
    #[error("message rejected: {0}")]
    Rejected(String),
    #[error("queue state poisoned")]
    Poisoned,
}
