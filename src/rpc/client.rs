//! Request/reply over the bus.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::bus::{BusError, Listener, Message, Sender};
use crate::dispatch::Response;

/// Metadata key naming the queue a reply should be sent to.
pub const REPLY_TO: &str = "reply-to";
/// Metadata key pairing a reply with its request.
pub const CORRELATION_ID: &str = "correlation-id";

/// RPC-level failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcError {
    #[error("no reply on `{topic}` within {timeout_ms}ms")]
    Timeout { topic: String, timeout_ms: u64 },
    #[error("remote error {code}: {message}")]
    Remote { code: i64, message: String },
    #[error("malformed reply: {0}")]
    Reply(String),
    #[error(transparent)]
    Bus(#[from] BusError),
}

/// The external RPC collaborator: send a payload on a topic, wait for the
/// reply payload. Marshalling beyond bytes is the caller's business.
pub trait RpcClient: Send + Sync {
    fn request(&self, topic: &str, payload: Vec<u8>, timeout: Duration)
        -> Result<Vec<u8>, RpcError>;
}

/// [`RpcClient`] over any point-to-point bus.
///
/// Each call sends to `topic` with a fresh correlation id and waits on a
/// private reply queue `{topic}.reply.{correlation-id}`, which is closed
/// once the call returns.
#[derive(Clone)]
pub struct BusRpcClient<B> {
    bus: B,
}

impl<B: Sender + Listener> BusRpcClient<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }
}

impl<B: Sender + Listener> RpcClient for BusRpcClient<B> {
    fn request(
        &self,
        topic: &str,
        payload: Vec<u8>,
        timeout: Duration,
    ) -> Result<Vec<u8>, RpcError> {
        let correlation_id = Uuid::new_v4().to_string();
        let reply_to = format!("{}.reply.{}", topic, correlation_id);
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);

        let message = Message::new(correlation_id.clone(), topic, payload)
            .with_metadata(REPLY_TO, reply_to.as_str())
            .with_metadata(CORRELATION_ID, correlation_id.as_str());
        self.bus.send(topic, message)?;
        debug!(%topic, %correlation_id, "rpc request sent");

        let reply = self.bus.listen(&reply_to, timeout_ms);
        self.bus.close(&reply_to)?;
        let Some(reply) = reply? else {
            warn!(%topic, %correlation_id, timeout_ms, "rpc request timed out");
            return Err(RpcError::Timeout {
                topic: topic.to_string(),
                timeout_ms,
            });
        };

        let response: Response = serde_json::from_slice(&reply.payload)
            .map_err(|e| RpcError::Reply(e.to_string()))?;

        if let Some(error) = response.error {
            return Err(RpcError::Remote {
                code: error.code,
                message: error.message,
            });
        }

        response
            .result
            .map(|raw| raw.get().as_bytes().to_vec())
            .ok_or_else(|| RpcError::Reply("reply carries neither result nor error".into()))
    }
}
