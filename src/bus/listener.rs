//! Listener trait for point-to-point messaging.

use super::message::{BusError, Message};

/// Listens on a named queue. Listeners on the same queue compete: each
/// message is delivered to one of them.
pub trait Listener: Send + Sync {
    /// Block until a message is available on `queue` or `timeout_ms` passes.
    fn listen(&self, queue: &str, timeout_ms: u64) -> Result<Option<Message>, BusError>;

    /// Drop `queue` and anything still waiting on it. Used for one-shot
    /// reply queues once the caller stops waiting.
    fn close(&self, _queue: &str) -> Result<(), BusError> {
        Ok(())
    }
}
