//! Sender trait for point-to-point messaging.

use super::message::{BusError, Message};

/// Delivers messages to a named queue where exactly one listener consumes
/// each message.
pub trait Sender: Send + Sync {
    fn send(&self, queue: &str, message: Message) -> Result<(), BusError>;
}
