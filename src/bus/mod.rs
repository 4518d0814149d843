//! bus — point-to-point messaging used by the RPC adapter.
//!
//! ```text
//! requester                                  responder
//!    │ send("{prefix}.{entity}.{action}")        │
//!    ├──────────────────────────────────────────►│ listen(topic)
//!    │                                           │ registry.handle(..)
//!    │ listen(reply-to)     send(reply-to)       │
//!    │◄──────────────────────────────────────────┤
//! ```
//!
//! `Sender`/`Listener` are the seam for a real broker; [`InMemoryBus`] is
//! included for tests and single-process deployments.

mod in_memory;
mod listener;
mod message;
mod sender;

pub use in_memory::InMemoryBus;
pub use listener::Listener;
pub use message::{BusError, Message};
pub use sender::Sender;
