//! In-memory named queues for tests and single-process wiring.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use super::{BusError, Listener, Message, Sender};

#[derive(Default)]
struct Shared {
    queues: Mutex<HashMap<String, VecDeque<Message>>>,
    ready: Condvar,
}

/// Thread-safe set of FIFO queues keyed by name. Clones share the same queues.
///
/// ```
/// use entity_proxy::bus::{InMemoryBus, Listener, Message, Sender};
///
/// let bus = InMemoryBus::new();
/// bus.send("widget.read", Message::new("m-1", "widget.read", b"{}".to_vec())).unwrap();
///
/// let message = bus.listen("widget.read", 10).unwrap().unwrap();
/// assert_eq!(message.id, "m-1");
/// assert!(bus.listen("widget.read", 10).unwrap().is_none());
/// ```
#[derive(Clone, Default)]
pub struct InMemoryBus {
    shared: Arc<Shared>,
}

impl InMemoryBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages waiting on `queue`.
    pub fn pending(&self, queue: &str) -> usize {
        self.shared
            .queues
            .lock()
            .map(|queues| queues.get(queue).map_or(0, VecDeque::len))
            .unwrap_or(0)
    }

    /// Names of queues currently holding messages. A queue is dropped once a
    /// listener drains it.
    pub fn queues(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .shared
            .queues
            .lock()
            .map(|queues| queues.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

impl Sender for InMemoryBus {
    fn send(&self, queue: &str, message: Message) -> Result<(), BusError> {
        let mut queues = self.shared.queues.lock().map_err(|_| BusError::Poisoned)?;
        queues.entry(queue.to_string()).or_default().push_back(message);
        self.shared.ready.notify_all();
        Ok(())
    }
}

impl Listener for InMemoryBus {
    fn listen(&self, queue: &str, timeout_ms: u64) -> Result<Option<Message>, BusError> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        let mut queues = self.shared.queues.lock().map_err(|_| BusError::Poisoned)?;

        loop {
            if let Some(pending) = queues.get_mut(queue) {
                let message = pending.pop_front();
                if pending.is_empty() {
                    queues.remove(queue);
                }
                if message.is_some() {
                    return Ok(message);
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }

            let (guard, _) = self
                .shared
                .ready
                .wait_timeout(queues, deadline - now)
                .map_err(|_| BusError::Poisoned)?;
            queues = guard;
        }
    }

    fn close(&self, queue: &str) -> Result<(), BusError> {
        let mut queues = self.shared.queues.lock().map_err(|_| BusError::Poisoned)?;
        queues.remove(queue);
        Ok(())
    }
}
