//! The serving side: expose a registry on the topic namespace.

use std::sync::mpsc::{self, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde_json::value::RawValue;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::client::{CORRELATION_ID, REPLY_TO};
use crate::api::{method, topic, Action};
use crate::bus::{Listener, Message, Sender};
use crate::dispatch::{ErrorObject, Registry, Request, Response};

/// Counters reported by a stopped responder.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResponderStats {
    /// Requests answered with a result.
    pub handled: usize,
    /// Requests answered with an error, or that could not be answered.
    pub failed: usize,
    /// Listen cycles completed.
    pub polls: usize,
}

impl ResponderStats {
    fn merge(self, other: Self) -> Self {
        Self {
            handled: self.handled + other.handled,
            failed: self.failed + other.failed,
            polls: self.polls + other.polls,
        }
    }
}

struct Worker {
    stop_tx: mpsc::Sender<()>,
    handle: Option<JoinHandle<ResponderStats>>,
}

impl Worker {
    fn stop(mut self) -> ResponderStats {
        let _ = self.stop_tx.send(());
        let Some(handle) = self.handle.take() else {
            return ResponderStats::default();
        };
        match handle.join() {
            Ok(stats) => stats,
            Err(_) => {
                warn!("responder worker panicked; its stats are lost");
                ResponderStats::default()
            }
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
    }
}

/// Handle to the listener threads. Drop or call `stop()` to shut down.
pub struct ResponderHandle {
    workers: Vec<Worker>,
}

impl ResponderHandle {
    /// Stop every listener and wait for them. Returns combined stats.
    pub fn stop(self) -> ResponderStats {
        self.workers
            .into_iter()
            .map(Worker::stop)
            .fold(ResponderStats::default(), ResponderStats::merge)
    }

    /// Signal stop without waiting.
    pub fn signal_stop(&self) {
        for worker in &self.workers {
            let _ = worker.stop_tx.send(());
        }
    }
}

/// Listen on `{prefix}.{entity}.{action}` for all six actions and answer each
/// message by dispatching `{entity}.{action}` on `registry`.
///
/// The reply envelope goes to the message's `reply-to` queue; its id is the
/// message's correlation id.
///
/// ```ignore
/// let bus = InMemoryBus::new();
/// let handle = rpc::serve(registry, bus.clone(), "svc", "widget", Duration::from_millis(50));
/// // ...
/// let stats = handle.stop();
/// ```
pub fn serve<B>(
    registry: Arc<Registry>,
    bus: B,
    prefix: &str,
    entity: &str,
    poll_interval: Duration,
) -> ResponderHandle
where
    B: Sender + Listener + Clone + 'static,
{
    let workers = Action::ALL
        .iter()
        .map(|&action| {
            spawn_worker(
                Arc::clone(&registry),
                bus.clone(),
                topic(prefix, entity, action),
                method(entity, action),
                poll_interval,
            )
        })
        .collect();

    info!(%prefix, %entity, "rpc responder started");
    ResponderHandle { workers }
}

fn spawn_worker<B>(
    registry: Arc<Registry>,
    bus: B,
    topic: String,
    method: String,
    poll_interval: Duration,
) -> Worker
where
    B: Sender + Listener + 'static,
{
    let (stop_tx, stop_rx) = mpsc::channel();
    // a zero timeout would spin the listen loop
    let poll_ms = u64::try_from(poll_interval.as_millis())
        .unwrap_or(u64::MAX)
        .max(1);

    let handle = thread::spawn(move || {
        let mut stats = ResponderStats::default();

        loop {
            match stop_rx.try_recv() {
                Ok(()) | Err(TryRecvError::Disconnected) => break,
                Err(TryRecvError::Empty) => {}
            }

            stats.polls += 1;

            match bus.listen(&topic, poll_ms) {
                Ok(Some(message)) => {
                    if respond(&registry, &bus, &method, message) {
                        stats.handled += 1;
                    } else {
                        stats.failed += 1;
                    }
                }
                Ok(None) => {}
                Err(e) => warn!(%topic, error = %e, "listen failed"),
            }
        }

        stats
    });

    Worker {
        stop_tx,
        handle: Some(handle),
    }
}

/// Dispatch one message and send the reply. True when the reply is a result
/// and was delivered.
fn respond<B: Sender>(registry: &Registry, bus: &B, method: &str, message: Message) -> bool {
    let correlation_id = message
        .metadata(CORRELATION_ID)
        .unwrap_or(message.id.as_str())
        .to_string();
    let id = Value::String(correlation_id.clone());

    let response = match params(&message) {
        Ok(params) => registry.handle(&Request::new(id, method, params)),
        Err(error) => Response::error(id, error),
    };
    let ok = !response.is_error();
    debug!(%method, %correlation_id, ok, "rpc request handled");

    let Some(reply_to) = message.metadata(REPLY_TO) else {
        warn!(%method, %correlation_id, "message has no reply-to; reply dropped");
        return false;
    };

    let payload = match serde_json::to_vec(&response) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(%method, error = %e, "reply encoding failed");
            return false;
        }
    };

    let reply = Message::new(Uuid::new_v4().to_string(), reply_to, payload)
        .with_metadata(CORRELATION_ID, correlation_id.as_str());
    if let Err(e) = bus.send(reply_to, reply) {
        warn!(%reply_to, error = %e, "reply send failed");
        return false;
    }

    ok
}

fn params(message: &Message) -> Result<Box<RawValue>, ErrorObject> {
    let text = message
        .payload_str()
        .ok_or_else(|| ErrorObject::parse_error("payload is not UTF-8"))?;
    RawValue::from_string(text.to_string()).map_err(|e| ErrorObject::parse_error(e.to_string()))
}
