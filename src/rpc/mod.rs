//! rpc — the capability contract over request/reply messaging.
//!
//! Client side: [`RpcProxy`] turns each action into a call on
//! `{prefix}.{entity}.{action}` through an [`RpcClient`]; [`BusRpcClient`] is
//! the bundled client, doing request/reply over a [`crate::bus`] queue pair.
//!
//! Serving side: [`serve`] listens on the same topics and answers from a
//! [`crate::dispatch::Registry`], so an RPC proxy in one process can talk to a
//! local proxy in another.

mod client;
mod proxy;
mod responder;

pub use client::{BusRpcClient, RpcClient, RpcError, CORRELATION_ID, REPLY_TO};
pub use proxy::RpcProxy;
pub use responder::{serve, ResponderHandle, ResponderStats};
