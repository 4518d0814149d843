//! RpcProxy - the capability contract as topic calls.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use super::client::RpcClient;
use crate::api::{
    raw_from_bytes, topic, Action, Create, Delete, Patch, Proxy, ProxyError, RawResult, Read,
    Search, Update,
};

/// Calls `{prefix}.{entity}.{action}` through an [`RpcClient`], with one
/// timeout for every action.
pub struct RpcProxy {
    client: Arc<dyn RpcClient>,
    prefix: String,
    entity: String,
    timeout: Duration,
}

impl RpcProxy {
    pub fn new(
        client: Arc<dyn RpcClient>,
        prefix: impl Into<String>,
        entity: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            prefix: prefix.into(),
            entity: entity.into(),
            timeout,
        }
    }

    pub fn topic(&self, action: Action) -> String {
        topic(&self.prefix, &self.entity, action)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn call<Req: Serialize>(&self, action: Action, req: &Req) -> Result<Vec<u8>, ProxyError> {
        let topic = self.topic(action);
        let payload = serde_json::to_vec(req).map_err(|e| ProxyError::Encode(e.to_string()))?;
        debug!(%topic, "rpc call");
        Ok(self.client.request(&topic, payload, self.timeout)?)
    }
}

impl Proxy for RpcProxy {
    fn create(&self, req: Create) -> Result<RawResult, ProxyError> {
        raw_from_bytes(self.call(Action::Create, &req)?)
    }

    fn read(&self, req: Read) -> Result<RawResult, ProxyError> {
        raw_from_bytes(self.call(Action::Read, &req)?)
    }

    fn update(&self, req: Update) -> Result<RawResult, ProxyError> {
        raw_from_bytes(self.call(Action::Update, &req)?)
    }

    fn delete(&self, req: Delete) -> Result<(), ProxyError> {
        self.call(Action::Delete, &req)?;
        Ok(())
    }

    fn search(&self, req: Search) -> Result<RawResult, ProxyError> {
        raw_from_bytes(self.call(Action::Search, &req)?)
    }

    fn patch(&self, req: Patch) -> Result<RawResult, ProxyError> {
        raw_from_bytes(self.call(Action::Patch, &req)?)
    }
}
