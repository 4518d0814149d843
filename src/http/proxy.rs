//! HttpProxy - the capability contract as REST calls.

use reqwest::Method;
use tracing::{debug, warn};

use super::query::{preload_query, search_query, with_query};
use super::transport::{HttpRequest, HttpTransport, ReqwestTransport};
use crate::api::{
    raw_from_bytes, Create, Delete, Patch, Proxy, ProxyError, RawResult, Read, Search, Update,
};

/// REST client for one entity under one base url.
pub struct HttpProxy<T = ReqwestTransport> {
    base: String,
    entity: String,
    transport: T,
}

impl HttpProxy<ReqwestTransport> {
    /// Talk to `{base}/{entity}/` with a default blocking reqwest client.
    pub fn new(base: impl Into<String>, entity: impl Into<String>) -> Self {
        Self::with_transport(base, entity, ReqwestTransport::new())
    }
}

impl<T: HttpTransport> HttpProxy<T> {
    pub fn with_transport(base: impl Into<String>, entity: impl Into<String>, transport: T) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self {
            base,
            entity: entity.into(),
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `{base}/{entity}/{id}`, or the collection `{base}/{entity}/` when `id` is empty.
    pub fn path(&self, id: &str) -> String {
        if id.is_empty() {
            format!("{}/{}/", self.base, self.entity)
        } else {
            format!("{}/{}/{}", self.base, self.entity, id)
        }
    }

    /// Issue one call. Non-2xx statuses fail before the body is looked at.
    fn call(&self, method: Method, url: String, body: Option<Vec<u8>>) -> Result<Vec<u8>, ProxyError> {
        debug!(%method, %url, "http call");
        let response = self.transport.send(HttpRequest {
            method,
            url: url.clone(),
            body,
        })?;

        if !response.is_success() {
            warn!(%url, status = response.status, "upstream rejected call");
            return Err(ProxyError::Status {
                status: response.status,
                url,
            });
        }

        Ok(response.body)
    }
}

impl<T: HttpTransport> Proxy for HttpProxy<T> {
    fn create(&self, req: Create) -> Result<RawResult, ProxyError> {
        let body = req.entity.get().as_bytes().to_vec();
        let bytes = self.call(Method::POST, self.path(""), Some(body))?;
        raw_from_bytes(bytes)
    }

    fn read(&self, req: Read) -> Result<RawResult, ProxyError> {
        let url = with_query(self.path(&req.id), &preload_query(&req.preload));
        let bytes = self.call(Method::GET, url, None)?;
        raw_from_bytes(bytes)
    }

    fn update(&self, req: Update) -> Result<RawResult, ProxyError> {
        let body = req.entity.get().as_bytes().to_vec();
        let bytes = self.call(Method::PUT, self.path(&req.id), Some(body))?;
        raw_from_bytes(bytes)
    }

    fn delete(&self, req: Delete) -> Result<(), ProxyError> {
        self.call(Method::DELETE, self.path(&req.id), None)?;
        Ok(())
    }

    fn search(&self, req: Search) -> Result<RawResult, ProxyError> {
        let url = with_query(self.path(""), &search_query(&req));
        let bytes = self.call(Method::GET, url, None)?;
        raw_from_bytes(bytes)
    }

    fn patch(&self, req: Patch) -> Result<RawResult, ProxyError> {
        let url = with_query(self.path(""), &preload_query(&req.preload));
        let body = serde_json::to_vec(&req.data).map_err(|e| ProxyError::Encode(e.to_string()))?;
        let bytes = self.call(Method::PATCH, url, Some(body))?;
        raw_from_bytes(bytes)
    }
}
