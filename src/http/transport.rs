//! The HTTP client the adapter talks through.

use std::sync::OnceLock;

use reqwest::Method;
use thiserror::Error;
use tracing::debug;

/// One outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    /// JSON body, if any.
    pub body: Option<Vec<u8>>,
}

/// A received response. `body` is only filled in for 2xx statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level failure: no usable response at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("http request failed: {0}")]
    Request(String),
    #[error("reading response body failed: {0}")]
    Body(String),
}

/// Sends requests. Retries, TLS and pooling are the implementation's business.
pub trait HttpTransport: Send + Sync {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking reqwest client.
///
/// The client is built on the first `send`, so a transport can be created
/// inside an async runtime as long as calls run on a blocking thread.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: OnceLock<reqwest::blocking::Client>,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (timeouts, TLS, default headers).
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self {
            client: OnceLock::from(client),
        }
    }

    fn client(&self) -> &reqwest::blocking::Client {
        self.client.get_or_init(reqwest::blocking::Client::new)
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client().request(request.method.clone(), &request.url);
        if let Some(body) = request.body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = builder
            .send()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        let status = response.status().as_u16();
        debug!(method = %request.method, url = %request.url, status, "http response");

        if !response.status().is_success() {
            return Ok(HttpResponse {
                status,
                body: Vec::new(),
            });
        }

        let body = response
            .bytes()
            .map_err(|e| TransportError::Body(e.to_string()))?;
        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}
