//! Remote backend configuration.
//!
//! Deserializes from any serde format, tagged by `backend`:
//!
//! ```json
//! { "backend": "http", "entity": "widget", "base_url": "http://widgets.svc" }
//! { "backend": "rpc", "entity": "widget", "prefix": "svc", "timeout_ms": 2000 }
//! ```
//!
//! or from `ENTITY_PROXY_*` environment variables via
//! [`BackendConfig::from_env`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_BACKEND: &str = "ENTITY_PROXY_BACKEND";
pub const ENV_ENTITY: &str = "ENTITY_PROXY_ENTITY";
pub const ENV_BASE_URL: &str = "ENTITY_PROXY_BASE_URL";
pub const ENV_PREFIX: &str = "ENTITY_PROXY_PREFIX";
pub const ENV_TIMEOUT_MS: &str = "ENTITY_PROXY_TIMEOUT_MS";

/// Per-call RPC timeout when none is configured.
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Which remote backend serves an entity, and where it lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum BackendConfig {
    Http {
        entity: String,
        base_url: String,
    },
    Rpc {
        entity: String,
        prefix: String,
        #[serde(default = "default_timeout_ms")]
        timeout_ms: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("unknown backend `{0}` (expected `http` or `rpc`)")]
    UnknownBackend(String),
    #[error("invalid {var} `{value}`: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl BackendConfig {
    pub fn entity(&self) -> &str {
        match self {
            Self::Http { entity, .. } | Self::Rpc { entity, .. } => entity,
        }
    }

    /// Load from `ENTITY_PROXY_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| {
            lookup(var)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(var))
        };

        let backend = required(ENV_BACKEND)?;
        let entity = required(ENV_ENTITY)?;

        match backend.to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http {
                entity,
                base_url: required(ENV_BASE_URL)?,
            }),
            "rpc" => {
                let timeout_ms = match lookup(ENV_TIMEOUT_MS).filter(|v| !v.is_empty()) {
                    Some(value) => value.parse().map_err(|e: std::num::ParseIntError| {
                        ConfigError::Invalid {
                            var: ENV_TIMEOUT_MS,
                            value: value.clone(),
                            reason: e.to_string(),
                        }
                    })?,
                    None => DEFAULT_TIMEOUT_MS,
                };
                Ok(Self::Rpc {
                    entity,
                    prefix: required(ENV_PREFIX)?,
                    timeout_ms,
                })
            }
            _ => Err(ConfigError::UnknownBackend(backend)),
        }
    }

    /// The per-call timeout, for RPC backends.
    pub fn timeout(&self) -> Option<Duration> {
        match self {
            Self::Http { .. } => None,
            Self::Rpc { timeout_ms, .. } => Some(Duration::from_millis(*timeout_ms)),
        }
    }
}
