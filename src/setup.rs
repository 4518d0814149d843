//! Wiring: bind a backend's six actions into a registry.
//!
//! ```ignore
//! let mut registry = Registry::new();
//! setup::http_proxy(&mut registry, "http://widgets.svc", "widget");
//! setup::local::<Task, _>(&mut registry, InMemoryEntityStore::new())?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{error, info};

pub use crate::api::{method, topic};

use crate::api::{Action, Create, Delete, Patch, Proxy, Read, Search, Update};
use crate::config::{BackendConfig, ConfigError};
use crate::dispatch::{bind, bind_unit, Handler, Registry};
use crate::http::HttpProxy;
use crate::local::{Entity, EntityStore, LocalProxy, StoreError};
use crate::rpc::{RpcClient, RpcProxy};

/// Wiring-time failure. Nothing is registered for the entity.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("cannot serve `{entity}`: {source}")]
    Storage {
        entity: String,
        #[source]
        source: StoreError,
    },
    #[error("`{entity}` is configured for rpc but no rpc client was given")]
    MissingRpcClient { entity: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Register `{entity}.create` .. `{entity}.patch` against `proxy`.
pub fn setup(registry: &mut Registry, entity: &str, proxy: Arc<dyn Proxy>) {
    for action in Action::ALL {
        registry.register(method(entity, action), handler(action, Arc::clone(&proxy)));
    }
    info!(%entity, "entity methods registered");
}

fn handler(action: Action, proxy: Arc<dyn Proxy>) -> Handler {
    match action {
        Action::Create => bind(move |req: Create| proxy.create(req)),
        Action::Read => bind(move |req: Read| proxy.read(req)),
        Action::Update => bind(move |req: Update| proxy.update(req)),
        Action::Delete => bind_unit(move |req: Delete| proxy.delete(req)),
        Action::Search => bind(move |req: Search| proxy.search(req)),
        Action::Patch => bind(move |req: Patch| proxy.patch(req)),
    }
}

/// Serve `entity` from a REST service rooted at `base`.
pub fn http_proxy(registry: &mut Registry, base: &str, entity: &str) {
    setup(registry, entity, Arc::new(HttpProxy::new(base, entity)));
}

/// Serve `entity` through `{prefix}.{entity}.{action}` topic calls.
pub fn rpc_proxy(
    registry: &mut Registry,
    client: Arc<dyn RpcClient>,
    prefix: &str,
    entity: &str,
    timeout: Duration,
) {
    setup(
        registry,
        entity,
        Arc::new(RpcProxy::new(client, prefix, entity, timeout)),
    );
}

/// Serve `E` from a local store. Fails, registering nothing, when the store
/// cannot be prepared for `E`.
pub fn local<E, S>(registry: &mut Registry, store: S) -> Result<(), SetupError>
where
    E: Entity,
    S: EntityStore + 'static,
{
    let proxy = LocalProxy::<E, S>::new(store).map_err(|source| {
        error!(entity = E::NAME, error = %source, "local backend setup failed");
        SetupError::Storage {
            entity: E::NAME.to_string(),
            source,
        }
    })?;

    setup(registry, E::NAME, Arc::new(proxy));
    Ok(())
}

/// Serve the configured entity from the configured remote backend.
pub fn remote(
    registry: &mut Registry,
    config: &BackendConfig,
    rpc_client: Option<Arc<dyn RpcClient>>,
) -> Result<(), SetupError> {
    match config {
        BackendConfig::Http { entity, base_url } => {
            http_proxy(registry, base_url, entity);
            Ok(())
        }
        BackendConfig::Rpc {
            entity,
            prefix,
            timeout_ms,
        } => {
            let client = rpc_client.ok_or_else(|| {
                error!(%entity, "rpc backend configured without a client");
                SetupError::MissingRpcClient {
                    entity: entity.clone(),
                }
            })?;
            rpc_proxy(
                registry,
                client,
                prefix,
                entity,
                Duration::from_millis(*timeout_ms),
            );
            Ok(())
        }
    }
}
