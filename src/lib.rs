pub mod api;
pub mod bus;
pub mod config;
pub mod dispatch;
pub mod http;
pub mod local;
pub mod rpc;
pub mod setup;

pub use api::{Action, Proxy, ProxyError};
pub use config::{BackendConfig, ConfigError};
pub use dispatch::{bind, bind_unit, Registry};
pub use local::{Entity, EntityStore, InMemoryEntityStore, LocalProxy};
pub use setup::{setup, SetupError};
