//! local — the capability contract served straight from a storage engine.
//!
//! Each call is one synchronous pipeline:
//!
//! ```text
//! create / update:  payload ──decode──▶ E ──validate──▶ store
//! read / delete:    id ─────────────────────────────────▶ store
//! search:           filters ──materialize(E::scopes)──▶ hooks ──▶ store
//! patch:            sparse field map ────────────────────▶ store   (no validation)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use entity_proxy::local::{Entity, InMemoryEntityStore, LocalProxy, ValidationError};
//!
//! #[derive(Serialize, Deserialize, Default)]
//! #[serde(default)]
//! struct Widget {
//!     id: String,
//!     name: String,
//! }
//!
//! impl Entity for Widget {
//!     const NAME: &'static str = "widget";
//!
//!     fn validate(&self) -> Result<(), ValidationError> {
//!         if self.name.is_empty() {
//!             return Err(ValidationError::required("name"));
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let proxy = LocalProxy::<Widget, _>::new(InMemoryEntityStore::new())?;
//! ```

mod entity;
mod filter;
mod in_memory;
mod proxy;
mod store;

pub use entity::{Entity, ValidationError};
pub use filter::{materialize, Hook, NamedFilter};
pub use in_memory::InMemoryEntityStore;
pub use proxy::LocalProxy;
pub use store::{EntityStore, Page, SearchQuery, StoreError};
