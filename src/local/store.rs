//! EntityStore - the storage engine the local adapter forwards to.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::entity::Entity;
use super::filter::Hook;
use crate::api::StringMap;

/// Abstract entity storage.
///
/// Query semantics (how `where`, `sort` and `preload` are interpreted)
/// belong to the implementation.
pub trait EntityStore: Send + Sync {
    /// Make the store ready for `E`. Called once at wiring time; a failure
    /// means the entity must not be served.
    fn prepare<E: Entity>(&self) -> Result<(), StoreError>;

    /// Insert a new entity, assigning an identity if it has none.
    fn create<E: Entity>(&self, entity: E) -> Result<E, StoreError>;

    /// Fetch an entity by id.
    fn read<E: Entity>(&self, id: &str, preload: &StringMap) -> Result<E, StoreError>;

    /// Replace an existing entity.
    fn update<E: Entity>(&self, id: &str, entity: E) -> Result<E, StoreError>;

    /// Remove an existing entity.
    fn delete<E: Entity>(&self, id: &str) -> Result<(), StoreError>;

    /// List one page of entities.
    fn search<E: Entity>(&self, query: &SearchQuery) -> Result<Page<E>, StoreError>;

    /// Overwrite the given fields of an existing entity.
    fn patch<E: Entity>(
        &self,
        id: &str,
        data: &Map<String, Value>,
        preload: &StringMap,
    ) -> Result<E, StoreError>;
}

/// Search parameters as handed to the store.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub skip: u64,
    pub take: u64,
    pub where_: StringMap,
    pub sort: StringMap,
    pub preload: StringMap,
    pub hooks: Vec<Hook>,
}

/// One window of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<E> {
    pub skip: u64,
    pub take: u64,
    /// Matches before the window was applied.
    pub total: u64,
    pub items: Vec<E>,
}

/// Error type for store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("not found: {collection}:{id}")]
    NotFound { collection: String, id: String },
    #[error("already exists: {collection}:{id}")]
    Conflict { collection: String, id: String },
    #[error("collection {0} is not prepared")]
    UnknownCollection(String),
    #[error("invalid collection name: {0:?}")]
    InvalidCollection(String),
    #[error("invalid sort direction {direction:?} for field {field}")]
    InvalidSort { field: String, direction: String },
    #[error("store serialization error: {0}")]
    Serde(String),
    #[error("store error: {0}")]
    Storage(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}
