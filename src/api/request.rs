//! Request shapes shared by all backends.
//!
//! These are transport structures, not domain objects: the entity itself
//! travels as raw JSON and only the local backend ever decodes it.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::{Map, Value};

use super::error::ProxyError;

/// Flat string map used for `where`, `sort` and `preload`.
pub type StringMap = BTreeMap<String, String>;

/// Named filter (hook) arguments: filter name → argument map.
pub type Filters = BTreeMap<String, StringMap>;

/// A request type that can be bound to a method name.
///
/// `check` runs after decoding and before the backend is called.
pub trait Params: Serialize + DeserializeOwned + Send + 'static {
    fn check(&self) -> Result<(), ProxyError> {
        Ok(())
    }
}

fn require_id(id: &str) -> Result<(), ProxyError> {
    if id.is_empty() {
        return Err(ProxyError::InvalidParams("id must not be empty".into()));
    }
    Ok(())
}

/// Create one entity from a raw payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Create {
    pub entity: Box<RawValue>,
}

impl Create {
    pub fn new(entity: Box<RawValue>) -> Self {
        Self { entity }
    }
}

impl Params for Create {}

/// Fetch one entity by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Read {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub preload: StringMap,
}

impl Read {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            preload: StringMap::new(),
        }
    }

    pub fn preload(mut self, relation: impl Into<String>, directive: impl Into<String>) -> Self {
        self.preload.insert(relation.into(), directive.into());
        self
    }
}

impl Params for Read {
    fn check(&self) -> Result<(), ProxyError> {
        require_id(&self.id)
    }
}

/// Replace one entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    #[serde(default)]
    pub id: String,
    pub entity: Box<RawValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hooks: Filters,
}

impl Update {
    pub fn new(id: impl Into<String>, entity: Box<RawValue>) -> Self {
        Self {
            id: id.into(),
            entity,
            hooks: Filters::new(),
        }
    }
}

impl Params for Update {
    fn check(&self) -> Result<(), ProxyError> {
        require_id(&self.id)
    }
}

/// Remove one entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Delete {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hooks: Filters,
}

impl Delete {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            hooks: Filters::new(),
        }
    }
}

impl Params for Delete {
    fn check(&self) -> Result<(), ProxyError> {
        require_id(&self.id)
    }
}

/// List entities matching criteria.
///
/// `take == 0` means "use the default page size".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Search {
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub take: u64,
    #[serde(default, rename = "where", skip_serializing_if = "BTreeMap::is_empty")]
    pub where_: StringMap,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sort: StringMap,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub preload: StringMap,
    /// Named filters. Also read from `hooks`; a payload carrying both keys is
    /// rejected as a duplicate field.
    #[serde(default, alias = "hooks", skip_serializing_if = "BTreeMap::is_empty")]
    pub filters: Filters,
}

impl Search {
    pub fn new(skip: u64, take: u64) -> Self {
        Self {
            skip,
            take,
            ..Self::default()
        }
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.where_.insert(field.into(), value.into());
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>, direction: impl Into<String>) -> Self {
        self.sort.insert(field.into(), direction.into());
        self
    }

    pub fn preload(mut self, relation: impl Into<String>, directive: impl Into<String>) -> Self {
        self.preload.insert(relation.into(), directive.into());
        self
    }

    /// Ask for a named filter with the given arguments.
    pub fn filter<I, K, V>(mut self, name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let args = args
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.filters.insert(name.into(), args);
        self
    }
}

impl Params for Search {}

/// Partially update one entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub preload: StringMap,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hooks: Filters,
}

impl Patch {
    pub fn new(id: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            data,
            ..Self::default()
        }
    }
}

impl Params for Patch {
    fn check(&self) -> Result<(), ProxyError> {
        require_id(&self.id)
    }
}
