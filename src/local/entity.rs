use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use super::filter::NamedFilter;

/// A storable entity type.
///
/// Decoding a payload into `Self` is the hydration step: mark the struct
/// `#[serde(default)]` so missing fields start blank, then let `validate`
/// reject what must not reach storage.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Entity name. Used as the method prefix and as the storage collection.
    const NAME: &'static str;

    /// Field holding the identity.
    const ID_FIELD: &'static str = "id";

    /// Field-level validation, run on create and update.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Named filters this entity supports in searches. Empty means the
    /// entity has no scope support and search filters are ignored.
    fn scopes() -> Vec<NamedFilter> {
        Vec::new()
    }
}

/// A field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed on `{field}`: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn required(field: impl Into<String>) -> Self {
        Self::new(field, "is required")
    }
}
