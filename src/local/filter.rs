//! Named filters (scopes) and the storage hooks they produce.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::api::{Filters, StringMap};

type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
type Scope = Arc<dyn Fn(&StringMap) -> Hook + Send + Sync>;

/// A storage-level query modifier: keeps the documents it matches.
#[derive(Clone)]
pub struct Hook {
    name: String,
    predicate: Predicate,
}

impl Hook {
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matches(&self, document: &Value) -> bool {
        (self.predicate)(document)
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook").field("name", &self.name).finish()
    }
}

/// A filter an entity declares by name, e.g. `onlyActive`.
///
/// The scope function is pure: filter arguments in, hook out.
#[derive(Clone)]
pub struct NamedFilter {
    name: String,
    scope: Scope,
}

impl NamedFilter {
    pub fn new<F>(name: impl Into<String>, scope: F) -> Self
    where
        F: Fn(&StringMap) -> Hook + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            scope: Arc::new(scope),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, args: &StringMap) -> Hook {
        (self.scope)(args)
    }
}

impl fmt::Debug for NamedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedFilter").field("name", &self.name).finish()
    }
}

/// Turn the requested filters into hooks.
///
/// Only filters that are both declared and requested produce a hook, in
/// declaration order. Requested names the entity does not declare are
/// dropped without error.
pub fn materialize(requested: &Filters, declared: &[NamedFilter]) -> Vec<Hook> {
    declared
        .iter()
        .filter_map(|filter| requested.get(filter.name()).map(|args| filter.apply(args)))
        .collect()
}
