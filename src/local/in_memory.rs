//! InMemoryEntityStore - HashMap-backed entity store for testing and development.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use super::entity::Entity;
use super::store::{EntityStore, Page, SearchQuery, StoreError};
use crate::api::{StringMap, DEFAULT_TAKE};

type Collection = BTreeMap<String, Value>;

/// In-memory entity store. Documents are kept as JSON, one collection per
/// entity name, ordered by id. Clone-friendly via Arc.
///
/// Query semantics:
/// - `where`: field equality against the field rendered as a string
/// - `sort`: `asc` / `desc` per field, fields applied in name order
/// - `take == 0`: default page size
/// - `preload`: accepted and ignored, there are no relations
#[derive(Clone, Default)]
pub struct InMemoryEntityStore {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl InMemoryEntityStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub fn count(&self, collection: &str) -> usize {
        self.read_lock()
            .map(|c| c.get(collection).map(BTreeMap::len).unwrap_or(0))
            .unwrap_or(0)
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Collection>>, StoreError> {
        self.collections
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Collection>>, StoreError> {
        self.collections
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))
    }

    fn not_found<E: Entity>(id: &str) -> StoreError {
        StoreError::NotFound {
            collection: E::NAME.to_string(),
            id: id.to_string(),
        }
    }
}

fn collection<'a, E: Entity>(
    collections: &'a HashMap<String, Collection>,
) -> Result<&'a Collection, StoreError> {
    collections
        .get(E::NAME)
        .ok_or_else(|| StoreError::UnknownCollection(E::NAME.to_string()))
}

fn collection_mut<'a, E: Entity>(
    collections: &'a mut HashMap<String, Collection>,
) -> Result<&'a mut Collection, StoreError> {
    collections
        .get_mut(E::NAME)
        .ok_or_else(|| StoreError::UnknownCollection(E::NAME.to_string()))
}

fn to_document<E: Entity>(entity: &E) -> Result<Map<String, Value>, StoreError> {
    match serde_json::to_value(entity)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Serde(format!(
            "{} must serialize to an object, got {}",
            E::NAME,
            other
        ))),
    }
}

/// The id to assign when the given one is blank: missing, null, `""` or `0`.
///
/// Numeric ids continue the collection's sequence; everything else gets a
/// uuid. `None` keeps the given id.
fn assigned_id(docs: &Collection, given: Option<&Value>, field: &str) -> Option<Value> {
    match given {
        None | Some(Value::Null) => Some(Value::String(Uuid::new_v4().to_string())),
        Some(Value::String(id)) if id.is_empty() => Some(Value::String(Uuid::new_v4().to_string())),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => {
            let next = docs
                .values()
                .filter_map(|doc| doc.get(field).and_then(Value::as_u64))
                .max()
                .map_or(1, |max| max + 1);
            Some(Value::from(next))
        }
        Some(_) => None,
    }
}

/// Render a field for string comparison: strings as-is, everything else as JSON.
fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn sort_keys(sort: &StringMap) -> Result<Vec<(&str, bool)>, StoreError> {
    sort.iter()
        .map(|(field, direction)| match direction.to_ascii_lowercase().as_str() {
            "asc" | "" => Ok((field.as_str(), false)),
            "desc" => Ok((field.as_str(), true)),
            _ => Err(StoreError::InvalidSort {
                field: field.clone(),
                direction: direction.clone(),
            }),
        })
        .collect()
}

impl EntityStore for InMemoryEntityStore {
    fn prepare<E: Entity>(&self) -> Result<(), StoreError> {
        let name = E::NAME;
        if name.is_empty() || name.contains('.') || name.chars().any(char::is_whitespace) {
            return Err(StoreError::InvalidCollection(name.to_string()));
        }

        self.write_lock()?.entry(name.to_string()).or_default();
        debug!(collection = name, "collection prepared");
        Ok(())
    }

    fn create<E: Entity>(&self, entity: E) -> Result<E, StoreError> {
        let mut document = to_document(&entity)?;

        let mut collections = self.write_lock()?;
        let docs = collection_mut::<E>(&mut collections)?;

        if let Some(assigned) = assigned_id(docs, document.get(E::ID_FIELD), E::ID_FIELD) {
            document.insert(E::ID_FIELD.to_string(), assigned);
        }
        let id = document.get(E::ID_FIELD).and_then(render).unwrap_or_default();
        if docs.contains_key(&id) {
            return Err(StoreError::Conflict {
                collection: E::NAME.to_string(),
                id,
            });
        }

        let document = Value::Object(document);
        let stored: E = serde_json::from_value(document.clone())?;
        docs.insert(id, document);

        Ok(stored)
    }

    fn read<E: Entity>(&self, id: &str, _preload: &StringMap) -> Result<E, StoreError> {
        let collections = self.read_lock()?;
        let document = collection::<E>(&collections)?
            .get(id)
            .ok_or_else(|| Self::not_found::<E>(id))?;

        Ok(serde_json::from_value(document.clone())?)
    }

    fn update<E: Entity>(&self, id: &str, entity: E) -> Result<E, StoreError> {
        let mut document = to_document(&entity)?;

        let mut collections = self.write_lock()?;
        let slot = collection_mut::<E>(&mut collections)?
            .get_mut(id)
            .ok_or_else(|| Self::not_found::<E>(id))?;

        // keep the stored id, with its JSON type
        let pinned = slot
            .get(E::ID_FIELD)
            .cloned()
            .unwrap_or_else(|| Value::String(id.to_string()));
        document.insert(E::ID_FIELD.to_string(), pinned);

        let document = Value::Object(document);
        let stored: E = serde_json::from_value(document.clone())?;
        *slot = document;

        Ok(stored)
    }

    fn delete<E: Entity>(&self, id: &str) -> Result<(), StoreError> {
        let mut collections = self.write_lock()?;
        collection_mut::<E>(&mut collections)?
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found::<E>(id))
    }

    fn search<E: Entity>(&self, query: &SearchQuery) -> Result<Page<E>, StoreError> {
        let keys = sort_keys(&query.sort)?;
        let take = if query.take == 0 { DEFAULT_TAKE } else { query.take };

        let collections = self.read_lock()?;
        let mut matched: Vec<&Value> = collection::<E>(&collections)?
            .values()
            .filter(|doc| {
                query
                    .where_
                    .iter()
                    .all(|(field, expected)| doc.get(field).and_then(render).as_ref() == Some(expected))
            })
            .filter(|doc| query.hooks.iter().all(|hook| hook.matches(doc)))
            .collect();

        if !keys.is_empty() {
            matched.sort_by(|a, b| {
                keys.iter()
                    .map(|(field, desc)| {
                        let ord = compare(&a[*field], &b[*field]);
                        if *desc {
                            ord.reverse()
                        } else {
                            ord
                        }
                    })
                    .find(|ord| *ord != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
        }

        let total = matched.len() as u64;
        let items = matched
            .into_iter()
            .skip(usize::try_from(query.skip).unwrap_or(usize::MAX))
            .take(usize::try_from(take).unwrap_or(usize::MAX))
            .map(|doc| serde_json::from_value(doc.clone()))
            .collect::<Result<Vec<E>, _>>()?;

        Ok(Page {
            skip: query.skip,
            take,
            total,
            items,
        })
    }

    fn patch<E: Entity>(
        &self,
        id: &str,
        data: &Map<String, Value>,
        _preload: &StringMap,
    ) -> Result<E, StoreError> {
        let mut collections = self.write_lock()?;
        let slot = collection_mut::<E>(&mut collections)?
            .get_mut(id)
            .ok_or_else(|| Self::not_found::<E>(id))?;

        let mut merged = slot.clone();
        if let Value::Object(fields) = &mut merged {
            for (field, value) in data {
                if field != E::ID_FIELD {
                    fields.insert(field.clone(), value.clone());
                }
            }
        }

        // The patched document must still be a valid E before it is committed.
        let patched: E = serde_json::from_value(merged.clone())?;
        *slot = merged;

        Ok(patched)
    }
}
