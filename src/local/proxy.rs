//! LocalProxy - the capability contract over an [`EntityStore`].

use std::marker::PhantomData;

use serde::Serialize;
use serde_json::value::RawValue;
use tracing::debug;

use super::entity::Entity;
use super::filter::{materialize, NamedFilter};
use super::store::{EntityStore, SearchQuery, StoreError};
use crate::api::{Create, Delete, Patch, Proxy, ProxyError, RawResult, Read, Search, Update};

/// Serves entity type `E` from store `S`.
pub struct LocalProxy<E, S> {
    store: S,
    scopes: Vec<NamedFilter>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity, S: EntityStore> LocalProxy<E, S> {
    /// Prepare the store for `E`. Fails if the store cannot serve it.
    pub fn new(store: S) -> Result<Self, StoreError> {
        store.prepare::<E>()?;
        Ok(Self {
            store,
            scopes: E::scopes(),
            _entity: PhantomData,
        })
    }

    /// Get a reference to the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Decode the payload into a blank `E`, then validate it.
    fn hydrate(&self, payload: &RawValue) -> Result<E, ProxyError> {
        let entity: E = serde_json::from_str(payload.get())?;
        if let Err(err) = entity.validate() {
            debug!(entity = E::NAME, error = %err, "validation failed");
            return Err(err.into());
        }
        Ok(entity)
    }
}

fn encode<T: Serialize>(value: &T) -> Result<RawResult, ProxyError> {
    serde_json::value::to_raw_value(value).map_err(|e| ProxyError::Encode(e.to_string()))
}

impl<E: Entity, S: EntityStore> Proxy for LocalProxy<E, S> {
    fn create(&self, req: Create) -> Result<RawResult, ProxyError> {
        let entity = self.hydrate(&req.entity)?;
        let stored = self.store.create(entity)?;
        encode(&stored)
    }

    fn read(&self, req: Read) -> Result<RawResult, ProxyError> {
        let stored: E = self.store.read(&req.id, &req.preload)?;
        encode(&stored)
    }

    fn update(&self, req: Update) -> Result<RawResult, ProxyError> {
        let entity = self.hydrate(&req.entity)?;
        let stored = self.store.update(&req.id, entity)?;
        encode(&stored)
    }

    fn delete(&self, req: Delete) -> Result<(), ProxyError> {
        self.store.delete::<E>(&req.id)?;
        Ok(())
    }

    fn search(&self, req: Search) -> Result<RawResult, ProxyError> {
        let hooks = if self.scopes.is_empty() {
            Vec::new()
        } else {
            materialize(&req.filters, &self.scopes)
        };

        if hooks.len() < req.filters.len() {
            debug!(
                entity = E::NAME,
                requested = req.filters.len(),
                applied = hooks.len(),
                "undeclared filters ignored"
            );
        }

        let query = SearchQuery {
            skip: req.skip,
            take: req.take,
            where_: req.where_,
            sort: req.sort,
            preload: req.preload,
            hooks,
        };

        let page = self.store.search::<E>(&query)?;
        encode(&page)
    }

    // No validation here, unlike create/update.
    fn patch(&self, req: Patch) -> Result<RawResult, ProxyError> {
        let stored: E = self.store.patch(&req.id, &req.data, &req.preload)?;
        encode(&stored)
    }
}
