//! Whole-collection persistence with change notification.

use std::sync::Arc;

use common::AppResult;
use store::{BusHandle, Collection, EntityStore};

/// Store access bound to one context's bus connection.
///
/// Every successful [`Persistence::save`] is followed by a notice for the
/// collection's kind, so other contexts know to re-fetch.
#[derive(Clone)]
pub struct Persistence {
    store: Arc<EntityStore>,
    bus: BusHandle,
}

impl Persistence {
    pub fn new(store: Arc<EntityStore>, bus: BusHandle) -> Self {
        Self { store, bus }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn bus(&self) -> &BusHandle {
        &self.bus
    }

    /// Load a whole collection
    pub async fn load<T: Collection>(&self) -> AppResult<Vec<T>> {
        Ok(self.store.read::<T>().await?)
    }

    /// Replace a whole collection and announce it
    pub async fn save<T: Collection>(&self, items: &[T]) -> AppResult<()> {
        self.store.write(items).await?;
        self.bus.publish(T::KIND);
        Ok(())
    }
}
