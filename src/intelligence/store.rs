use std::sync::{Arc, RwLock};

use crate::provider::MetricProvider;

use super::reference::MetricIndex;
use super::types::StoreError;

/// Shared, swappable metric table.
/// Readers take an `Arc` snapshot and never hold the lock while evaluating;
/// a reload swaps the whole table so in-flight work keeps the old one.
pub struct MetricStore {
    current: RwLock<Arc<MetricIndex>>,
}

impl MetricStore {
    pub fn new(index: MetricIndex) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
        }
    }

    /// Build a store from a provider's current records.
    pub fn load(provider: &dyn MetricProvider) -> Result<Self, StoreError> {
        let index = MetricIndex::from_records(provider.load_metrics()?);
        tracing::info!(metrics = index.len(), "Metric table loaded");
        Ok(Self::new(index))
    }

    pub fn snapshot(&self) -> Result<Arc<MetricIndex>, StoreError> {
        let current = self.current.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(Arc::clone(&current))
    }

    /// Swap in a new table, returning the previous one.
    pub fn replace(&self, index: MetricIndex) -> Result<Arc<MetricIndex>, StoreError> {
        let next = Arc::new(index);
        let mut current = self.current.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(std::mem::replace(&mut *current, next))
    }

    /// Rebuild from the provider off-lock, then swap. Returns the new size.
    /// On provider failure the current table stays in place.
    pub fn reload(&self, provider: &dyn MetricProvider) -> Result<usize, StoreError> {
        let index = MetricIndex::from_records(provider.load_metrics()?);
        let count = index.len();
        let previous = self.replace(index)?;

        tracing::info!(
            previous = previous.len(),
            current = count,
            "Metric table reloaded"
        );
        Ok(count)
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.snapshot()?.len())
    }
}

impl Default for MetricStore {
    fn default() -> Self {
        Self::new(MetricIndex::default())
    }
}
