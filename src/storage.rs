//! Persistence seam.
//!
//! Durable storage is an external collaborator: the engine writes through
//! the [`Store`] trait and treats write failures as non-fatal
//! (log-and-continue; the record is still emitted through the event sink).
//! [`MemoryStore`] is the in-process implementation used by the CLI and by
//! tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use log::debug;

use crate::config::FilterConfig;
use crate::dedup::canonical_url;
use crate::error::StoreError;
use crate::record::DiscoveryRecord;

/// Durable record and configuration storage.
#[async_trait]
pub trait Store: Send + Sync {
    /// Inserts a record, or folds it into an existing record for the same
    /// canonical URL.
    async fn insert(&self, record: &DiscoveryRecord) -> Result<(), StoreError>;

    /// Updates an existing record in place.
    async fn update(&self, record: &DiscoveryRecord) -> Result<(), StoreError>;

    /// Loads the persisted filter configuration, `None` when absent.
    async fn load_config(&self) -> Result<Option<FilterConfig>, StoreError>;

    /// Persists the filter configuration.
    async fn save_config(&self, config: &FilterConfig) -> Result<(), StoreError>;
}

/// In-memory store keyed by canonical URL.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, DiscoveryRecord>>,
    config: Mutex<Option<String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all stored records, for reporting and tests.
    pub fn records(&self) -> Vec<DiscoveryRecord> {
        match self.records.lock() {
            Ok(guard) => guard.values().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().values().cloned().collect(),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        match self.records.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert(&self, record: &DiscoveryRecord) -> Result<(), StoreError> {
        let key = canonical_url(&record.url).to_string();
        let mut guard = match self.records.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match guard.get_mut(&key) {
            Some(existing) => {
                debug!("Updating existing record for {key}");
                existing.merge_observation(record);
            }
            None => {
                guard.insert(key, record.clone());
            }
        }
        Ok(())
    }

    async fn update(&self, record: &DiscoveryRecord) -> Result<(), StoreError> {
        let key = canonical_url(&record.url).to_string();
        let mut guard = match self.records.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.insert(key, record.clone());
        Ok(())
    }

    async fn load_config(&self) -> Result<Option<FilterConfig>, StoreError> {
        let guard = match self.config.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match guard.as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    async fn save_config(&self, config: &FilterConfig) -> Result<(), StoreError> {
        let json = serde_json::to_string(config)?;
        let mut guard = match self.config.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(json);
        Ok(())
    }
}
