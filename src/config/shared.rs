//! Shared filter configuration handle with snapshot-swap semantics.

use std::sync::{Arc, RwLock};

use crate::config::FilterConfig;

/// Concurrently shared [`FilterConfig`] replaced by whole-value swap.
///
/// Readers take an `Arc` snapshot and keep using it for the duration of one
/// classification or scan run; a concurrent `replace` never exposes a
/// partially updated value.
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    inner: Arc<RwLock<Arc<FilterConfig>>>,
}

impl ConfigHandle {
    /// Creates a handle holding the given initial configuration.
    pub fn new(config: FilterConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(config))),
        }
    }

    /// Returns the current configuration snapshot.
    pub fn snapshot(&self) -> Arc<FilterConfig> {
        // Lock poisoning would mean a writer panicked mid-swap; the stored
        // Arc is still a complete value either way.
        match self.inner.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Atomically replaces the configuration.
    pub fn replace(&self, mut config: FilterConfig) {
        config.validate_lengths();
        let next = Arc::new(config);
        match self.inner.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }
}

impl Default for ConfigHandle {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}
