//! Shared rate-table snapshots
//!
//! Calculations never read the live rate table field by field. They take an
//! `Arc<RateConfig>` snapshot up front, and edits replace the whole table at
//! once, so a calculation sees either the previous or the next table.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::core::rates::{RateConfig, RateError};

/// Thread-safe holder of the current rate table
#[derive(Debug)]
pub struct RateStore {
    current: RwLock<Arc<RateConfig>>,
}

impl Default for RateStore {
    fn default() -> Self {
        Self::new(RateConfig::default())
    }
}

impl RateStore {
    pub fn new(rates: RateConfig) -> Self {
        Self {
            current: RwLock::new(Arc::new(rates)),
        }
    }

    /// Consistent snapshot of the current table
    pub fn snapshot(&self) -> Arc<RateConfig> {
        Arc::clone(&self.current.read())
    }

    /// Replace the whole table
    pub fn replace(&self, rates: RateConfig) {
        *self.current.write() = Arc::new(rates);
    }

    /// Update a single field by dotted key, publishing a new table on success
    ///
    /// The write lock is held while the next table is built, so concurrent
    /// edits apply one after another rather than overwriting each other.
    pub fn set_field(&self, key: &str, value: &str) -> Result<Arc<RateConfig>, RateError> {
        let mut guard = self.current.write();
        let next = Arc::new(guard.with_field(key, value)?);
        *guard = Arc::clone(&next);
        tracing::debug!(key, value, "rate table updated");
        Ok(next)
    }

    /// Restore the built-in defaults
    pub fn reset(&self) -> Arc<RateConfig> {
        let next = Arc::new(RateConfig::default());
        *self.current.write() = Arc::clone(&next);
        next
    }
}
