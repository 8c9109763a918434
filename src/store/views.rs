//! # View Counter
//!
//! Per-brewery view counts kept in an external counter store.
//! Counter failures are reported to the caller, which decides how to
//! degrade; they never touch brewery data.

use std::collections::HashMap;
use std::sync::Mutex;

use super::errors::{StoreError, StoreResult};

/// Counter store key for a brewery
pub fn view_key(brewery_id: u64) -> String {
    format!("brewery:{}:views", brewery_id)
}

/// Atomic per-brewery counter
pub trait ViewCounter: Send + Sync {
    /// Increment and return the new count
    fn increment(&self, brewery_id: u64) -> StoreResult<u64>;

    /// Current count (0 when never viewed)
    fn current(&self, brewery_id: u64) -> StoreResult<u64>;
}

/// In-process counter store
#[derive(Debug, Default)]
pub struct InMemoryViewCounter {
    counts: Mutex<HashMap<String, u64>>,
}

impl InMemoryViewCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ViewCounter for InMemoryViewCounter {
    fn increment(&self, brewery_id: u64) -> StoreResult<u64> {
        let mut counts = self.counts.lock().map_err(|_| StoreError::poisoned())?;
        let count = counts.entry(view_key(brewery_id)).or_insert(0);
        *count += 1;
        Ok(*count)
    }

    fn current(&self, brewery_id: u64) -> StoreResult<u64> {
        let counts = self.counts.lock().map_err(|_| StoreError::poisoned())?;
        Ok(counts.get(&view_key(brewery_id)).copied().unwrap_or(0))
    }
}
