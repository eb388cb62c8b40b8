//! In-process concurrent map backend.
//!
//! The simplest store: a `DashMap` shared across callers. Reads are
//! lock-free; writes lock only the target shard. There are no native
//! transactions here (`begin_session` stays at its `None` default), so
//! composite batches over this backend take the compensating-rollback
//! path.
//!
//! # Thread Safety
//!
//! Single operations are atomic per key. Nothing provides cross-batch
//! isolation: another in-flight batch may observe or mutate a key between
//! one batch's pre-image capture and its write.

use cairn_core::{KeyValueBackend, Result, StoreError};
use dashmap::DashMap;

/// Concurrent in-memory key/value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: DashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Snapshot of all entries, sorted by key.
    ///
    /// Collects under shard locks; meant for tests and diagnostics, not
    /// hot paths.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries: Vec<_> = self
            .map
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        entries.sort();
        entries
    }
}

impl KeyValueBackend for MemoryStore {
    fn get(&self, key: &str) -> Result<String> {
        self.map
            .get(key)
            .map(|v| v.value().clone())
            .ok_or_else(|| StoreError::not_found(key))
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.map
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(key))
    }
}
