//! The database facade.
//!
//! `Database` is a thin handle over an injected backing store: single
//! operations validate their inputs and delegate; composite requests go
//! through the batch engine. Cloning is cheap; clones share the same
//! store.

use crate::json;
use cairn_core::{
    validate_key, validate_value, EntryReport, KeyValueBackend, OpKind, Operation, Result,
};
use cairn_engine::BatchError;
use cairn_storage::MemoryStore;
use std::sync::Arc;

/// Handle to a key-value store with composite batch support.
#[derive(Clone)]
pub struct Database {
    backend: Arc<dyn KeyValueBackend>,
}

impl Database {
    /// Wrap an existing backend.
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Database { backend }
    }

    /// A database over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Whether the underlying backend has native transactions.
    pub fn supports_native_transactions(&self) -> bool {
        self.backend.supports_native_transactions()
    }

    /// Look up the value stored under `key`.
    ///
    /// Fails with `NotFound` if the key is absent.
    pub fn search(&self, key: &str) -> Result<String> {
        validate_key(key)?;
        self.backend.get(key)
    }

    /// Store `value` under `key`, creating or overwriting.
    ///
    /// The payload must be well-formed JSON and within the length limit;
    /// violations are rejected before the store is touched.
    pub fn save(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        json::ensure_well_formed(value)?;
        validate_value(value)?;
        self.backend.put(key, value)
    }

    /// Remove `key`.
    ///
    /// Fails with `NotFound` if the key is absent.
    pub fn delete(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.backend.delete(key)
    }

    /// Apply an ordered list of operations with all-or-nothing semantics.
    ///
    /// Returns one [`EntryReport`] per input operation, in input order.
    /// If any operation fails, every executed operation is undone and the
    /// error carries the per-entry reports, each tagged as rolled back.
    pub fn composite(
        &self,
        operations: Vec<Operation>,
    ) -> std::result::Result<Vec<EntryReport>, BatchError> {
        // payload structure is checked here, at the boundary; the engine
        // and the store treat values as opaque strings
        for op in &operations {
            if op.kind == OpKind::Write {
                if let Some(value) = op.value.as_deref() {
                    json::ensure_well_formed(value).map_err(BatchError::Rejected)?;
                }
            }
        }
        cairn_engine::execute(self.backend.as_ref(), operations)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field(
                "native_transactions",
                &self.backend.supports_native_transactions(),
            )
            .finish()
    }
}
