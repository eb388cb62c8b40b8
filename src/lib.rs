//! # cairn
//!
//! A key-value store with all-or-nothing composite batch execution.
//!
//! Single operations (`search`, `save`, `delete`) go straight at the
//! backing store. A composite request applies an ordered list of
//! heterogeneous operations as a unit: either every operation takes
//! effect, or the store is restored to its pre-batch state, via the
//! backend's native transaction when it has one, or by replaying captured
//! pre-images in reverse order when it does not.
//!
//! ## Quick Start
//!
//! ```
//! use cairndb::prelude::*;
//!
//! let db = Database::in_memory();
//!
//! // Single operations
//! db.save("user:1", "{\"name\":\"Alice\"}")?;
//! assert_eq!(db.search("user:1")?, "{\"name\":\"Alice\"}");
//!
//! // Composite: all-or-nothing
//! let reports = db.composite(vec![
//!     Operation::write("user:2", "{\"name\":\"Bob\"}"),
//!     Operation::read("user:1"),
//! ])?;
//! assert_eq!(reports.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Backends
//!
//! - [`MemoryStore`]: concurrent in-process map; batches roll back by
//!   compensation.
//! - [`SqliteStore`] (feature `sqlite`, default on): relational table;
//!   batches run inside one native transaction.
//!
//! Backend selection is config-driven; see [`StoreConfig`].

#![warn(missing_docs)]

mod config;
mod db;

pub mod json;
pub mod prelude;

pub use config::{BackendKind, ConfigError, StoreConfig};
pub use db::Database;

// Re-export the vocabulary types
pub use cairn_core::{
    EntryReport, EntryStatus, KeyValueBackend, OpKind, Operation, StoreError, StoreSession,
    MAX_KEY_LEN, MAX_VALUE_LEN,
};
pub use cairn_engine::{BatchError, CompensationFailure};
pub use cairn_storage::MemoryStore;
#[cfg(feature = "sqlite")]
pub use cairn_storage::SqliteStore;
