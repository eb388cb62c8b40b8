//! Backing-store implementations for cairn
//!
//! Two backends, one per rollback strategy:
//! - [`MemoryStore`]: a concurrent in-process map with no native
//!   transactions; composite batches over it rely on the engine's
//!   compensating rollback.
//! - [`SqliteStore`] (feature `sqlite`): a relational table with native
//!   `BEGIN`/`COMMIT`/`ROLLBACK` sessions; a whole batch runs inside one
//!   session and the database's own atomicity applies.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
