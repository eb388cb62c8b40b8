//! Convenience re-exports.
//!
//! ```
//! use cairndb::prelude::*;
//! ```

pub use crate::config::{BackendKind, StoreConfig};
pub use crate::db::Database;
pub use cairn_core::{EntryReport, EntryStatus, OpKind, Operation, StoreError};
pub use cairn_engine::BatchError;
