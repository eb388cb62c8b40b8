//! Core types for cairn
//!
//! This crate defines the vocabulary shared by every layer:
//! - [`Operation`] / [`OpKind`]: one request unit of a composite batch
//! - [`EntryReport`] / [`EntryStatus`]: the per-operation answer
//! - [`StoreError`]: the single-operation error taxonomy
//! - [`KeyValueBackend`] / [`StoreSession`]: the backing-store seam
//!
//! Values are opaque strings at this layer. Whether a payload is
//! well-formed structured data is decided by the serialization boundary
//! above, before an operation reaches the store.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod types;

pub use backend::{KeyValueBackend, StoreSession};
pub use error::{Result, StoreError};
pub use types::{
    validate_key, validate_value, EntryReport, EntryStatus, OpKind, Operation, MAX_KEY_LEN,
    MAX_VALUE_LEN,
};
