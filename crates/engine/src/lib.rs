//! Composite batch engine for cairn
//!
//! Applies an ordered list of read/write/delete operations to a backing
//! store with all-or-nothing semantics:
//!
//! 1. every operation is validated, then the backend's native-transaction
//!    capability is probed once,
//! 2. the batch executes strictly in submission order; every entry is
//!    attempted, failures do not short-circuit the forward pass,
//! 3. on any failure the store is restored: either the native session
//!    rolls back, or the [rollback engine](rollback) replays compensating
//!    actions over the executed entries in reverse order, using the
//!    pre-image each mutating entry captured just before its own write.
//!
//! The caller gets one [`EntryReport`](cairn_core::EntryReport) per input
//! operation, in input order, whether the batch committed or not.

pub mod batch;
pub mod coordinator;
pub mod error;

mod executor;
mod handle;
mod preimage;
mod rollback;

pub use batch::{Batch, BatchEntry, BatchId, BatchState, Outcome, PreImage};
pub use coordinator::execute;
pub use error::BatchError;
pub use rollback::CompensationFailure;
