//! Batch-level error taxonomy.
//!
//! Inside a composite, individual entry failures do not propagate: they
//! are recorded in the entry outcomes and drive the rollback decision.
//! What the caller sees is one of these aggregates, after rollback (or
//! commit) has finished. Every variant that reached execution carries the
//! full per-entry report list; no outcome is withheld.

use crate::batch::BatchId;
use crate::rollback::CompensationFailure;
use cairn_core::{EntryReport, StoreError};
use thiserror::Error;

/// How a composite request failed.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The request never reached the store: an operation failed
    /// validation, or the backend could not be reached when probing for a
    /// session. Nothing executed, nothing to roll back.
    #[error("composite request rejected: {0}")]
    Rejected(StoreError),

    /// At least one entry failed; every executed entry was rolled back
    /// cleanly. The store is back at its pre-batch state.
    #[error("composite batch {batch_id} failed and was rolled back")]
    Execution {
        /// The failing batch.
        batch_id: BatchId,
        /// Per-entry outcomes recorded before rollback, in input order.
        reports: Vec<EntryReport>,
    },

    /// Rollback itself failed for one or more entries (or the backend's
    /// native rollback failed). The store may match neither the pre-batch
    /// nor the post-batch state; surfaced distinctly so an operator can
    /// reconcile manually.
    #[error(
        "composite batch {batch_id} rollback incomplete ({} compensating actions failed)",
        .failures.len()
    )]
    Compensation {
        /// The failing batch.
        batch_id: BatchId,
        /// The compensating actions that could not be applied.
        failures: Vec<CompensationFailure>,
        /// Per-entry outcomes recorded before rollback, in input order.
        reports: Vec<EntryReport>,
    },

    /// Every entry executed but the native session failed to commit. The
    /// session's writes were discarded, so the store is at its pre-batch
    /// state.
    #[error("composite batch {batch_id} failed to commit: {error}")]
    Commit {
        /// The failing batch.
        batch_id: BatchId,
        /// The commit failure.
        error: StoreError,
        /// Per-entry outcomes, in input order.
        reports: Vec<EntryReport>,
    },
}

impl BatchError {
    /// The canonical error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            BatchError::Rejected(inner) => inner.error_code(),
            BatchError::Execution { .. } => "ExecutionError",
            BatchError::Compensation { .. } => "CompensationError",
            BatchError::Commit { .. } => "StorageError",
        }
    }

    /// The per-entry reports, if the batch reached execution.
    pub fn reports(&self) -> &[EntryReport] {
        match self {
            BatchError::Rejected(_) => &[],
            BatchError::Execution { reports, .. }
            | BatchError::Compensation { reports, .. }
            | BatchError::Commit { reports, .. } => reports,
        }
    }
}
