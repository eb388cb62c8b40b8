//! Compensating rollback for backends without native transactions.
//!
//! Walks the batch in strict descending sequence order (the reverse of
//! execution) and undoes each successfully executed mutation by
//! restoring its captured pre-image:
//!
//! - `Present(v)`: put the old value back,
//! - `Absent`: delete the key. A key that did not exist before the batch
//!   must not exist after rollback; writing an empty or sentinel value
//!   would leave a phantom entry.
//!
//! Reads executed nothing to undo and are skipped. Rollback is
//! best-effort: a compensating action that itself fails is recorded and
//! the walk continues, so the remaining entries still get their chance to
//! be restored. Any recorded failure escalates the batch error, because
//! the store may then match neither the pre-batch nor the post-batch
//! state and an operator has to reconcile by hand.

use crate::batch::{Batch, PreImage};
use cairn_core::{KeyValueBackend, StoreError};

/// One compensating action that could not be applied.
#[derive(Debug, Clone)]
pub enum CompensationFailure {
    /// A per-entry compensating put/delete failed.
    Entry {
        /// Sequence number of the entry being compensated.
        sequence: u64,
        /// The key that could not be restored.
        key: String,
        /// What went wrong.
        error: StoreError,
    },
    /// The backend's native rollback failed as a whole.
    NativeRollback {
        /// What went wrong.
        error: StoreError,
    },
}

impl std::fmt::Display for CompensationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompensationFailure::Entry {
                sequence,
                key,
                error,
            } => write!(f, "entry {} (key '{}'): {}", sequence, key, error),
            CompensationFailure::NativeRollback { error } => {
                write!(f, "native rollback: {}", error)
            }
        }
    }
}

pub(crate) fn compensate(
    store: &dyn KeyValueBackend,
    batch: &Batch,
) -> Vec<CompensationFailure> {
    let mut failures = Vec::new();

    for entry in batch.entries.iter().rev() {
        if !entry.operation.kind.is_mutating() || !entry.executed() {
            continue;
        }
        // an executed mutation always carries a pre-image
        let Some(pre) = &entry.pre_image else {
            continue;
        };
        let key = entry.operation.key.as_str();
        let result = match pre {
            PreImage::Present(value) => store.put(key, value),
            PreImage::Absent => store.delete(key),
        };
        if let Err(error) = result {
            tracing::error!(
                batch = %batch.id,
                sequence = entry.sequence,
                key,
                %error,
                "compensating action failed; store may be inconsistent"
            );
            failures.push(CompensationFailure::Entry {
                sequence: entry.sequence,
                key: key.to_string(),
                error,
            });
        }
    }

    failures
}
