//! The composite coordinator.
//!
//! Owns the batch from build to report: validates the operations, probes
//! the backend's native-transaction capability once, drives the ordered
//! forward pass, and decides commit vs rollback. The branch between the
//! two backend modes happens here, at the top; the forward pass itself
//! is shared.

use crate::batch::{Batch, BatchState};
use crate::error::BatchError;
use crate::handle::StoreHandle;
use crate::rollback::{self, CompensationFailure};
use crate::executor;
use cairn_core::{EntryReport, KeyValueBackend, Operation, StoreSession};

/// Apply `operations` to `backend` with all-or-nothing semantics.
///
/// Returns one report per input operation, in input order. On failure the
/// error still carries every per-entry report produced before rollback.
pub fn execute(
    backend: &dyn KeyValueBackend,
    operations: Vec<Operation>,
) -> Result<Vec<EntryReport>, BatchError> {
    for op in &operations {
        op.validate().map_err(BatchError::Rejected)?;
    }

    // A probe failure means the store was never reached: surface it
    // immediately, there is nothing to roll back.
    let session = backend.begin_session().map_err(BatchError::Rejected)?;

    let mut batch = Batch::build(operations);
    tracing::debug!(
        batch = %batch.id,
        operations = batch.len(),
        native = session.is_some(),
        "executing composite batch"
    );

    match session {
        Some(session) => run_native(session, &mut batch),
        None => run_compensating(backend, &mut batch),
    }
}

/// Compensating mode: operations hit the backend directly, and a failed
/// batch is undone by replaying pre-images in reverse.
fn run_compensating(
    backend: &dyn KeyValueBackend,
    batch: &mut Batch,
) -> Result<Vec<EntryReport>, BatchError> {
    let mut handle = StoreHandle::Direct(backend);
    executor::run(&mut handle, batch);

    if !batch.has_failures() {
        batch.state = BatchState::Committed;
        tracing::debug!(batch = %batch.id, "composite batch committed");
        return Ok(batch.reports(false));
    }

    batch.state = BatchState::RolledBack;
    tracing::warn!(batch = %batch.id, "composite batch failed; rolling back executed entries");
    let failures = rollback::compensate(backend, batch);

    if failures.is_empty() {
        Err(BatchError::Execution {
            batch_id: batch.id,
            reports: batch.reports(true),
        })
    } else {
        Err(BatchError::Compensation {
            batch_id: batch.id,
            failures,
            reports: batch.reports(true),
        })
    }
}

/// Native mode: the whole batch runs inside one session and the backend's
/// own transaction rolls it back.
fn run_native(
    session: Box<dyn StoreSession + '_>,
    batch: &mut Batch,
) -> Result<Vec<EntryReport>, BatchError> {
    let mut handle = StoreHandle::Session(session);
    executor::run(&mut handle, batch);

    if !batch.has_failures() {
        return match handle.commit() {
            Ok(()) => {
                batch.state = BatchState::Committed;
                tracing::debug!(batch = %batch.id, "composite batch committed");
                Ok(batch.reports(false))
            }
            Err(error) => {
                batch.state = BatchState::RolledBack;
                tracing::error!(batch = %batch.id, %error, "native commit failed");
                Err(BatchError::Commit {
                    batch_id: batch.id,
                    error,
                    reports: batch.reports(true),
                })
            }
        };
    }

    batch.state = BatchState::RolledBack;
    tracing::warn!(batch = %batch.id, "composite batch failed; rolling back session");
    match handle.rollback() {
        Ok(()) => Err(BatchError::Execution {
            batch_id: batch.id,
            reports: batch.reports(true),
        }),
        Err(error) => {
            tracing::error!(batch = %batch.id, %error, "native rollback failed; store may be inconsistent");
            Err(BatchError::Compensation {
                batch_id: batch.id,
                failures: vec![CompensationFailure::NativeRollback { error }],
                reports: batch.reports(true),
            })
        }
    }
}
