//! The batch model.
//!
//! A [`Batch`] is one composite request's ordered entries plus its overall
//! state. It is built fresh per request, owned exclusively by the
//! coordinator for the request's lifetime, and discarded after the report
//! list is produced. No transaction log survives the call: rollback
//! replays exact pre-images instead of an external log, and the flip side
//! is that a crash mid-rollback leaves the store inconsistent with no
//! recovery record.

use cairn_core::{EntryReport, EntryStatus, Operation};
use uuid::Uuid;

/// Identifier for one composite batch, carried in log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchId(Uuid);

impl BatchId {
    /// Create a new random id.
    pub fn new() -> Self {
        BatchId(Uuid::new_v4())
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A key's state immediately before a mutating entry touched it.
///
/// `Absent` is a recorded state in its own right, not a missing value:
/// rolling back a write to a previously-absent key must *remove* the key,
/// never write a sentinel in its place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreImage {
    /// The key did not exist.
    Absent,
    /// The key held this value.
    Present(String),
}

/// How one entry's execution ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The operation was applied.
    Executed,
    /// The operation failed; the message says why.
    Failed(String),
}

/// Lifecycle of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// Entries assembled, nothing executed yet.
    Building,
    /// The forward pass is running.
    Executing,
    /// All entries executed; effects are permanent.
    Committed,
    /// At least one entry failed; executed effects were undone.
    RolledBack,
}

/// One operation bound to its position, pre-image, and outcome.
#[derive(Debug, Clone)]
pub struct BatchEntry {
    /// 1-based position in the submitted batch; equal to input order.
    /// The only ordering key; ties are impossible by construction.
    pub sequence: u64,
    /// The operation itself.
    pub operation: Operation,
    /// Captured just before this entry's own mutation. Populated only for
    /// Write/Delete entries the forward pass reached; reads have nothing
    /// to undo.
    pub pre_image: Option<PreImage>,
    /// Unset until the forward pass reaches this entry.
    pub outcome: Option<Outcome>,
    /// Read result, or the echoed payload for writes.
    pub result_value: Option<String>,
}

impl BatchEntry {
    fn new(sequence: u64, operation: Operation) -> Self {
        BatchEntry {
            sequence,
            operation,
            pre_image: None,
            outcome: None,
            result_value: None,
        }
    }

    /// Whether this entry executed successfully.
    pub fn executed(&self) -> bool {
        matches!(self.outcome, Some(Outcome::Executed))
    }

    /// Whether this entry failed.
    pub fn failed(&self) -> bool {
        matches!(self.outcome, Some(Outcome::Failed(_)))
    }

    pub(crate) fn mark_executed(&mut self, result_value: Option<String>) {
        self.outcome = Some(Outcome::Executed);
        self.result_value = result_value;
    }

    pub(crate) fn mark_failed(&mut self, message: impl Into<String>) {
        self.outcome = Some(Outcome::Failed(message.into()));
    }

    /// The per-operation answer for this entry.
    pub fn report(&self, rolled_back: bool) -> EntryReport {
        let (status, message) = match &self.outcome {
            Some(Outcome::Executed) => (EntryStatus::Ok, None),
            Some(Outcome::Failed(message)) => (EntryStatus::Error, Some(message.clone())),
            None => (
                EntryStatus::Error,
                Some("operation was never executed".to_string()),
            ),
        };
        EntryReport {
            sequence: self.sequence,
            key: self.operation.key.clone(),
            kind: self.operation.kind,
            status,
            result: self.result_value.clone(),
            message,
            rolled_back,
        }
    }
}

/// One composite request's entries and overall state.
#[derive(Debug)]
pub struct Batch {
    /// Random id for log correlation.
    pub id: BatchId,
    /// Where the batch is in its lifecycle.
    pub state: BatchState,
    /// Entries in submission order.
    pub entries: Vec<BatchEntry>,
}

impl Batch {
    /// Bind operations to sequence numbers by input position.
    pub fn build(operations: Vec<Operation>) -> Self {
        let entries = operations
            .into_iter()
            .enumerate()
            .map(|(i, op)| BatchEntry::new(i as u64 + 1, op))
            .collect();
        Batch {
            id: BatchId::new(),
            state: BatchState::Building,
            entries,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the batch has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any entry failed.
    pub fn has_failures(&self) -> bool {
        self.entries.iter().any(BatchEntry::failed)
    }

    /// Reports for all entries, in submission order.
    pub fn reports(&self, rolled_back: bool) -> Vec<EntryReport> {
        self.entries.iter().map(|e| e.report(rolled_back)).collect()
    }
}
