//! Request and report types.
//!
//! An [`Operation`] is one unit of a composite request; an [`EntryReport`]
//! is the per-operation answer. Both serialize, since they are the shapes
//! the request surface exchanges with callers. The store itself never
//! interprets payload content: values are opaque strings with a length
//! limit.

use crate::error::StoreError;
use serde::{Deserialize, Serialize};

/// Maximum key length, in characters.
pub const MAX_KEY_LEN: usize = 125;

/// Maximum payload length, in characters.
pub const MAX_VALUE_LEN: usize = 2048;

/// What an operation does to its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    /// Look up the current value.
    Read,
    /// Upsert a new value.
    Write,
    /// Remove the key.
    Delete,
}

impl OpKind {
    /// Whether this kind changes store state.
    pub fn is_mutating(self) -> bool {
        matches!(self, OpKind::Write | OpKind::Delete)
    }
}

impl std::fmt::Display for OpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpKind::Read => write!(f, "read"),
            OpKind::Write => write!(f, "write"),
            OpKind::Delete => write!(f, "delete"),
        }
    }
}

/// One request unit: a key, what to do with it, and the payload for writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// The key to operate on. Non-empty, at most [`MAX_KEY_LEN`] chars.
    pub key: String,
    /// What to do.
    pub kind: OpKind,
    /// New value. Present iff `kind` is [`OpKind::Write`], at most
    /// [`MAX_VALUE_LEN`] chars.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Operation {
    /// A read of `key`.
    pub fn read(key: impl Into<String>) -> Self {
        Operation {
            key: key.into(),
            kind: OpKind::Read,
            value: None,
        }
    }

    /// A write of `value` to `key`.
    pub fn write(key: impl Into<String>, value: impl Into<String>) -> Self {
        Operation {
            key: key.into(),
            kind: OpKind::Write,
            value: Some(value.into()),
        }
    }

    /// A delete of `key`.
    pub fn delete(key: impl Into<String>) -> Self {
        Operation {
            key: key.into(),
            kind: OpKind::Delete,
            value: None,
        }
    }

    /// Check the key and payload constraints.
    ///
    /// Violations reject the operation before the store is touched.
    pub fn validate(&self) -> Result<(), StoreError> {
        validate_key(&self.key)?;
        match (self.kind, self.value.as_deref()) {
            (OpKind::Write, Some(value)) => validate_value(value),
            (OpKind::Write, None) => Err(StoreError::InvalidPayload {
                reason: "write operation requires a value".to_string(),
            }),
            (_, Some(_)) => Err(StoreError::InvalidPayload {
                reason: format!("{} operation does not take a value", self.kind),
            }),
            (_, None) => Ok(()),
        }
    }
}

/// Check the key constraints: non-empty, at most [`MAX_KEY_LEN`] chars.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey {
            key: key.to_string(),
            reason: "key must not be empty".to_string(),
        });
    }
    let len = key.chars().count();
    if len > MAX_KEY_LEN {
        return Err(StoreError::InvalidKey {
            key: key.to_string(),
            reason: format!("key is {} chars, limit is {}", len, MAX_KEY_LEN),
        });
    }
    Ok(())
}

/// Check the payload length constraint.
pub fn validate_value(value: &str) -> Result<(), StoreError> {
    let len = value.chars().count();
    if len > MAX_VALUE_LEN {
        return Err(StoreError::InvalidPayload {
            reason: format!("payload is {} chars, limit is {}", len, MAX_VALUE_LEN),
        });
    }
    Ok(())
}

/// Per-entry status in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// The operation executed.
    Ok,
    /// The operation failed.
    Error,
}

/// The answer for one operation of a composite request.
///
/// Reports come back in submission order, one per input operation,
/// regardless of how the batch ended. When the batch as a whole was rolled
/// back, every report carries `rolled_back = true`, including the entries
/// that individually succeeded before the rollback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryReport {
    /// 1-based position in the submitted batch.
    pub sequence: u64,
    /// The key operated on.
    pub key: String,
    /// What the operation was.
    pub kind: OpKind,
    /// Whether this entry executed or failed.
    pub status: EntryStatus,
    /// Read result, or the echoed payload for writes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Failure message for failed entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Whether the batch this entry belonged to was rolled back.
    #[serde(default)]
    pub rolled_back: bool,
}
