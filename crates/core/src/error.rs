//! Single-operation error taxonomy.
//!
//! Every error carries a canonical code string, stable across releases:
//!
//! | Code | Description |
//! |------|-------------|
//! | NotFound | Key absent on a read or delete |
//! | InvalidKey | Key empty or over the length limit |
//! | InvalidInput | Payload rejected before reaching the store |
//! | BackendUnavailable | Store cannot be reached |
//! | StorageError | Any other backend fault |
//!
//! Batch-level errors (`ExecutionError`, `CompensationError`) live in the
//! engine crate; they aggregate these.

use thiserror::Error;

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors produced by a single store operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The key does not exist.
    #[error("key not found: {key}")]
    NotFound {
        /// The key that was looked up.
        key: String,
    },

    /// The key violates the key constraints (empty, or over the limit).
    #[error("invalid key '{key}': {reason}")]
    InvalidKey {
        /// The offending key.
        key: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The payload was rejected before reaching the store.
    #[error("invalid payload: {reason}")]
    InvalidPayload {
        /// Why it was rejected.
        reason: String,
    },

    /// The store cannot be reached at all. Nothing was executed.
    #[error("backend unavailable: {reason}")]
    Unavailable {
        /// The underlying connection failure.
        reason: String,
    },

    /// Any other backend fault.
    #[error("backend error: {reason}")]
    Backend {
        /// The underlying failure.
        reason: String,
    },
}

impl StoreError {
    /// Shorthand for a [`StoreError::NotFound`].
    pub fn not_found(key: impl Into<String>) -> Self {
        StoreError::NotFound { key: key.into() }
    }

    /// Shorthand for a [`StoreError::Backend`].
    pub fn backend(reason: impl Into<String>) -> Self {
        StoreError::Backend {
            reason: reason.into(),
        }
    }

    /// The canonical error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            StoreError::NotFound { .. } => "NotFound",
            StoreError::InvalidKey { .. } => "InvalidKey",
            StoreError::InvalidPayload { .. } => "InvalidInput",
            StoreError::Unavailable { .. } => "BackendUnavailable",
            StoreError::Backend { .. } => "StorageError",
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_code_and_message() {
        let err = StoreError::not_found("user:1");
        assert_eq!(err.error_code(), "NotFound");
        assert_eq!(err.to_string(), "key not found: user:1");
        assert!(err.is_not_found());
    }

    #[test]
    fn invalid_payload_maps_to_invalid_input() {
        let err = StoreError::InvalidPayload {
            reason: "expected value".to_string(),
        };
        assert_eq!(err.error_code(), "InvalidInput");
        assert!(!err.is_not_found());
    }

    #[test]
    fn unavailable_is_distinct_from_backend_fault() {
        let unavailable = StoreError::Unavailable {
            reason: "connection refused".to_string(),
        };
        let fault = StoreError::backend("disk full");
        assert_eq!(unavailable.error_code(), "BackendUnavailable");
        assert_eq!(fault.error_code(), "StorageError");
    }
}
