//! Payload well-formedness.
//!
//! The store treats values as opaque strings; whether a payload is valid
//! JSON is checked here, at the serialization boundary, before an
//! operation reaches the store. A malformed payload is rejected without
//! touching any key.

use cairn_core::StoreError;

/// Whether `payload` parses as JSON.
pub fn is_well_formed(payload: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(payload).is_ok()
}

pub(crate) fn ensure_well_formed(payload: &str) -> Result<(), StoreError> {
    serde_json::from_str::<serde_json::Value>(payload)
        .map(|_| ())
        .map_err(|e| StoreError::InvalidPayload {
            reason: format!("payload is not valid JSON: {}", e),
        })
}
