//! Pre-image capture.
//!
//! For a mutating entry, the key's current value is read immediately
//! before that entry's own mutation, not in an up-front pass over the
//! whole batch. When the same key appears multiple times, each entry
//! records the state left by the entries before it, which is what makes
//! reverse-order rollback unwind duplicate-key batches exactly, step by
//! step, without spurious compensation failures.
//!
//! An absent key is captured as [`PreImage::Absent`], never skipped: a
//! mutating entry without a pre-image must not execute at all.

use crate::batch::PreImage;
use crate::handle::StoreHandle;
use cairn_core::{Result, StoreError};

/// Read the key's state through the active store handle.
///
/// `NotFound` is a valid capture (`Absent`); any other error aborts the
/// capture and the caller must fail the entry without applying it.
pub(crate) fn capture(store: &mut StoreHandle<'_>, key: &str) -> Result<PreImage> {
    match store.get(key) {
        Ok(value) => Ok(PreImage::Present(value)),
        Err(StoreError::NotFound { .. }) => Ok(PreImage::Absent),
        Err(e) => Err(e),
    }
}
