//! The backing-store seam.
//!
//! A [`KeyValueBackend`] owns the durable key/value mapping and is shared
//! across concurrent callers. The composite engine needs only three
//! operations plus an optional native-transaction capability:
//!
//! - backends **with** native transactions hand out a [`StoreSession`]; the
//!   whole batch runs through that one session and the backend's own
//!   atomicity applies,
//! - backends **without** (a plain concurrent map) return `None` from
//!   [`KeyValueBackend::begin_session`], and the engine compensates
//!   manually on rollback.

use crate::error::Result;

/// A key/value backing store.
///
/// The store instance is constructed once per process and passed by
/// reference (`Arc`) to whoever needs it, never held as a global.
pub trait KeyValueBackend: Send + Sync {
    /// Look up `key`. Fails with `NotFound` if the key is absent.
    fn get(&self, key: &str) -> Result<String>;

    /// Upsert `key` unconditionally. Succeeds whether or not the key
    /// already existed.
    fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Fails with `NotFound` if the key is absent.
    fn delete(&self, key: &str) -> Result<()>;

    /// Whether this backend offers native transaction sessions.
    ///
    /// Informational; [`KeyValueBackend::begin_session`] is the
    /// authoritative probe.
    fn supports_native_transactions(&self) -> bool {
        false
    }

    /// Open a native transaction session, if the backend has them.
    ///
    /// `Ok(None)` means the backend has no native transactions and the
    /// caller must provide compensating rollback itself. `Err` means the
    /// store could not be reached and nothing has executed.
    fn begin_session(&self) -> Result<Option<Box<dyn StoreSession + '_>>> {
        Ok(None)
    }
}

/// One native transaction on a backend that supports them.
///
/// Operations have the same contracts as on [`KeyValueBackend`], with one
/// addition: reads observe the session's own uncommitted writes. Nothing
/// is visible to other callers until [`StoreSession::commit`]. Dropping a
/// session without committing discards its writes.
pub trait StoreSession {
    /// Look up `key` inside the session.
    fn get(&mut self, key: &str) -> Result<String>;

    /// Upsert `key` inside the session.
    fn put(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key` inside the session.
    fn delete(&mut self, key: &str) -> Result<()>;

    /// Make the session's writes visible and durable.
    fn commit(self: Box<Self>) -> Result<()>;

    /// Discard the session's writes.
    fn rollback(self: Box<Self>) -> Result<()>;
}
