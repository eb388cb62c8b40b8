//! Uniform access to the store during a batch.
//!
//! The forward pass is written once; whether its operations go straight
//! at the backend or through one native session is decided here, so the
//! batch algorithm is never duplicated per backend mode.

use cairn_core::{KeyValueBackend, Result, StoreSession};

pub(crate) enum StoreHandle<'a> {
    /// Operations hit the backend directly; rollback is compensating.
    Direct(&'a dyn KeyValueBackend),
    /// Operations run inside one native transaction for the whole batch.
    Session(Box<dyn StoreSession + 'a>),
}

impl StoreHandle<'_> {
    pub(crate) fn get(&mut self, key: &str) -> Result<String> {
        match self {
            StoreHandle::Direct(backend) => backend.get(key),
            StoreHandle::Session(session) => session.get(key),
        }
    }

    pub(crate) fn put(&mut self, key: &str, value: &str) -> Result<()> {
        match self {
            StoreHandle::Direct(backend) => backend.put(key, value),
            StoreHandle::Session(session) => session.put(key, value),
        }
    }

    pub(crate) fn delete(&mut self, key: &str) -> Result<()> {
        match self {
            StoreHandle::Direct(backend) => backend.delete(key),
            StoreHandle::Session(session) => session.delete(key),
        }
    }

    /// Commit the native session, if any. A no-op for direct access,
    /// where every executed operation is already visible.
    pub(crate) fn commit(self) -> Result<()> {
        match self {
            StoreHandle::Direct(_) => Ok(()),
            StoreHandle::Session(session) => session.commit(),
        }
    }

    /// Roll back the native session. Must not be called for direct
    /// access; compensating rollback goes through the rollback engine.
    pub(crate) fn rollback(self) -> Result<()> {
        match self {
            StoreHandle::Direct(_) => Ok(()),
            StoreHandle::Session(session) => session.rollback(),
        }
    }
}
