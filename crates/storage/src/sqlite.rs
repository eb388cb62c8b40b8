//! Relational backend over SQLite.
//!
//! One table, as plain as the contract allows:
//!
//! ```sql
//! CREATE TABLE keyvaluepairs (
//!     search_key   TEXT PRIMARY KEY,
//!     search_value TEXT NOT NULL
//! )
//! ```
//!
//! Length limits on keys and values are enforced by the validation layer
//! above, not by the schema.
//!
//! This backend has native transactions: [`SqliteStore::begin_session`]
//! issues `BEGIN IMMEDIATE` and hands out a session that holds the
//! connection lock until it commits, rolls back, or is dropped. A whole
//! composite batch therefore occupies the connection start to finish, and
//! SQLite's own atomicity covers the rollback; the engine's compensating
//! path is never needed here.

use cairn_core::{KeyValueBackend, Result, StoreError, StoreSession};
use parking_lot::{Mutex, MutexGuard};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS keyvaluepairs (
    search_key   TEXT PRIMARY KEY,
    search_value TEXT NOT NULL
)";

const GET_SQL: &str = "SELECT search_value FROM keyvaluepairs WHERE search_key = ?1";
const PUT_SQL: &str = "INSERT INTO keyvaluepairs (search_key, search_value) VALUES (?1, ?2)
    ON CONFLICT(search_key) DO UPDATE SET search_value = excluded.search_value";
const DELETE_SQL: &str = "DELETE FROM keyvaluepairs WHERE search_key = ?1";

/// SQLite-backed key/value store with native transaction sessions.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a store at `path`.
    ///
    /// Fails with `Unavailable` if the database cannot be opened or the
    /// schema cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| StoreError::Unavailable {
            reason: format!("cannot open {}: {}", path.display(), e),
        })?;
        tracing::debug!(path = %path.display(), "opened sqlite store");
        Self::with_connection(conn)
    }

    /// Open a private in-memory database. Used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Unavailable {
            reason: format!("cannot open in-memory database: {}", e),
        })?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| StoreError::Unavailable {
                reason: format!("cannot create schema: {}", e),
            })?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }
}

fn backend_err(e: rusqlite::Error) -> StoreError {
    StoreError::backend(e.to_string())
}

fn kv_get(conn: &Connection, key: &str) -> Result<String> {
    conn.query_row(GET_SQL, params![key], |row| row.get(0))
        .optional()
        .map_err(backend_err)?
        .ok_or_else(|| StoreError::not_found(key))
}

fn kv_put(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(PUT_SQL, params![key, value])
        .map_err(backend_err)?;
    Ok(())
}

fn kv_delete(conn: &Connection, key: &str) -> Result<()> {
    let affected = conn.execute(DELETE_SQL, params![key]).map_err(backend_err)?;
    if affected == 0 {
        return Err(StoreError::not_found(key));
    }
    Ok(())
}

impl KeyValueBackend for SqliteStore {
    fn get(&self, key: &str) -> Result<String> {
        kv_get(&self.conn.lock(), key)
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        kv_put(&self.conn.lock(), key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        kv_delete(&self.conn.lock(), key)
    }

    fn supports_native_transactions(&self) -> bool {
        true
    }

    fn begin_session(&self) -> Result<Option<Box<dyn StoreSession + '_>>> {
        let conn = self.conn.lock();
        conn.execute_batch("BEGIN IMMEDIATE")
            .map_err(|e| StoreError::Unavailable {
                reason: format!("cannot begin transaction: {}", e),
            })?;
        Ok(Some(Box::new(SqliteSession { conn, open: true })))
    }
}

/// One `BEGIN IMMEDIATE` transaction, holding the connection lock.
struct SqliteSession<'a> {
    conn: MutexGuard<'a, Connection>,
    open: bool,
}

impl StoreSession for SqliteSession<'_> {
    fn get(&mut self, key: &str) -> Result<String> {
        kv_get(&self.conn, key)
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        kv_put(&self.conn, key, value)
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        kv_delete(&self.conn, key)
    }

    fn commit(mut self: Box<Self>) -> Result<()> {
        self.conn.execute_batch("COMMIT").map_err(backend_err)?;
        self.open = false;
        Ok(())
    }

    fn rollback(mut self: Box<Self>) -> Result<()> {
        self.conn.execute_batch("ROLLBACK").map_err(backend_err)?;
        self.open = false;
        Ok(())
    }
}

impl Drop for SqliteSession<'_> {
    fn drop(&mut self) {
        // A session that was neither committed nor rolled back (a failed
        // COMMIT included) still has a transaction on the connection.
        if self.open {
            if let Err(e) = self.conn.execute_batch("ROLLBACK") {
                tracing::error!(error = %e, "failed to roll back abandoned sqlite session");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_missing_key_is_not_found() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.get("missing").unwrap_err().is_not_found());
    }

    #[test]
    fn put_get_delete_roundtrip() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.put("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap(), "v");
        store.delete("k").unwrap();
        assert!(store.get("k").unwrap_err().is_not_found());
    }

    #[test]
    fn put_upserts_existing_key() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.put("k", "v1").unwrap();
        store.put("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap(), "v2");
    }

    #[test]
    fn delete_missing_key_is_not_found() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.delete("missing").unwrap_err().is_not_found());
    }

    #[test]
    fn advertises_native_transactions() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.supports_native_transactions());
    }

    #[test]
    fn session_reads_its_own_writes() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut session = store.begin_session().unwrap().unwrap();
        session.put("k", "v").unwrap();
        assert_eq!(session.get("k").unwrap(), "v");
        session.commit().unwrap();
        assert_eq!(store.get("k").unwrap(), "v");
    }

    #[test]
    fn rollback_discards_session_writes() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.put("kept", "old").unwrap();

        let mut session = store.begin_session().unwrap().unwrap();
        session.put("kept", "new").unwrap();
        session.put("extra", "x").unwrap();
        session.delete("kept").unwrap();
        session.rollback().unwrap();

        assert_eq!(store.get("kept").unwrap(), "old");
        assert!(store.get("extra").unwrap_err().is_not_found());
    }

    #[test]
    fn dropped_session_rolls_back() {
        let store = SqliteStore::open_in_memory().unwrap();
        {
            let mut session = store.begin_session().unwrap().unwrap();
            session.put("k", "v").unwrap();
            // dropped without commit
        }
        assert!(store.get("k").unwrap_err().is_not_found());
    }

    #[test]
    fn session_delete_missing_key_is_not_found() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut session = store.begin_session().unwrap().unwrap();
        assert!(session.delete("missing").unwrap_err().is_not_found());
        session.rollback().unwrap();
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kv.db");

        let store = SqliteStore::open(&path).unwrap();
        store.put("k", "v").unwrap();
        drop(store);

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.get("k").unwrap(), "v");
    }

    #[test]
    fn open_rejects_unusable_path() {
        let dir = tempfile::tempdir().unwrap();
        // A directory is not a database file
        let err = SqliteStore::open(dir.path()).unwrap_err();
        assert_eq!(err.error_code(), "BackendUnavailable");
    }
}
