//! Backend selection.
//!
//! Which store implementation is active is a deployment decision, not a
//! code change: a small TOML document picks the backend and, for sqlite,
//! the database path.
//!
//! ```toml
//! backend = "sqlite"
//! sqlite_path = "/var/lib/cairn/kv.db"
//! ```

use crate::db::Database;
use cairn_core::StoreError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors building a [`Database`] from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config document does not parse.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The sqlite backend was selected without a path.
    #[error("sqlite backend requires `sqlite_path`")]
    MissingSqlitePath,

    /// The sqlite backend was selected but not compiled in.
    #[error("sqlite backend support is not compiled in (enable the `sqlite` feature)")]
    SqliteDisabled,

    /// The selected backend failed to open.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Which backing store to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// In-process concurrent map; compensating rollback.
    #[default]
    Memory,
    /// SQLite table; native transaction sessions.
    Sqlite,
}

/// Store selection, typically loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// The backend to construct.
    #[serde(default)]
    pub backend: BackendKind,
    /// Database file for the sqlite backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sqlite_path: Option<PathBuf>,
}

impl StoreConfig {
    /// Config for the in-memory backend.
    pub fn memory() -> Self {
        StoreConfig::default()
    }

    /// Config for the sqlite backend at `path`.
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            backend: BackendKind::Sqlite,
            sqlite_path: Some(path.into()),
        }
    }

    /// Parse a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Construct the configured backend and wrap it in a [`Database`].
    pub fn open(&self) -> Result<Database, ConfigError> {
        match self.backend {
            BackendKind::Memory => Ok(Database::in_memory()),
            BackendKind::Sqlite => {
                let path = self
                    .sqlite_path
                    .as_ref()
                    .ok_or(ConfigError::MissingSqlitePath)?;
                open_sqlite(path)
            }
        }
    }
}

#[cfg(feature = "sqlite")]
fn open_sqlite(path: &std::path::Path) -> Result<Database, ConfigError> {
    use std::sync::Arc;

    let store = cairn_storage::SqliteStore::open(path)?;
    Ok(Database::new(Arc::new(store)))
}

#[cfg(not(feature = "sqlite"))]
fn open_sqlite(_path: &std::path::Path) -> Result<Database, ConfigError> {
    Err(ConfigError::SqliteDisabled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_defaults_to_memory() {
        let config = StoreConfig::from_toml_str("").unwrap();
        assert_eq!(config.backend, BackendKind::Memory);
        assert!(config.sqlite_path.is_none());
    }

    #[test]
    fn parses_sqlite_selection() {
        let config = StoreConfig::from_toml_str(
            "backend = \"sqlite\"\nsqlite_path = \"/tmp/kv.db\"\n",
        )
        .unwrap();
        assert_eq!(config.backend, BackendKind::Sqlite);
        assert_eq!(config.sqlite_path, Some(PathBuf::from("/tmp/kv.db")));
    }

    #[test]
    fn unknown_backend_fails_to_parse() {
        assert!(StoreConfig::from_toml_str("backend = \"redis\"").is_err());
    }

    #[test]
    fn memory_config_opens() {
        let db = StoreConfig::memory().open().unwrap();
        assert!(!db.supports_native_transactions());
    }

    #[test]
    fn sqlite_without_path_is_rejected() {
        let config = StoreConfig {
            backend: BackendKind::Sqlite,
            sqlite_path: None,
        };
        assert!(matches!(
            config.open().unwrap_err(),
            ConfigError::MissingSqlitePath
        ));
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn sqlite_config_opens() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::sqlite(dir.path().join("kv.db"));
        let db = config.open().unwrap();
        assert!(db.supports_native_transactions());
    }
}
