//! SQLite bootstrap for the key-value storage backend.
//!
//! # Responsibility
//! - Open and configure SQLite connections backing `SqliteStorage`.
//! - Apply schema migrations in deterministic order.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Storage code must not touch `kv_entries` before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while bringing a storage file up to the current schema.
#[derive(Debug)]
pub enum DbError {
    /// The file could not be opened or configured.
    Connect(rusqlite::Error),
    /// Migration to `version` failed and was rolled back.
    Migrate {
        version: u32,
        source: rusqlite::Error,
    },
    /// The file was written by a newer build.
    SchemaTooNew { found: u32, supported: u32 },
}

impl DbError {
    pub(crate) fn migrate(version: u32) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| Self::Migrate { version, source }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connect(err) => write!(f, "cannot open storage file: {err}"),
            Self::Migrate { version, source } => {
                write!(f, "storage migration to version {version} failed: {source}")
            }
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "storage schema version {found} is newer than supported {supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connect(err) | Self::Migrate { source: err, .. } => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}
