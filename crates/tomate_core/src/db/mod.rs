//! Tomato store database bootstrap.
//!
//! # Responsibility
//! - Open file-backed or in-memory SQLite connections for the tomato store.
//! - Bring the `activities`, `tomatoes` and `activity_histories` schema up
//!   to date before any store query runs.
//!
//! # Invariants
//! - The schema version lives in `PRAGMA user_version`.
//! - A failed migration step leaves the previous version in place.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or migrating a tomato database.
#[derive(Debug)]
pub enum DbError {
    /// Connection setup or a pragma failed.
    Sqlite(rusqlite::Error),
    /// A schema step failed; nothing of that step was committed.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The file was written by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "tomato database error: {err}"),
            Self::Migration { version, source } => {
                write!(f, "tomato schema migration {version} failed: {source}")
            }
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "tomato store schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
