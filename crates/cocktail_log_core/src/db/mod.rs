//! SQLite storage for the review log.
//!
//! # Responsibility
//! - Hand out connections whose schema matches this build.
//! - Describe storage failures in one error type shared by repositories.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - No review or recipe query runs on a connection that skipped `open_db*`.

use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Storage-level failure.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// A migration script failed; nothing from the pending set was applied.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The database file's parent directory could not be created.
    CreateDirectory {
        dir: PathBuf,
        source: std::io::Error,
    },
}

impl DbError {
    /// True when another process held the write lock past the busy timeout.
    pub fn is_busy(&self) -> bool {
        let sqlite = match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => err,
            _ => return false,
        };
        matches!(
            sqlite.sqlite_error_code(),
            Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
        )
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) if self.is_busy() => {
                write!(f, "database is busy in another process: {err}")
            }
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema v{db_version} was written by a newer cocktail-log \
                 (this build reads up to v{latest_supported})"
            ),
            Self::Migration { version, source } => {
                write!(f, "schema migration v{version} failed: {source}")
            }
            Self::CreateDirectory { dir, source } => write!(
                f,
                "cannot create database directory `{}`: {source}",
                dir.display()
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::CreateDirectory { source, .. } => Some(source),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
