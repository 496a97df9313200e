//! Connection setup.
//!
//! # Invariants
//! - Every returned connection is migrated to `migrations::latest_version()`.
//! - Writers wait up to `BUSY_TIMEOUT` for a competing process.
//! - File databases run in WAL mode so `list` never blocks on an import.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{debug, error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

enum Location<'a> {
    File(&'a Path),
    Memory,
}

impl Location<'_> {
    fn label(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }

    fn connect(&self) -> DbResult<Connection> {
        match self {
            Self::File(path) => {
                if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                    std::fs::create_dir_all(dir).map_err(|source| DbError::CreateDirectory {
                        dir: dir.to_path_buf(),
                        source,
                    })?;
                }
                Ok(Connection::open(path)?)
            }
            Self::Memory => Ok(Connection::open_in_memory()?),
        }
    }
}

/// Opens (creating if needed) the review database at `path`.
///
/// Missing parent directories are created. Emits one `db_open` event.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_at(Location::File(path.as_ref()))
}

/// Opens a private, fully migrated in-memory database.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_at(Location::Memory)
}

fn open_at(location: Location<'_>) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = location.label();

    let result = location
        .connect()
        .and_then(|mut conn| configure(&mut conn, &location).map(|()| conn));
    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} busy={} duration_ms={} error={err}",
            err.is_busy(),
            started_at.elapsed().as_millis()
        ),
    }
    result
}

fn configure(conn: &mut Connection, location: &Location<'_>) -> DbResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    if let Location::File(_) = location {
        let journal: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!("event=db_journal module=db status=ok journal_mode={journal}");
    }
    apply_migrations(conn)
}

#[cfg(test)]
mod tests {
    use super::open_db;

    #[test]
    fn open_db_creates_missing_parent_directories() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("data").join("nested").join("log.sqlite3");

        let conn = open_db(&path).unwrap();
        let journal: String = conn
            .query_row("PRAGMA journal_mode;", [], |row| row.get(0))
            .unwrap();

        assert!(path.exists());
        assert_eq!(journal.to_ascii_lowercase(), "wal");
    }
}
