use std::path::Path;
use std::time::{Duration, Instant};

use rusqlite::Connection;
use tracing::{error, info};

use super::migrations::apply_migrations;
use super::StorageError;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a SQLite file with foreign keys enforced and all migrations applied.
pub fn open_db(path: impl AsRef<Path>) -> Result<Connection, StorageError> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!(mode = "file", path = %path.display(), "opening database");

    let conn = Connection::open(path).map_err(StorageError::from);
    finish_open(conn, "file", started_at)
}

pub fn open_db_in_memory() -> Result<Connection, StorageError> {
    let started_at = Instant::now();
    let conn = Connection::open_in_memory().map_err(StorageError::from);
    finish_open(conn, "memory", started_at)
}

fn finish_open(
    conn: Result<Connection, StorageError>,
    mode: &'static str,
    started_at: Instant,
) -> Result<Connection, StorageError> {
    let result = conn.and_then(|mut conn| {
        bootstrap_connection(&mut conn)?;
        Ok(conn)
    });

    let duration_ms = started_at.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => info!(mode, duration_ms, "database ready"),
        Err(err) => error!(mode, duration_ms, error = %err, "database open failed"),
    }
    result
}

fn bootstrap_connection(conn: &mut Connection) -> Result<(), StorageError> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)?;
    Ok(())
}
