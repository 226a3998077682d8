//! SQLite persistence for proposals, compliance requirements and submission checklists.
//!
//! Connections are returned with `foreign_keys=ON` and every migration applied; the schema
//! version is tracked in `PRAGMA user_version`.

pub mod migrations;
mod open;
mod sqlite;

pub use open::{open_db, open_db_in_memory};
pub use sqlite::SqliteSubmissionStore;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    #[error("database connection lock poisoned")]
    Poisoned,
}
