//! Key-value backend contract and SQLite implementation.
//!
//! # Responsibility
//! - Expose raw named-slot access for the persistence adapter.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Backends deal only in raw serialized strings, never in task records.
//! - A `put` is a full overwrite of the slot.

use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Raw backend transport error.
#[derive(Debug)]
pub enum BackendError {
    Sqlite(rusqlite::Error),
    /// Backend cannot be reached at all (quota, permissions, private mode).
    Unavailable(String),
}

impl Display for BackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "storage backend unavailable: {message}"),
        }
    }
}

impl Error for BackendError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for BackendError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Raw access to named key-value slots.
///
/// The adapter is generic over this trait so tests can inject unreachable
/// or garbage-returning backends without touching SQLite.
pub trait StorageBackend {
    /// Reads the raw value stored at `key`; `None` when the slot is absent.
    fn get(&self, key: &str) -> Result<Option<String>, BackendError>;

    /// Overwrites the raw value stored at `key`.
    fn put(&self, key: &str, value: &str) -> Result<(), BackendError>;
}

/// SQLite-backed slot storage over the `kv` table.
pub struct SqliteBackend<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBackend<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl StorageBackend for SqliteBackend<'_> {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1;", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), BackendError> {
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}
