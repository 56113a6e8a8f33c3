//! SQLite-backed snapshot store.
//!
//! Each session field lives under its own key in the `kv` table, JSON encoded.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::{data_dir, migrations, SnapshotStore};
use crate::error::{DatabaseError, Result};

pub const DB_FILE: &str = "pomoquest.db";

/// SQLite database for session snapshots.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/pomoquest.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join(DB_FILE))
    }

    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }
}

impl SnapshotStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }
}
