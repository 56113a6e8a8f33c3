//! Database schema migrations for pomoquest.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);
    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| row.get::<_, i32>(0))
        .unwrap_or_else(|e| {
            if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
                tracing::warn!("failed to read schema_version: {e}");
            }
            0
        })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: snapshot key-value table.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS kv (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );",
    )?;
    set_schema_version(conn, 1)
}

/// Migration v2: track when each key was last written.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let has_column: bool = conn
        .prepare("SELECT 1 FROM pragma_table_info('kv') WHERE name = 'updated_at'")?
        .exists([])?;
    if !has_column {
        conn.execute_batch("ALTER TABLE kv ADD COLUMN updated_at TEXT NOT NULL DEFAULT '';")?;
    }
    set_schema_version(conn, 2)
}
