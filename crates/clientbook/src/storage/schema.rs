//! `SQLite` schema definitions for clientbook.
//!
//! Records are kept as serialized values under well-known keys, so the
//! schema is a single key/value table.

use rusqlite::Connection;

use crate::error::Result;

/// SQL statement to create the key/value table.
pub const CREATE_KV_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_KV_TABLE];

/// Create all tables if they don't exist.
///
/// # Errors
///
/// Returns an error if a schema statement fails.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }
    Ok(())
}
