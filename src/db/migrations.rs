use rusqlite::Connection;

use crate::error::TaskboardError;

pub fn run_migrations(conn: &Connection) -> Result<(), TaskboardError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;
    Ok(())
}
