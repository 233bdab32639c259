use std::collections::HashMap;

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::TaskboardError;

/// Synchronous key/value slot the store snapshots into.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, TaskboardError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), TaskboardError>;
    fn remove(&mut self, key: &str) -> Result<(), TaskboardError>;
}

/// SQLite-backed slots in the `kv_store` table.
pub struct SqliteKv {
    conn: Connection,
}

impl SqliteKv {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStore for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<String>, TaskboardError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), TaskboardError> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), TaskboardError> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(())
    }
}

/// In-process slots. Nothing survives the value being dropped.
#[derive(Debug, Default, Clone)]
pub struct MemoryKv {
    slots: HashMap<String, String>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.slots.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, TaskboardError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), TaskboardError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), TaskboardError> {
        self.slots.remove(key);
        Ok(())
    }
}
