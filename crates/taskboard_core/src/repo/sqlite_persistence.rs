//! SQLite-backed key/value persistence adapter.
//!
//! # Invariants
//! - One row per storage key in `kv_store`; saves upsert that row.
//! - The connection must carry the `kv_store` schema (see `db::open_db`).

use crate::repo::persistence::{PersistResult, PersistenceAdapter};
use rusqlite::{params, Connection, OptionalExtension};

/// Persists the serialized task list under one well-known key.
pub struct SqlitePersistence<'conn> {
    conn: &'conn Connection,
    key: String,
}

impl<'conn> SqlitePersistence<'conn> {
    pub fn new(conn: &'conn Connection, key: impl Into<String>) -> Self {
        Self {
            conn,
            key: key.into(),
        }
    }

    /// Storage key this adapter reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PersistenceAdapter for SqlitePersistence<'_> {
    fn load(&self) -> PersistResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [self.key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save(&self, serialized: &str) -> PersistResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![self.key.as_str(), serialized],
        )?;
        Ok(())
    }
}
