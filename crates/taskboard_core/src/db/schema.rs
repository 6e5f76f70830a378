//! Key/value schema bootstrap.
//!
//! # Invariants
//! - The schema version lives in `PRAGMA user_version`.
//! - A database stamped with a newer version is never touched.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

const KV_STORE_SQL: &str = include_str!("kv_store.sql");

/// Creates the `kv_store` table on fresh databases and stamps the version.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(DbError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        });
    }
    if found == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(KV_STORE_SQL)?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;

    info!("event=db_schema module=db status=ok from_version={found} to_version={SCHEMA_VERSION}");
    Ok(())
}

/// Version currently stamped on the database (0 when never initialized).
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
