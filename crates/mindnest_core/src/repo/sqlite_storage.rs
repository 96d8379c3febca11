//! SQLite-backed key-value storage.
//!
//! # Invariants
//! - Only connections at the latest migrated schema are accepted.
//! - `set` is an upsert; the row's `updated_at` is refreshed on every write.

use crate::db::migrations::latest_version;
use crate::repo::storage::{KeyValueStorage, StorageError, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};

const KV_TABLE: &str = "kv_store";
const KV_COLUMNS: [&str; 3] = ["key", "value", "updated_at"];

/// Key-value storage over the `kv_store` table.
pub struct SqliteStorage<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStorage<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl KeyValueStorage for SqliteStorage<'_> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
        Ok(())
    }
}

fn ensure_connection_ready(conn: &Connection) -> StorageResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(StorageError::Unavailable(format!(
            "requires schema version {expected_version}, got {actual_version}"
        )));
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({KV_TABLE});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>(1)?);
    }
    if columns.is_empty() {
        return Err(StorageError::Unavailable(format!(
            "missing table `{KV_TABLE}`"
        )));
    }
    if let Some(missing) = KV_COLUMNS
        .iter()
        .find(|column| !columns.iter().any(|existing| existing == *column))
    {
        return Err(StorageError::Unavailable(format!(
            "missing column `{missing}` in table `{KV_TABLE}`"
        )));
    }
    Ok(())
}
