pub mod schema;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

use crate::persistence::{KeyValueStore, StoreError, WriteOp};

/// Key-value store backed by a single SQLite table.
pub struct SqliteStore {
    db: Connection,
}

impl SqliteStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        let db = Connection::open(db_path).context("Failed to open database")?;
        schema::initialize_database(&db).context("Failed to initialize database schema")?;
        Ok(Self { db })
    }

    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory().context("Failed to open in-memory database")?;
        schema::initialize_database(&db).context("Failed to initialize database schema")?;
        Ok(Self { db })
    }
}

fn upsert(db: &Connection, key: &str, value: &str) -> rusqlite::Result<usize> {
    db.execute(
        "INSERT INTO kv_store (key, value)
         VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        rusqlite::params![key, value],
    )
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .db
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        upsert(&self.db, key, value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.db
            .execute("DELETE FROM kv_store WHERE key = ?1", [key])?;
        Ok(())
    }

    fn write_batch(&mut self, ops: &[WriteOp]) -> Result<(), StoreError> {
        let start = std::time::Instant::now();
        let tx = self.db.transaction()?;

        for op in ops {
            match op {
                WriteOp::Set { key, value } => {
                    upsert(&tx, key, value)?;
                }
                WriteOp::Remove { key } => {
                    tx.execute("DELETE FROM kv_store WHERE key = ?1", [key])?;
                }
            }
        }

        tx.commit()?;

        tracing::debug!(
            "write_batch took {:?} - {} operations",
            start.elapsed(),
            ops.len()
        );
        Ok(())
    }
}
