//! Key-value persistence used by the session manager.
//!
//! Values are JSON documents stored as strings under well-known keys, so any
//! backend that can hold strings (memory, SQLite, a browser store) works.

pub mod memory;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("value stored under '{key}' is not valid: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("value for '{key}' could not be encoded: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("storage is unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Set { key: String, value: String },
    Remove { key: String },
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// Apply several writes as one unit. Backends with transactions override
    /// this so a crash cannot leave half of an aggregate on disk.
    fn write_batch(&mut self, ops: &[WriteOp]) -> Result<(), StoreError> {
        for op in ops {
            match op {
                WriteOp::Set { key, value } => self.set(key, value)?,
                WriteOp::Remove { key } => self.remove(key)?,
            }
        }
        Ok(())
    }
}

/// Read and decode a JSON value. A missing key is `Ok(None)`.
pub fn read_json<S, T>(store: &S, key: &str) -> Result<Option<T>, StoreError>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StoreError::Decode {
            key: key.to_string(),
            source,
        })
}

pub fn encode_json<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<WriteOp, StoreError> {
    let value = serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;

    Ok(WriteOp::Set {
        key: key.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn read_json_returns_none_for_missing_key() {
        let store = MemoryStore::new();
        let value: Option<BTreeMap<String, String>> =
            read_json(&store, "chat_session_titles").expect("read should succeed");
        assert!(value.is_none());
    }

    #[test]
    fn read_json_reports_key_for_malformed_value() {
        let mut store = MemoryStore::new();
        store.set("open_tabs", "{not json").unwrap();

        let err = read_json::<_, Vec<String>>(&store, "open_tabs").unwrap_err();
        assert!(matches!(err, StoreError::Decode { ref key, .. } if key == "open_tabs"));
    }

    #[test]
    fn default_write_batch_applies_sets_and_removes_in_order() {
        let mut store = MemoryStore::new();
        store.set("active_tab", "\"session_1\"").unwrap();

        store
            .write_batch(&[
                encode_json("open_tabs", &Vec::<String>::new()).unwrap(),
                WriteOp::Remove {
                    key: "active_tab".to_string(),
                },
            ])
            .unwrap();

        assert_eq!(store.get("open_tabs").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get("active_tab").unwrap(), None);
    }
}
