//! The persisted tabs/sessions/titles aggregate.
//!
//! Reading is lenient: earlier versions of the app stored tabs as an object
//! map, titles as `{title, canChat}` records under `chat_session_info` and
//! messages without ids. Anything that cannot be understood is skipped with a
//! warning instead of failing the whole restore.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::i18n;
use crate::models::{Message, Sender, Tab};
use crate::persistence::{KeyValueStore, StoreError, WriteOp, encode_json};

pub const OPEN_TABS_KEY: &str = "open_tabs";
pub const ACTIVE_TAB_KEY: &str = "active_tab";
pub const SESSIONS_KEY: &str = "chat_sessions";
pub const TITLES_KEY: &str = "chat_session_titles";
pub const MESSAGE_COUNTER_KEY: &str = "message_id_counter";
pub const RENAMED_KEY: &str = "chat_session_renamed";
const LEGACY_TITLES_KEY: &str = "chat_session_info";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub tabs: Vec<Tab>,
    pub active_tab: Option<String>,
    /// Messages restored without an id keep an empty `id`.
    pub sessions: BTreeMap<String, Vec<Message>>,
    pub titles: BTreeMap<String, String>,
    /// Sessions whose title the user chose. `None` when the store predates
    /// the key, in which case the restorer has to work it out from titles.
    pub renamed: Option<BTreeSet<String>>,
    pub message_counter: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredTitle {
    Plain(String),
    Record {
        #[serde(default)]
        title: Option<String>,
    },
}

#[derive(Deserialize)]
struct StoredMessage {
    #[serde(default)]
    id: Option<String>,
    sender: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Absent keys are empty collections. `now` stamps legacy messages that
    /// were saved without a timestamp.
    pub fn load<S: KeyValueStore + ?Sized>(
        store: &S,
        now: DateTime<Utc>,
    ) -> Result<Self, StoreError> {
        let mut snapshot = Snapshot::default();

        if let Some(value) = read_value(store, OPEN_TABS_KEY)? {
            snapshot.tabs = parse_tabs(value);
        }

        snapshot.active_tab = read_active_tab(store)?;

        if let Some(value) = read_value(store, SESSIONS_KEY)? {
            snapshot.sessions = parse_sessions(value, now);
        }

        let titles = match read_value(store, TITLES_KEY)? {
            Some(value) => Some(value),
            None => read_value(store, LEGACY_TITLES_KEY)?,
        };
        if let Some(value) = titles {
            snapshot.titles = parse_titles(value);
        }

        if let Some(value) = read_value(store, RENAMED_KEY)? {
            snapshot.renamed = Some(parse_renamed(value));
        }

        if let Some(value) = read_value(store, MESSAGE_COUNTER_KEY)? {
            snapshot.message_counter = parse_counter(&value);
        }

        tracing::debug!(
            "Loaded {} tabs, {} sessions, {} titles",
            snapshot.tabs.len(),
            snapshot.sessions.len(),
            snapshot.titles.len()
        );

        Ok(snapshot)
    }

    /// The full aggregate as one batch; `active_tab` is removed when unset.
    pub fn to_write_ops(&self) -> Result<Vec<WriteOp>, StoreError> {
        let active = match &self.active_tab {
            Some(id) => encode_json(ACTIVE_TAB_KEY, id)?,
            None => WriteOp::Remove {
                key: ACTIVE_TAB_KEY.to_string(),
            },
        };

        Ok(vec![
            encode_json(OPEN_TABS_KEY, &self.tabs)?,
            active,
            encode_json(SESSIONS_KEY, &self.sessions)?,
            encode_json(TITLES_KEY, &self.titles)?,
            encode_json(RENAMED_KEY, &self.renamed.clone().unwrap_or_default())?,
            encode_json(MESSAGE_COUNTER_KEY, &self.message_counter)?,
        ])
    }
}

fn read_value<S: KeyValueStore + ?Sized>(
    store: &S,
    key: &str,
) -> Result<Option<Value>, StoreError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Null) => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            tracing::warn!("Ignoring malformed value under '{}': {}", key, err);
            Ok(None)
        }
    }
}

/// Older builds wrote the raw id without JSON quoting, and `"null"` for none.
fn read_active_tab<S: KeyValueStore + ?Sized>(store: &S) -> Result<Option<String>, StoreError> {
    let Some(raw) = store.get(ACTIVE_TAB_KEY)? else {
        return Ok(None);
    };

    let id = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::String(id)) => id,
        Ok(Value::Null) => return Ok(None),
        Ok(other) => {
            tracing::warn!("Ignoring non-string active tab: {}", other);
            return Ok(None);
        }
        Err(_) => raw.trim().to_string(),
    };

    Ok((!id.is_empty()).then_some(id))
}

fn parse_tabs(value: Value) -> Vec<Tab> {
    let mut tabs = Vec::new();

    match value {
        Value::Array(entries) => {
            for entry in entries {
                let id = entry.get("id").and_then(Value::as_str);
                let title = entry.get("title").and_then(Value::as_str);
                match (id, title) {
                    (Some(id), Some(title)) if !id.is_empty() => tabs.push(Tab::new(id, title)),
                    _ => tracing::warn!("Dropping malformed tab entry: {}", entry),
                }
            }
        }
        Value::Object(entries) => {
            for (id, entry) in entries {
                match entry.get("title").and_then(Value::as_str) {
                    Some(title) => tabs.push(Tab::new(id, title)),
                    None => tracing::warn!("Dropping malformed tab entry '{}'", id),
                }
            }
        }
        other => tracing::warn!("Ignoring open tabs stored as {}", other),
    }

    tabs
}

fn parse_titles(value: Value) -> BTreeMap<String, String> {
    let Value::Object(entries) = value else {
        tracing::warn!("Ignoring session titles that are not an object");
        return BTreeMap::new();
    };

    entries
        .into_iter()
        .filter_map(|(id, entry)| match serde_json::from_value::<StoredTitle>(entry) {
            Ok(StoredTitle::Plain(title)) => Some((id, title)),
            Ok(StoredTitle::Record { title }) => {
                Some((id, title.unwrap_or_else(i18n::default_title)))
            }
            Err(err) => {
                tracing::warn!("Dropping title of session '{}': {}", id, err);
                None
            }
        })
        .collect()
}

fn parse_renamed(value: Value) -> BTreeSet<String> {
    let Value::Array(ids) = value else {
        tracing::warn!("Ignoring renamed sessions that are not a list");
        return BTreeSet::new();
    };

    ids.into_iter()
        .filter_map(|id| match id {
            Value::String(id) if !id.is_empty() => Some(id),
            other => {
                tracing::warn!("Dropping renamed session entry: {}", other);
                None
            }
        })
        .collect()
}

fn parse_sessions(value: Value, now: DateTime<Utc>) -> BTreeMap<String, Vec<Message>> {
    let Value::Object(entries) = value else {
        tracing::warn!("Ignoring chat sessions that are not an object");
        return BTreeMap::new();
    };

    let mut sessions = BTreeMap::new();
    for (id, messages) in entries {
        let Value::Array(messages) = messages else {
            tracing::warn!("Dropping session '{}': messages are not a list", id);
            continue;
        };

        let restored: Vec<Message> = messages
            .into_iter()
            .filter_map(|raw| parse_message(&id, raw, now))
            .collect();
        sessions.insert(id, restored);
    }

    sessions
}

fn parse_message(session_id: &str, raw: Value, now: DateTime<Utc>) -> Option<Message> {
    let stored = match serde_json::from_value::<StoredMessage>(raw) {
        Ok(stored) => stored,
        Err(err) => {
            tracing::warn!("Dropping message in session '{}': {}", session_id, err);
            return None;
        }
    };

    let Some(sender) = Sender::from_storage(&stored.sender) else {
        tracing::warn!(
            "Dropping message in session '{}' with unknown sender '{}'",
            session_id,
            stored.sender
        );
        return None;
    };

    Some(Message::new(
        stored.id.unwrap_or_default(),
        sender,
        stored.text,
        stored.timestamp.unwrap_or(now),
    ))
}

fn parse_counter(value: &Value) -> u64 {
    match value {
        Value::Number(number) => number.as_u64().unwrap_or(0),
        Value::String(text) => text.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn empty_store_loads_empty_snapshot() {
        let store = MemoryStore::new();
        assert_eq!(Snapshot::load(&store, now()).unwrap(), Snapshot::default());
    }

    #[test]
    fn write_ops_round_trip_through_store() {
        let mut snapshot = Snapshot::default();
        snapshot.tabs.push(Tab::new("session_1", "Lease"));
        snapshot.active_tab = Some("session_1".to_string());
        snapshot.sessions.insert(
            "session_1".to_string(),
            vec![Message::new("msg-1-1", Sender::User, "Lease", now())],
        );
        snapshot
            .titles
            .insert("session_1".to_string(), "Lease".to_string());
        snapshot.renamed = Some(BTreeSet::from(["session_1".to_string()]));
        snapshot.message_counter = 1;

        let mut store = MemoryStore::new();
        store.write_batch(&snapshot.to_write_ops().unwrap()).unwrap();

        assert_eq!(Snapshot::load(&store, now()).unwrap(), snapshot);
    }

    #[test]
    fn unset_active_tab_removes_the_key() {
        let mut store = MemoryStore::new();
        store.set(ACTIVE_TAB_KEY, "\"session_1\"").unwrap();

        store
            .write_batch(&Snapshot::default().to_write_ops().unwrap())
            .unwrap();
        assert!(!store.contains_key(ACTIVE_TAB_KEY));
    }

    #[test]
    fn legacy_tab_map_and_malformed_entries() {
        let mut store = MemoryStore::new();
        store
            .set(
                OPEN_TABS_KEY,
                r#"{"session_1": {"title": "Lease", "canChat": true}, "session_2": 7}"#,
            )
            .unwrap();

        let snapshot = Snapshot::load(&store, now()).unwrap();
        assert_eq!(snapshot.tabs, vec![Tab::new("session_1", "Lease")]);
    }

    #[test]
    fn tab_list_drops_entries_without_title() {
        let mut store = MemoryStore::new();
        store
            .set(
                OPEN_TABS_KEY,
                r#"[{"id": "a", "title": "A"}, {"id": "b"}, "c"]"#,
            )
            .unwrap();

        let snapshot = Snapshot::load(&store, now()).unwrap();
        assert_eq!(snapshot.tabs, vec![Tab::new("a", "A")]);
    }

    #[test]
    fn legacy_title_records_are_accepted() {
        let mut store = MemoryStore::new();
        store
            .set(
                LEGACY_TITLES_KEY,
                r#"{"a": "Plain", "b": {"title": "Record", "canChat": false}, "c": {"canChat": true}}"#,
            )
            .unwrap();

        let titles = Snapshot::load(&store, now()).unwrap().titles;
        assert_eq!(titles["a"], "Plain");
        assert_eq!(titles["b"], "Record");
        assert_eq!(titles["c"], i18n::default_title());
    }

    #[test]
    fn unquoted_active_tab_is_accepted() {
        let mut store = MemoryStore::new();
        store.set(ACTIVE_TAB_KEY, "session_9").unwrap();
        assert_eq!(
            Snapshot::load(&store, now()).unwrap().active_tab.as_deref(),
            Some("session_9")
        );

        store.set(ACTIVE_TAB_KEY, "null").unwrap();
        assert_eq!(Snapshot::load(&store, now()).unwrap().active_tab, None);
    }

    #[test]
    fn legacy_messages_without_id_or_timestamp() {
        let mut store = MemoryStore::new();
        store
            .set(
                SESSIONS_KEY,
                r#"{"s": [{"sender": "user", "text": "hi"}, {"sender": "robot", "text": "?"}]}"#,
            )
            .unwrap();

        let sessions = Snapshot::load(&store, now()).unwrap().sessions;
        assert_eq!(sessions["s"].len(), 1);
        assert!(sessions["s"][0].id.is_empty());
        assert_eq!(sessions["s"][0].timestamp, now());
    }

    #[test]
    fn renamed_key_is_optional() {
        let mut store = MemoryStore::new();
        assert_eq!(Snapshot::load(&store, now()).unwrap().renamed, None);

        store.set(RENAMED_KEY, r#"["a", 3, ""]"#).unwrap();
        assert_eq!(
            Snapshot::load(&store, now()).unwrap().renamed,
            Some(BTreeSet::from(["a".to_string()]))
        );
    }

    #[test]
    fn malformed_json_is_treated_as_absent() {
        let mut store = MemoryStore::new();
        store.set(SESSIONS_KEY, "{broken").unwrap();
        store.set(MESSAGE_COUNTER_KEY, "\"12\"").unwrap();

        let snapshot = Snapshot::load(&store, now()).unwrap();
        assert!(snapshot.sessions.is_empty());
        assert_eq!(snapshot.message_counter, 12);
    }
}
