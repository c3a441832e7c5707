//! Session and tab state.
//!
//! [`SessionManager`] owns every chat session, the ordered list of open tabs
//! and the active tab. Each mutating call writes the whole aggregate to the
//! store and re-renders the affected surfaces before returning. Neither step
//! can fail the call: problems are logged and the in-memory state stays as
//! it is.

pub mod ids;
pub mod recent;
pub mod snapshot;
pub mod titles;

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::export::{ExportError, export_messages};
use crate::i18n;
use crate::models::{Message, RecentChat, Sender, Session, Tab};
use crate::persistence::{KeyValueStore, StoreError};
use crate::view::{ChatView, TabEntry, ViewResult};

use ids::IdGenerator;
use recent::build_recent_chats;
use snapshot::Snapshot;
use titles::{display_label, tab_label};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenameError {
    #[error("session '{0}' does not exist")]
    UnknownSession(String),
    #[error("a session title cannot be empty")]
    EmptyTitle,
}

pub struct SessionManager<S: KeyValueStore, V: ChatView> {
    store: S,
    view: V,
    sessions: HashMap<String, Session>,
    tabs: Vec<String>,
    active: Option<String>,
    ids: IdGenerator,
    pending: HashSet<String>,
}

impl<S: KeyValueStore, V: ChatView> SessionManager<S, V> {
    /// Start with no sessions, ignoring whatever the store holds.
    pub fn new(store: S, view: V) -> Self {
        let mut manager = Self::empty(store, view, IdGenerator::default());
        manager.render_all();
        manager
    }

    /// Rebuild state from the store and render it.
    ///
    /// Malformed entries are dropped, messages without an id get one, and
    /// tabs whose session is gone are reopened as empty sessions. A bot
    /// placeholder left behind by an interrupted reply becomes the
    /// reply-failed notice. When any of that changed the data, the
    /// normalized aggregate is written back.
    pub fn restore(store: S, view: V) -> Result<Self, StoreError> {
        let started = std::time::Instant::now();
        let loaded = Snapshot::load(&store, Utc::now())?;
        let mut manager = Self::empty(store, view, IdGenerator::new(loaded.message_counter));

        let tab_titles: HashMap<&str, &str> = loaded
            .tabs
            .iter()
            .map(|tab| (tab.id.as_str(), tab.title.as_str()))
            .collect();
        let title_for = |id: &str| -> String {
            loaded
                .titles
                .get(id)
                .cloned()
                .or_else(|| tab_titles.get(id).map(|title| title.to_string()))
                .unwrap_or_else(i18n::default_title)
        };

        for (id, messages) in &loaded.sessions {
            let mut session = Session::new(id, title_for(id));
            let mut seen = HashSet::new();
            for message in messages {
                let mut message = message.clone();
                if message.id.is_empty() || seen.contains(&message.id) {
                    message.id = manager.ids.next_message_id(message.timestamp);
                }
                seen.insert(message.id.clone());
                if message.is_pending_reply() {
                    tracing::debug!("Session {} had an unfinished reply", id);
                    message = Message::new(
                        message.id,
                        Sender::System,
                        i18n::reply_failed(),
                        message.timestamp,
                    );
                }
                session.messages.push(message);
            }
            manager.sessions.insert(id.clone(), session);
        }

        for id in loaded.titles.keys() {
            if !manager.sessions.contains_key(id) {
                manager
                    .sessions
                    .insert(id.clone(), Session::new(id, title_for(id)));
            }
        }

        for tab in &loaded.tabs {
            if manager.tabs.contains(&tab.id) {
                tracing::warn!("Dropping duplicate tab '{}'", tab.id);
                continue;
            }
            manager
                .sessions
                .entry(tab.id.clone())
                .or_insert_with(|| Session::new(&tab.id, title_for(&tab.id)));
            manager.tabs.push(tab.id.clone());
        }

        let default_title = i18n::default_title();
        for session in manager.sessions.values_mut() {
            session.renamed = match &loaded.renamed {
                Some(renamed) => renamed.contains(&session.id),
                None => looks_renamed(session, &default_title),
            };
        }

        manager.active = match loaded.active_tab.as_deref() {
            Some(id) if manager.tabs.iter().any(|tab| tab == id) => Some(id.to_string()),
            _ => manager.tabs.first().cloned(),
        };

        let mut expected = loaded.clone();
        if expected.renamed.is_none() {
            expected.renamed = Some(Default::default());
        }
        if manager.snapshot() != expected {
            tracing::debug!("Writing back normalized chat sessions");
            manager.persist();
        }

        tracing::debug!(
            "Restored {} sessions and {} tabs in {:?}",
            manager.sessions.len(),
            manager.tabs.len(),
            started.elapsed()
        );

        manager.render_all();
        Ok(manager)
    }

    fn empty(store: S, view: V, ids: IdGenerator) -> Self {
        Self {
            store,
            view,
            sessions: HashMap::new(),
            tabs: Vec::new(),
            active: None,
            ids,
            pending: HashSet::new(),
        }
    }

    /// Open a new empty session in its own tab and make it active.
    pub fn create_session(&mut self) -> String {
        let id = self
            .ids
            .next_session_id(Utc::now(), |candidate| self.sessions.contains_key(candidate));

        self.sessions
            .insert(id.clone(), Session::new(&id, i18n::default_title()));
        self.tabs.push(id.clone());
        self.active = Some(id.clone());
        tracing::debug!("Created session {}", id);

        self.persist();
        self.render_tabs();
        self.render_recent();
        self.render_active_pane();
        id
    }

    /// Append a message under a fresh id. An unknown `session_id` creates
    /// that session and its tab first.
    pub fn append_message(
        &mut self,
        session_id: &str,
        sender: Sender,
        text: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> String {
        let id = self.ids.next_message_id(timestamp);
        self.insert_message(session_id, Message::new(&id, sender, text, timestamp));
        id
    }

    /// Append a message carrying its own id, or replace the message that
    /// already has that id.
    pub fn put_message(&mut self, session_id: &str, mut message: Message) -> String {
        if message.id.is_empty() {
            message.id = self.ids.next_message_id(message.timestamp);
        }
        let id = message.id.clone();
        self.insert_message(session_id, message);
        id
    }

    fn insert_message(&mut self, session_id: &str, message: Message) {
        let created = self.ensure_session(session_id);

        let Some(session) = self.sessions.get_mut(session_id) else {
            return;
        };

        let mut retitled = false;
        let replaced = match session.position(&message.id) {
            Some(index) => {
                session.messages[index] = message.clone();
                true
            }
            None => {
                let first_user =
                    message.sender == Sender::User && session.first_user_message().is_none();
                if first_user && !session.renamed {
                    session.title = tab_label(&message.text);
                    retitled = true;
                }
                session.messages.push(message.clone());
                false
            }
        };

        self.persist();

        if created || retitled {
            self.render_tabs();
        }
        if self.active.as_deref() == Some(session_id) {
            if created {
                self.render_active_pane();
            } else if replaced {
                self.render("message", |view| view.update_message(&message));
            } else {
                self.render("message", |view| view.append_message(&message));
            }
        }
        self.render_recent();
    }

    /// Returns true when the session had to be created.
    fn ensure_session(&mut self, session_id: &str) -> bool {
        if self.sessions.contains_key(session_id) {
            return false;
        }

        tracing::debug!("Creating session {} for an incoming message", session_id);
        self.sessions.insert(
            session_id.to_string(),
            Session::new(session_id, i18n::default_title()),
        );
        self.tabs.push(session_id.to_string());
        if self.active.is_none() {
            self.active = Some(session_id.to_string());
        }
        true
    }

    /// Activate an open tab. Unknown ids are logged and ignored.
    pub fn switch_tab(&mut self, session_id: &str) -> bool {
        if !self.tabs.iter().any(|tab| tab == session_id) {
            tracing::warn!("Cannot switch to unknown tab '{}'", session_id);
            return false;
        }

        self.active = Some(session_id.to_string());
        self.persist();
        self.render_tabs();
        self.render_active_pane();
        true
    }

    /// Close a tab and delete its session.
    pub fn close_tab(&mut self, session_id: &str) -> bool {
        if !self.tabs.iter().any(|tab| tab == session_id) {
            tracing::warn!("Cannot close unknown tab '{}'", session_id);
            return false;
        }
        self.discard(session_id);
        true
    }

    /// Delete a session with its title, closing its tab when one is open.
    pub fn delete_session(&mut self, session_id: &str) -> bool {
        if !self.sessions.contains_key(session_id) {
            tracing::warn!("Cannot delete unknown session '{}'", session_id);
            return false;
        }
        self.discard(session_id);
        true
    }

    fn discard(&mut self, session_id: &str) {
        self.tabs.retain(|tab| tab != session_id);
        self.sessions.remove(session_id);
        self.pending.remove(session_id);

        let was_active = self.active.as_deref() == Some(session_id);
        if was_active {
            self.active = self.tabs.first().cloned();
        }
        tracing::debug!("Deleted session {}", session_id);

        self.persist();
        self.render_tabs();
        self.render_recent();
        if was_active {
            self.render_active_pane();
        }
    }

    pub fn rename_session(&mut self, session_id: &str, new_title: &str) -> Result<(), RenameError> {
        let title = new_title.trim();
        if title.is_empty() {
            return Err(RenameError::EmptyTitle);
        }

        let session = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| RenameError::UnknownSession(session_id.to_string()))?;
        session.title = title.to_string();
        session.renamed = true;

        self.persist();
        self.render_tabs();
        self.render_recent();
        Ok(())
    }

    /// Delete every session and tab. The message id counter keeps counting.
    pub fn clear_all_sessions(&mut self) {
        let count = self.sessions.len();
        self.sessions.clear();
        self.tabs.clear();
        self.active = None;
        self.pending.clear();

        self.persist();
        self.render_all();
        tracing::info!("Cleared {} chat sessions", count);
    }

    pub fn export_session(&self, session_id: &str) -> Result<String, ExportError> {
        let session = self
            .sessions
            .get(session_id)
            .ok_or_else(|| ExportError::UnknownSession(session_id.to_string()))?;
        export_messages(&session.messages)
    }

    /// Bring a session picked from the recent-chats list back into a tab.
    pub fn open_recent(&mut self, session_id: &str) -> bool {
        if !self.sessions.contains_key(session_id) {
            tracing::warn!("Recent chat '{}' no longer exists", session_id);
            return false;
        }

        if !self.tabs.iter().any(|tab| tab == session_id) {
            self.tabs.push(session_id.to_string());
        }
        self.switch_tab(session_id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_parts(self) -> (S, V) {
        (self.store, self.view)
    }

    pub fn session(&self, session_id: &str) -> Option<&Session> {
        self.sessions.get(session_id)
    }

    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    pub fn messages(&self, session_id: &str) -> &[Message] {
        self.sessions
            .get(session_id)
            .map(|session| session.messages.as_slice())
            .unwrap_or(&[])
    }

    pub fn open_tabs(&self) -> Vec<Tab> {
        self.tabs
            .iter()
            .filter_map(|id| {
                self.sessions
                    .get(id)
                    .map(|session| Tab::new(id, &session.title))
            })
            .collect()
    }

    pub fn tab_entries(&self) -> Vec<TabEntry> {
        self.open_tabs()
            .into_iter()
            .map(|tab| TabEntry {
                active: self.active.as_deref() == Some(tab.id.as_str()),
                label: display_label(&tab.title),
                id: tab.id,
                title: tab.title,
            })
            .collect()
    }

    pub fn active_tab(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn title(&self, session_id: &str) -> Option<&str> {
        self.sessions
            .get(session_id)
            .map(|session| session.title.as_str())
    }

    pub fn recent_chats(&self) -> Vec<RecentChat> {
        build_recent_chats(self.sessions.values(), Utc::now())
    }

    pub fn is_reply_pending(&self, session_id: &str) -> bool {
        self.pending.contains(session_id)
    }

    /// The aggregate as it is written to the store.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tabs: self.open_tabs(),
            active_tab: self.active.clone(),
            sessions: self
                .sessions
                .iter()
                .map(|(id, session)| (id.clone(), session.messages.clone()))
                .collect(),
            titles: self
                .sessions
                .iter()
                .map(|(id, session)| (id.clone(), session.title.clone()))
                .collect(),
            renamed: Some(
                self.sessions
                    .values()
                    .filter(|session| session.renamed)
                    .map(|session| session.id.clone())
                    .collect(),
            ),
            message_counter: self.ids.message_counter(),
        }
    }

    pub(crate) fn mark_reply_pending(&mut self, session_id: &str) -> bool {
        let inserted = self.pending.insert(session_id.to_string());
        if inserted {
            self.sync_send_control();
        }
        inserted
    }

    pub(crate) fn clear_reply_pending(&mut self, session_id: &str) {
        if self.pending.remove(session_id) {
            self.sync_send_control();
        }
    }

    pub(crate) fn remove_message(&mut self, session_id: &str, message_id: &str) -> bool {
        let Some(session) = self.sessions.get_mut(session_id) else {
            return false;
        };
        let Some(index) = session.position(message_id) else {
            return false;
        };
        session.messages.remove(index);

        self.persist();
        if self.active.as_deref() == Some(session_id) {
            self.render("message", |view| view.remove_message(message_id));
        }
        true
    }

    pub(crate) fn persist(&mut self) {
        let started = std::time::Instant::now();
        let result = self
            .snapshot()
            .to_write_ops()
            .and_then(|ops| self.store.write_batch(&ops));

        match result {
            Ok(()) => tracing::debug!("Persisted chat sessions in {:?}", started.elapsed()),
            Err(err) => tracing::warn!("Failed to persist chat sessions: {}", err),
        }
    }

    fn render(&mut self, surface: &str, draw: impl FnOnce(&mut V) -> ViewResult) {
        if let Err(err) = draw(&mut self.view) {
            tracing::warn!("Failed to render {}: {}", surface, err);
        }
    }

    fn render_all(&mut self) {
        self.render_tabs();
        self.render_recent();
        self.render_active_pane();
    }

    fn render_tabs(&mut self) {
        let entries = self.tab_entries();
        self.render("tab bar", |view| view.render_tabs(&entries));
    }

    fn render_recent(&mut self) {
        let chats = self.recent_chats();
        self.render("recent chats", |view| view.render_recent_chats(&chats));
    }

    fn render_active_pane(&mut self) {
        let session = self.active.as_ref().and_then(|id| self.sessions.get(id));
        let result = match session {
            Some(session) if !session.is_empty() => self.view.render_messages(&session.messages),
            _ => self.view.show_welcome(),
        };
        if let Err(err) = result {
            tracing::warn!("Failed to render message pane: {}", err);
        }
        self.sync_send_control();
    }

    fn sync_send_control(&mut self) {
        let enabled = match &self.active {
            Some(id) => !self.pending.contains(id),
            None => true,
        };
        self.render("send control", |view| view.set_send_enabled(enabled));
    }
}

/// Stores written before titles carried a renamed flag: a title counts as
/// chosen when it is neither the default nor derived from the first question.
fn looks_renamed(session: &Session, default_title: &str) -> bool {
    session.title != default_title
        && session
            .first_user_message()
            .is_none_or(|message| session.title != tab_label(&message.text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, WriteOp};
    use crate::view::{HeadlessView, ViewError};
    use chrono::TimeZone;

    fn manager() -> SessionManager<MemoryStore, HeadlessView> {
        SessionManager::new(MemoryStore::new(), HeadlessView::new())
    }

    fn ts(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, minute, 0).unwrap()
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("quota exceeded".into()))
        }

        fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("quota exceeded".into()))
        }

        fn write_batch(&mut self, _ops: &[WriteOp]) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("quota exceeded".into()))
        }
    }

    struct BrokenView;

    impl ChatView for BrokenView {
        fn render_tabs(&mut self, _tabs: &[TabEntry]) -> ViewResult {
            Err(ViewError::MissingTarget("tab bar"))
        }
        fn render_messages(&mut self, _messages: &[Message]) -> ViewResult {
            Err(ViewError::MissingTarget("message pane"))
        }
        fn show_welcome(&mut self) -> ViewResult {
            Err(ViewError::MissingTarget("message pane"))
        }
        fn append_message(&mut self, _message: &Message) -> ViewResult {
            Err(ViewError::MissingTarget("message pane"))
        }
        fn update_message(&mut self, _message: &Message) -> ViewResult {
            Err(ViewError::MissingTarget("message pane"))
        }
        fn remove_message(&mut self, _message_id: &str) -> ViewResult {
            Err(ViewError::MissingTarget("message pane"))
        }
        fn render_recent_chats(&mut self, _chats: &[RecentChat]) -> ViewResult {
            Err(ViewError::MissingTarget("sidebar"))
        }
        fn set_send_enabled(&mut self, _enabled: bool) -> ViewResult {
            Err(ViewError::MissingTarget("send button"))
        }
    }

    #[test]
    fn create_session_opens_active_empty_tab() {
        let mut manager = manager();
        let id = manager.create_session();

        assert_eq!(manager.active_tab(), Some(id.as_str()));
        assert_eq!(manager.title(&id), Some(i18n::default_title().as_str()));
        assert!(manager.view().is_showing_welcome());
        assert!(manager.view().send_enabled);
    }

    #[test]
    fn created_ids_are_unique() {
        let mut manager = manager();
        let ids: HashSet<String> = (0..20).map(|_| manager.create_session()).collect();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn first_user_message_sets_title() {
        let mut manager = manager();
        let id = manager.create_session();

        manager.append_message(&id, Sender::Bot, "Welcome", ts(0));
        assert_eq!(manager.title(&id), Some(i18n::default_title().as_str()));

        manager.append_message(&id, Sender::User, "Is this clause fair to me, really?", ts(1));
        manager.append_message(&id, Sender::User, "Second question", ts(2));

        assert_eq!(manager.title(&id), Some("Is this clau\u{2026}"));
        assert_eq!(manager.view().tabs[0].label, "Is this clau\u{2026}");
    }

    #[test]
    fn renamed_title_survives_first_message() {
        let mut manager = manager();
        let id = manager.create_session();
        manager.rename_session(&id, "Deposit").unwrap();

        manager.append_message(&id, Sender::User, "What is a deposit?", ts(0));
        assert_eq!(manager.title(&id), Some("Deposit"));
    }

    #[test]
    fn rename_to_the_default_title_is_still_a_rename() {
        let mut manager = manager();
        let id = manager.create_session();
        manager.rename_session(&id, &i18n::default_title()).unwrap();

        manager.append_message(&id, Sender::User, "What is a deposit?", ts(0));
        assert_eq!(manager.title(&id), Some(i18n::default_title().as_str()));
        assert_eq!(manager.recent_chats()[0].label, i18n::default_title());
    }

    #[test]
    fn renamed_flag_survives_restore() {
        let mut manager = manager();
        let id = manager.create_session();
        manager.rename_session(&id, &i18n::default_title()).unwrap();
        let (store, _) = manager.into_parts();

        let mut manager = SessionManager::restore(store, HeadlessView::new()).unwrap();
        assert!(manager.session(&id).unwrap().renamed);

        manager.append_message(&id, Sender::User, "What is a deposit?", ts(0));
        assert_eq!(manager.title(&id), Some(i18n::default_title().as_str()));
    }

    #[test]
    fn legacy_titles_without_flag_are_inferred() {
        let mut store = MemoryStore::new();
        store
            .set(
                "chat_sessions",
                r#"{"derived": [{"id": "m1", "sender": "user", "text": "What is a deposit?", "timestamp": "2024-05-01T09:00:00Z"}],
                    "chosen": [{"id": "m2", "sender": "user", "text": "Lease", "timestamp": "2024-05-01T09:00:00Z"}]}"#,
            )
            .unwrap();
        store
            .set(
                "chat_session_titles",
                r#"{"derived": "What is a de…", "chosen": "My lease"}"#,
            )
            .unwrap();

        let manager = SessionManager::restore(store, HeadlessView::new()).unwrap();
        assert!(!manager.session("derived").unwrap().renamed);
        assert!(manager.session("chosen").unwrap().renamed);
        assert_eq!(
            manager.store().get("chat_session_renamed").unwrap().as_deref(),
            Some(r#"["chosen"]"#)
        );
    }

    #[test]
    fn append_to_unknown_session_creates_it() {
        let mut manager = manager();
        let first = manager.create_session();

        manager.append_message("session_legacy", Sender::User, "Hello", ts(0));

        assert!(manager.session("session_legacy").is_some());
        assert_eq!(manager.open_tabs().len(), 2);
        assert_eq!(manager.active_tab(), Some(first.as_str()));
    }

    #[test]
    fn append_to_unknown_session_without_active_tab_activates_it() {
        let mut manager = manager();
        manager.append_message("session_x", Sender::User, "Hello", ts(0));

        assert_eq!(manager.active_tab(), Some("session_x"));
        assert_eq!(manager.view().messages().len(), 1);
    }

    #[test]
    fn put_message_with_existing_id_updates_in_place() {
        let mut manager = manager();
        let id = manager.create_session();
        let message_id = manager.append_message(&id, Sender::Bot, "draft", ts(0));

        manager.put_message(&id, Message::new(&message_id, Sender::Bot, "final", ts(0)));

        assert_eq!(manager.messages(&id).len(), 1);
        assert_eq!(manager.messages(&id)[0].text, "final");
        assert_eq!(manager.view().messages()[0].text, "final");
    }

    #[test]
    fn switch_tab_to_unknown_id_changes_nothing() {
        let mut manager = manager();
        let id = manager.create_session();

        assert!(!manager.switch_tab("missing"));
        assert_eq!(manager.active_tab(), Some(id.as_str()));
    }

    #[test]
    fn switch_tab_is_idempotent() {
        let mut manager = manager();
        let first = manager.create_session();
        manager.append_message(&first, Sender::User, "Lease", ts(0));
        manager.create_session();

        manager.switch_tab(&first);
        let once = (manager.snapshot(), manager.view().pane.clone());
        manager.switch_tab(&first);

        assert_eq!((manager.snapshot(), manager.view().pane.clone()), once);
    }

    #[test]
    fn closing_active_tab_falls_back_to_first_remaining() {
        let mut manager = manager();
        let a = manager.create_session();
        let b = manager.create_session();
        let c = manager.create_session();

        manager.close_tab(&c);
        assert_eq!(manager.active_tab(), Some(a.as_str()));
        assert!(manager.session(&c).is_none());

        manager.close_tab(&a);
        assert_eq!(manager.active_tab(), Some(b.as_str()));

        manager.close_tab(&b);
        assert_eq!(manager.active_tab(), None);
        assert!(manager.view().is_showing_welcome());
    }

    #[test]
    fn delete_session_closes_its_tab_and_falls_back() {
        let mut manager = manager();
        let a = manager.create_session();
        let b = manager.create_session();

        assert!(manager.delete_session(&b));
        assert_eq!(manager.active_tab(), Some(a.as_str()));
        assert!(manager.session(&b).is_none());
        assert!(!manager.snapshot().titles.contains_key(&b));
        assert!(!manager.delete_session(&b));
    }

    #[test]
    fn delete_session_removes_a_tabless_chat() {
        let mut store = MemoryStore::new();
        store
            .set("chat_session_titles", r#"{"session_old": "Old chat"}"#)
            .unwrap();
        let mut manager = SessionManager::restore(store, HeadlessView::new()).unwrap();
        let open = manager.create_session();

        assert!(manager.delete_session("session_old"));
        assert_eq!(manager.active_tab(), Some(open.as_str()));
        assert_eq!(manager.recent_chats().len(), 1);
        let titles = manager.store().get("chat_session_titles").unwrap().unwrap();
        assert!(!titles.contains("session_old"));
        assert!(titles.contains(&open));
    }

    #[test]
    fn rename_rejects_blank_and_unknown() {
        let mut manager = manager();
        let id = manager.create_session();

        assert_eq!(manager.rename_session(&id, "   "), Err(RenameError::EmptyTitle));
        assert_eq!(
            manager.rename_session("nope", "Title"),
            Err(RenameError::UnknownSession("nope".into()))
        );
        assert_eq!(manager.title(&id), Some(i18n::default_title().as_str()));
    }

    #[test]
    fn clear_all_resets_everything() {
        let mut manager = manager();
        let id = manager.create_session();
        manager.append_message(&id, Sender::User, "Hi", ts(0));

        manager.clear_all_sessions();

        assert!(manager.open_tabs().is_empty());
        assert_eq!(manager.active_tab(), None);
        assert!(manager.recent_chats().is_empty());
        assert!(manager.view().is_showing_welcome());
        assert!(manager.view().send_enabled);
        assert_eq!(manager.store().get("open_tabs").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn every_mutation_is_persisted() {
        let mut manager = manager();
        let id = manager.create_session();
        manager.append_message(&id, Sender::User, "Hi", ts(0));

        let stored = Snapshot::load(manager.store(), Utc::now()).unwrap();
        assert_eq!(stored, manager.snapshot());
    }

    #[test]
    fn failed_persistence_keeps_in_memory_state() {
        let mut manager = SessionManager::new(FailingStore, HeadlessView::new());
        let id = manager.create_session();
        manager.append_message(&id, Sender::User, "Still here", ts(0));

        assert_eq!(manager.messages(&id).len(), 1);
        assert_eq!(manager.active_tab(), Some(id.as_str()));
    }

    #[test]
    fn missing_render_targets_do_not_abort_operations() {
        let mut manager = SessionManager::new(MemoryStore::new(), BrokenView);
        let id = manager.create_session();
        manager.append_message(&id, Sender::User, "Hi", ts(0));
        manager.rename_session(&id, "Renamed").unwrap();
        assert!(manager.close_tab(&id));
        assert!(manager.open_tabs().is_empty());
    }

    #[test]
    fn open_recent_reopens_a_tabless_session() {
        let mut store = MemoryStore::new();
        store
            .set("chat_session_titles", r#"{"session_old": "Old chat"}"#)
            .unwrap();
        let mut manager = SessionManager::restore(store, HeadlessView::new()).unwrap();
        assert!(manager.open_tabs().is_empty());

        assert!(manager.open_recent("session_old"));
        assert_eq!(manager.active_tab(), Some("session_old"));
        assert_eq!(manager.open_tabs(), vec![Tab::new("session_old", "Old chat")]);
        assert!(!manager.open_recent("session_gone"));
    }

    #[test]
    fn restore_turns_unfinished_replies_into_failures() {
        let mut store = MemoryStore::new();
        store
            .set(
                "chat_sessions",
                r#"{"a": [
                    {"id": "m1", "sender": "user", "text": "Hi", "timestamp": "2024-05-01T09:00:00Z"},
                    {"id": "m2", "sender": "bot", "text": "…", "timestamp": "2024-05-01T09:00:01Z"},
                    {"id": "m3", "sender": "bot", "text": "", "timestamp": "2024-05-01T09:00:02Z"}
                ]}"#,
            )
            .unwrap();
        store
            .set("open_tabs", r#"[{"id": "a", "title": "Hi"}]"#)
            .unwrap();

        let manager = SessionManager::restore(store, HeadlessView::new()).unwrap();
        let messages = manager.messages("a");

        assert_eq!(messages[1].id, "m2");
        assert_eq!(messages[1].sender, Sender::System);
        assert_eq!(messages[1].text, i18n::reply_failed());
        assert_eq!(messages[2].sender, Sender::System);
        assert!(!messages.iter().any(Message::is_pending_reply));
        assert!(!manager.is_reply_pending("a"));
        assert!(manager.view().send_enabled);
        assert!(
            manager
                .store()
                .get("chat_sessions")
                .unwrap()
                .unwrap()
                .contains("\"system\"")
        );
    }

    #[test]
    fn restore_assigns_ids_and_recovers_active_tab() {
        let mut store = MemoryStore::new();
        store
            .set("open_tabs", r#"[{"id": "a", "title": "A"}, {"id": "b", "title": "B"}]"#)
            .unwrap();
        store.set("active_tab", "\"gone\"").unwrap();
        store
            .set(
                "chat_sessions",
                r#"{"a": [{"sender": "user", "text": "A", "timestamp": "2024-05-01T09:00:00Z"}]}"#,
            )
            .unwrap();

        let manager = SessionManager::restore(store, HeadlessView::new()).unwrap();

        assert_eq!(manager.active_tab(), Some("a"));
        assert!(manager.messages("a")[0].id.starts_with("msg-"));
        assert_eq!(manager.title("b"), Some("B"));
        assert_eq!(manager.view().messages().len(), 1);
    }
}
