use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::models::{RecentChat, Session};
use crate::state::titles::sidebar_preview;

pub const MAX_RECENT_CHATS: usize = 10;

/// Sidebar entries, newest first, one per distinct label.
pub fn build_recent_chats<'a>(
    sessions: impl IntoIterator<Item = &'a Session>,
    now: DateTime<Utc>,
) -> Vec<RecentChat> {
    let mut chats: Vec<RecentChat> = sessions
        .into_iter()
        .map(|session| recent_chat(session, now))
        .collect();

    chats.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| b.session_id.cmp(&a.session_id))
    });

    let mut seen = HashSet::new();
    chats.retain(|chat| seen.insert(chat.label.clone()));
    chats.truncate(MAX_RECENT_CHATS);
    chats
}

fn recent_chat(session: &Session, now: DateTime<Utc>) -> RecentChat {
    let first_user = session.first_user_message();
    let (label, full_text) = match first_user {
        Some(message) if !session.renamed => {
            (sidebar_preview(&message.text), message.text.clone())
        }
        Some(message) => (session.title.clone(), message.text.clone()),
        None => (session.title.clone(), session.title.clone()),
    };

    RecentChat {
        session_id: session.id.clone(),
        label,
        full_text,
        timestamp: session
            .messages
            .first()
            .map(|message| message.timestamp)
            .unwrap_or(now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n;
    use crate::models::{Message, Sender};
    use crate::state::titles::tab_label;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn session(id: &str, question: &str, minutes: i64) -> Session {
        let mut session = Session::new(id, tab_label(question));
        session.messages.push(Message::new(
            format!("{}-m1", id),
            Sender::User,
            question,
            start() + Duration::minutes(minutes),
        ));
        session
    }

    #[test]
    fn newest_first_with_thirty_char_preview() {
        let sessions = vec![
            session("old", "What is a deposit?", 0),
            session("new", "Is this clause fair to me, really?", 5),
        ];

        let chats = build_recent_chats(&sessions, start());
        assert_eq!(chats[0].session_id, "new");
        assert_eq!(chats[0].label, "Is this clause fair to me, rea\u{2026}");
        assert_eq!(chats[0].full_text, "Is this clause fair to me, really?");
        assert_eq!(chats[1].session_id, "old");
    }

    #[test]
    fn renamed_session_shows_its_title() {
        let mut renamed = session("s", "What is a deposit?", 0);
        renamed.title = "Deposit notes".to_string();
        renamed.renamed = true;

        let chats = build_recent_chats([&renamed], start());
        assert_eq!(chats[0].label, "Deposit notes");
        assert_eq!(chats[0].full_text, "What is a deposit?");
    }

    #[test]
    fn renaming_to_the_derived_title_still_counts() {
        let mut renamed = session("s", "What is a deposit?", 0);
        renamed.renamed = true;

        let chats = build_recent_chats([&renamed], start());
        assert_eq!(chats[0].label, tab_label("What is a deposit?"));
        assert_eq!(chats[0].label, renamed.title);
    }

    #[test]
    fn duplicate_labels_are_collapsed_and_capped() {
        let mut sessions: Vec<Session> = (0..15)
            .map(|i| session(&format!("s{}", i), &format!("Question {}", i), i))
            .collect();
        sessions.push(session("dup", "Question 14", 20));

        let chats = build_recent_chats(&sessions, start());
        assert_eq!(chats.len(), MAX_RECENT_CHATS);
        assert_eq!(chats[0].session_id, "dup");
        assert_eq!(
            chats.iter().filter(|chat| chat.label == "Question 14").count(),
            1
        );
    }

    #[test]
    fn empty_session_uses_title_and_sorts_as_now() {
        let empty = Session::new("empty", i18n::default_title());
        let older = session("older", "Hello", 0);
        let now = start() + Duration::hours(1);

        let chats = build_recent_chats([&older, &empty], now);
        assert_eq!(chats[0].session_id, "empty");
        assert_eq!(chats[0].label, i18n::default_title());
        assert_eq!(chats[0].timestamp, now);
    }
}
