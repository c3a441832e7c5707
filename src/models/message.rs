use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Text of the bot message shown while a reply is on its way.
pub const PENDING_REPLY_TEXT: &str = "\u{2026}";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Legacy records were stored without an id; restore assigns one.
    #[serde(default)]
    pub id: String,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(
        id: impl Into<String>,
        sender: Sender,
        text: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            sender,
            text: text.into(),
            timestamp,
        }
    }

    /// A bot placeholder without its reply. Older builds stored it empty.
    pub fn is_pending_reply(&self) -> bool {
        self.sender == Sender::Bot && (self.text.is_empty() || self.text == PENDING_REPLY_TEXT)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    #[serde(alias = "assistant")]
    Bot,
    System,
}

impl Sender {
    pub fn from_storage(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "user" => Some(Sender::User),
            "bot" | "assistant" => Some(Sender::Bot),
            "system" => Some(Sender::System),
            _ => None,
        }
    }
}
