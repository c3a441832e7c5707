use chrono::{DateTime, Utc};

/// One line of the recent-chats sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentChat {
    pub session_id: String,
    pub label: String,
    /// Untruncated source of `label`, shown as a tooltip.
    pub full_text: String,
    pub timestamp: DateTime<Utc>,
}
