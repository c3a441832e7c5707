//! Render surfaces driven by the session manager.
//!
//! The manager never waits on a view: every call is fire-and-forget and a
//! failing surface is logged and skipped.

pub mod headless;
pub mod terminal;

use thiserror::Error;

use crate::models::{Message, RecentChat};

pub use headless::{HeadlessView, Pane};
pub use terminal::TerminalView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabEntry {
    pub id: String,
    /// Label as shown on the tab, at most 12 characters plus ellipsis.
    pub label: String,
    pub title: String,
    pub active: bool,
}

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("render target '{0}' is not available")]
    MissingTarget(&'static str),
    #[error("failed to write to the output: {0}")]
    Io(#[from] std::io::Error),
}

pub type ViewResult = Result<(), ViewError>;

pub trait ChatView {
    fn render_tabs(&mut self, tabs: &[TabEntry]) -> ViewResult;

    /// Replace the message pane with `messages` and hide the welcome state.
    fn render_messages(&mut self, messages: &[Message]) -> ViewResult;

    /// Clear the message pane and show the welcome placeholder.
    fn show_welcome(&mut self) -> ViewResult;

    fn append_message(&mut self, message: &Message) -> ViewResult;

    fn update_message(&mut self, message: &Message) -> ViewResult;

    fn remove_message(&mut self, message_id: &str) -> ViewResult;

    fn render_recent_chats(&mut self, chats: &[RecentChat]) -> ViewResult;

    fn set_send_enabled(&mut self, enabled: bool) -> ViewResult;
}
