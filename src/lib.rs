pub mod chat;
pub mod config;
pub mod data_dir;
pub mod database;
pub mod export;
pub mod i18n;
pub mod markup;
pub mod models;
pub mod persistence;
pub mod repl;
pub mod responder;
pub mod settings;
pub mod state;
pub mod view;

// Re-export commonly used types
pub use chat::{ChatReply, ChatRequest, MockBackend, PendingReply, ReplyBackend, SendError};
pub use database::SqliteStore;
pub use models::{Message, RecentChat, Sender, Session, Tab};
pub use persistence::{KeyValueStore, MemoryStore, StoreError};
pub use settings::Settings;
pub use state::{RenameError, SessionManager};
pub use view::{ChatView, HeadlessView, TerminalView};
