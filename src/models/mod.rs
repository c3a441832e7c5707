pub mod message;
pub mod recent_chat;
pub mod session;

pub use message::{Message, PENDING_REPLY_TEXT, Sender};
pub use recent_chat::RecentChat;
pub use session::{Session, Tab};
