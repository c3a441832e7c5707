//! Sending a message and waiting for the bot.
//!
//! A send is split in two: [`SessionManager::begin_reply`] records the user
//! message and a bot placeholder, and [`SessionManager::finish_reply`] fills
//! the placeholder in once the backend has answered. The handle returned by
//! the first half is consumed by the second, so a placeholder is resolved at
//! most once.

pub mod backend;

use chrono::Utc;
use thiserror::Error;

use crate::i18n::{self, Language};
use crate::models::{Message, PENDING_REPLY_TEXT, Sender};
use crate::persistence::KeyValueStore;
use crate::state::SessionManager;
use crate::view::ChatView;

pub use backend::{BackendError, ChatReply, ChatRequest, MockBackend, ReplyBackend};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendError {
    #[error("cannot send an empty message")]
    EmptyMessage,
    #[error("session '{0}' is still waiting for a reply")]
    ReplyInFlight(String),
}

#[derive(Debug)]
#[must_use = "a pending reply must be passed to finish_reply"]
pub struct PendingReply {
    session_id: String,
    placeholder_id: String,
    request: ChatRequest,
}

impl PendingReply {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn placeholder_id(&self) -> &str {
        &self.placeholder_id
    }

    pub fn request(&self) -> &ChatRequest {
        &self.request
    }
}

impl<S: KeyValueStore, V: ChatView> SessionManager<S, V> {
    /// Record the user's message in the active session (creating one when no
    /// tab is open) and add a bot placeholder.
    pub fn begin_reply(&mut self, text: &str, language: Language) -> Result<PendingReply, SendError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SendError::EmptyMessage);
        }

        let session_id = match self.active_tab().map(str::to_string) {
            Some(id) => id,
            None => self.create_session(),
        };
        if self.is_reply_pending(&session_id) {
            return Err(SendError::ReplyInFlight(session_id));
        }

        let now = Utc::now();
        self.append_message(&session_id, Sender::User, text, now);
        let placeholder_id = self.append_message(&session_id, Sender::Bot, PENDING_REPLY_TEXT, now);
        self.mark_reply_pending(&session_id);
        tracing::debug!("Waiting for reply in session {}", session_id);

        Ok(PendingReply {
            request: ChatRequest::new(text, language),
            session_id,
            placeholder_id,
        })
    }

    /// Resolve a placeholder. A failure, or a reply carrying an `error`,
    /// replaces the placeholder with a system notice.
    pub fn finish_reply(&mut self, pending: PendingReply, outcome: Result<ChatReply, BackendError>) {
        let PendingReply {
            session_id,
            placeholder_id,
            ..
        } = pending;

        if self.session(&session_id).is_none() {
            tracing::debug!("Dropping reply for closed session {}", session_id);
            return;
        }

        let outcome = outcome.and_then(|mut reply| match reply.error.take() {
            Some(error) => Err(BackendError::Server(error)),
            None => Ok(reply),
        });

        match outcome {
            Ok(reply) => {
                let timestamp = self
                    .session(&session_id)
                    .and_then(|session| session.message(&placeholder_id))
                    .map(|message| message.timestamp)
                    .unwrap_or_else(Utc::now);
                self.put_message(
                    &session_id,
                    Message::new(&placeholder_id, Sender::Bot, reply.reply, timestamp),
                );
            }
            Err(err) => {
                tracing::warn!("Reply for session {} failed: {}", session_id, err);
                self.remove_message(&session_id, &placeholder_id);
                self.append_message(&session_id, Sender::System, i18n::reply_failed(), Utc::now());
            }
        }

        self.clear_reply_pending(&session_id);
    }

    /// Send and wait for the backend in one call.
    pub fn send_message<B: ReplyBackend + ?Sized>(
        &mut self,
        text: &str,
        language: Language,
        backend: &mut B,
    ) -> Result<String, SendError> {
        let pending = self.begin_reply(text, language)?;
        let session_id = pending.session_id().to_string();
        let outcome = backend.send(pending.request());
        self.finish_reply(pending, outcome);
        Ok(session_id)
    }
}
