use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::i18n::{InterpretationMode, Language};
use crate::responder::MockResponder;
use crate::settings::Settings;

/// Body of a chat reply request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    pub language: String,
    pub use_rag: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, language: Language) -> Self {
        Self {
            message: message.into(),
            language: language.code().to_string(),
            use_rag: false,
            document_id: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ChatReply {
    #[serde(default)]
    pub reply: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rag_used: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_info: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatReply {
    pub fn text(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend returned an error: {0}")]
    Server(String),
    #[error("backend is unreachable: {0}")]
    Transport(String),
    #[error("malformed backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub trait ReplyBackend {
    fn send(&mut self, request: &ChatRequest) -> Result<ChatReply, BackendError>;

    /// Called when the user changes language or interpretation mode.
    fn apply_settings(&mut self, _settings: &Settings) {}
}

/// Local stand-in for the reply service.
#[derive(Debug, Clone)]
pub struct MockBackend {
    responder: MockResponder,
    min_delay: Duration,
    max_delay: Duration,
}

impl MockBackend {
    /// Waits 500 to 1000 ms before answering, like a real round trip.
    pub fn new(mode: InterpretationMode) -> Self {
        Self {
            responder: MockResponder::new(mode),
            min_delay: Duration::from_millis(500),
            max_delay: Duration::from_millis(1000),
        }
    }

    pub fn with_delay(mut self, min_delay: Duration, max_delay: Duration) -> Self {
        self.min_delay = min_delay;
        self.max_delay = max_delay.max(min_delay);
        self
    }

    pub fn without_delay(self) -> Self {
        self.with_delay(Duration::ZERO, Duration::ZERO)
    }

    fn delay(&self) -> Duration {
        if self.max_delay <= self.min_delay {
            return self.min_delay;
        }
        let min = self.min_delay.as_millis() as u64;
        let max = self.max_delay.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}

impl ReplyBackend for MockBackend {
    fn send(&mut self, request: &ChatRequest) -> Result<ChatReply, BackendError> {
        let language: Language = request
            .language
            .parse()
            .map_err(BackendError::Server)?;

        let delay = self.delay();
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }

        Ok(ChatReply::text(self.responder.reply(&request.message, language)))
    }

    fn apply_settings(&mut self, settings: &Settings) {
        self.responder.mode = settings.mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_without_missing_document() {
        let request = ChatRequest::new("Hello", Language::English);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"message": "Hello", "language": "en", "use_rag": false})
        );
    }

    #[test]
    fn reply_with_error_field_parses() {
        let reply: ChatReply =
            serde_json::from_str(r#"{"error": "model offline"}"#).unwrap();
        assert_eq!(reply.error.as_deref(), Some("model offline"));
        assert!(reply.reply.is_empty());
    }

    #[test]
    fn mock_backend_answers_in_requested_language() {
        let mut backend = MockBackend::new(InterpretationMode::Default).without_delay();
        let reply = backend
            .send(&ChatRequest::new("안녕", Language::Korean))
            .unwrap();

        assert!(reply.reply.contains("\"안녕\"에 대해 설명드리겠습니다"));
        assert!(reply.error.is_none());
    }

    #[test]
    fn mock_backend_rejects_unknown_language() {
        let mut backend = MockBackend::new(InterpretationMode::Default).without_delay();
        let mut request = ChatRequest::new("Hello", Language::English);
        request.language = "xx".to_string();

        assert!(matches!(backend.send(&request), Err(BackendError::Server(_))));
    }
}
