use gettextrs::{LocaleCategory, gettext};
use std::fmt;
use std::str::FromStr;

use crate::config::{GETTEXT_PACKAGE, LOCALEDIR};

/// Bind the text domain. Failures leave untranslated English strings.
pub fn init() {
    gettextrs::setlocale(LocaleCategory::LcAll, "");
    if let Err(err) = gettextrs::bindtextdomain(GETTEXT_PACKAGE, LOCALEDIR) {
        tracing::warn!("Unable to bind the text domain: {}", err);
        return;
    }
    if let Err(err) = gettextrs::bind_textdomain_codeset(GETTEXT_PACKAGE, "UTF-8") {
        tracing::warn!("Unable to set the text domain codeset: {}", err);
    }
    if let Err(err) = gettextrs::textdomain(GETTEXT_PACKAGE) {
        tracing::warn!("Unable to switch to the text domain: {}", err);
    }
}

pub fn default_title() -> String {
    gettext("New chat")
}

pub fn bot_name() -> String {
    gettext("LegalBot")
}

pub fn user_name() -> String {
    gettext("User")
}

pub fn no_recent_chats() -> String {
    gettext("No recent chat history.")
}

pub fn reply_failed() -> String {
    gettext("Sorry, something went wrong while contacting the server. Please try again.")
}

pub fn chat_cleared() -> String {
    gettext("Chat history has been cleared.")
}

pub fn welcome() -> String {
    gettext("Hello! I am your legal AI assistant. Ask about contracts, terms or legal clauses.")
}

pub fn recent_chat_prefix() -> String {
    gettext("Q: ")
}

/// Language of the generated replies, sent to the backend with every message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Korean,
    English,
    Japanese,
    Chinese,
    Spanish,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Korean => "ko",
            Language::English => "en",
            Language::Japanese => "ja",
            Language::Chinese => "zh",
            Language::Spanish => "es",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Language::Korean => "한국어",
            Language::English => "English",
            Language::Japanese => "日本語",
            Language::Chinese => "中文",
            Language::Spanish => "Español",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ko" | "korean" | "한국어" => Ok(Language::Korean),
            "en" | "english" => Ok(Language::English),
            "ja" | "japanese" | "日本語" => Ok(Language::Japanese),
            "zh" | "chinese" | "中文" => Ok(Language::Chinese),
            "es" | "spanish" | "español" => Ok(Language::Spanish),
            other => Err(format!("unsupported language '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpretationMode {
    #[default]
    Default,
    Easy,
}

impl InterpretationMode {
    pub fn to_str(self) -> &'static str {
        match self {
            InterpretationMode::Default => "default",
            InterpretationMode::Easy => "easy",
        }
    }
}

impl fmt::Display for InterpretationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for InterpretationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(InterpretationMode::Default),
            "easy" => Ok(InterpretationMode::Easy),
            other => Err(format!("unsupported interpretation mode '{}'", other)),
        }
    }
}
