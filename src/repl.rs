//! Interactive prompt: slash commands plus free text sent to the bot.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use gettextrs::gettext;
use thiserror::Error;

use crate::chat::ReplyBackend;
use crate::export::export_file_name;
use crate::i18n::{self, InterpretationMode, Language};
use crate::persistence::KeyValueStore;
use crate::settings::Settings;
use crate::state::SessionManager;
use crate::view::TerminalView;

/// A slash command as listed by `/help`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandHelp {
    pub usage: &'static str,
    pub description: String,
}

/// Every command with its description in the current locale.
pub fn commands() -> Vec<CommandHelp> {
    let help = |usage: &'static str, description: String| CommandHelp { usage, description };
    vec![
        help("/new", gettext("Start a new chat in its own tab")),
        help("/tabs", gettext("Show open tabs")),
        help("/switch <n|id>", gettext("Switch to a tab by position or session id")),
        help("/close [n|id]", gettext("Close a tab and delete its chat (default: current)")),
        help("/delete <n|id>", gettext("Delete a recent chat, closing its tab if open")),
        help("/rename <title>", gettext("Rename the current chat")),
        help("/recent", gettext("List recent chats")),
        help("/open <n|id>", gettext("Reopen a recent chat")),
        help("/export [file]", gettext("Save the current chat as text")),
        help("/clear", gettext("Delete every chat")),
        help("/mode <default|easy>", gettext("Choose how replies are explained")),
        help("/lang <ko|en|ja|zh|es>", gettext("Choose the reply language")),
        help("/help", gettext("Show this list")),
        help("/quit", gettext("Leave")),
    ]
}

/// A tab or recent chat, by 1-based position or by session id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Position(usize),
    Id(String),
}

impl Target {
    fn parse(arg: &str) -> Self {
        match arg.parse::<usize>() {
            Ok(position) if position > 0 => Target::Position(position),
            _ => Target::Id(arg.to_string()),
        }
    }

    fn resolve<'a>(&'a self, ids: &'a [String]) -> Option<&'a str> {
        match self {
            Target::Position(position) => position
                .checked_sub(1)
                .and_then(|index| ids.get(index))
                .map(String::as_str),
            Target::Id(id) => Some(id.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Send(String),
    New,
    Tabs,
    Switch(Target),
    Close(Option<Target>),
    Delete(Target),
    Rename(String),
    Recent,
    Open(Target),
    Export(Option<PathBuf>),
    Clear,
    Mode(InterpretationMode),
    Language(Language),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command '/{0}', try /help")]
    UnknownCommand(String),
    #[error("usage: {0}")]
    MissingArgument(&'static str),
    #[error("{0}")]
    InvalidValue(String),
}

impl ReplCommand {
    /// Blank lines parse to `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Some(ReplCommand::Send(line.to_string())));
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        let arg = (!arg.is_empty()).then_some(arg);

        let command = match name.to_ascii_lowercase().as_str() {
            "new" => ReplCommand::New,
            "tabs" => ReplCommand::Tabs,
            "switch" => ReplCommand::Switch(Target::parse(
                arg.ok_or(ParseError::MissingArgument("/switch <n|id>"))?,
            )),
            "close" => ReplCommand::Close(arg.map(Target::parse)),
            "delete" => ReplCommand::Delete(Target::parse(
                arg.ok_or(ParseError::MissingArgument("/delete <n|id>"))?,
            )),
            "rename" => ReplCommand::Rename(
                arg.ok_or(ParseError::MissingArgument("/rename <title>"))?
                    .to_string(),
            ),
            "recent" => ReplCommand::Recent,
            "open" => ReplCommand::Open(Target::parse(
                arg.ok_or(ParseError::MissingArgument("/open <n|id>"))?,
            )),
            "export" => ReplCommand::Export(arg.map(PathBuf::from)),
            "clear" => ReplCommand::Clear,
            "mode" => ReplCommand::Mode(
                InterpretationMode::from_str(
                    arg.ok_or(ParseError::MissingArgument("/mode <default|easy>"))?,
                )
                .map_err(ParseError::InvalidValue)?,
            ),
            "lang" | "language" => ReplCommand::Language(
                Language::from_str(arg.ok_or(ParseError::MissingArgument("/lang <ko|en|ja|zh|es>"))?)
                    .map_err(ParseError::InvalidValue)?,
            ),
            "help" | "?" => ReplCommand::Help,
            "quit" | "exit" | "q" => ReplCommand::Quit,
            other => return Err(ParseError::UnknownCommand(other.to_string())),
        };

        Ok(Some(command))
    }
}

/// Drives a [`SessionManager`] from lines of input.
pub struct Repl<S: KeyValueStore, W: Write, B: ReplyBackend> {
    manager: SessionManager<S, TerminalView<W>>,
    backend: B,
    settings: Settings,
}

impl<S: KeyValueStore, W: Write, B: ReplyBackend> Repl<S, W, B> {
    pub fn new(manager: SessionManager<S, TerminalView<W>>, backend: B, settings: Settings) -> Self {
        Self {
            manager,
            backend,
            settings,
        }
    }

    pub fn manager(&self) -> &SessionManager<S, TerminalView<W>> {
        &self.manager
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn into_manager(self) -> SessionManager<S, TerminalView<W>> {
        self.manager
    }

    /// Read commands until `/quit` or end of input.
    pub fn run<R: BufRead>(&mut self, input: R) -> anyhow::Result<()> {
        for line in input.lines() {
            let line = line.context("Failed to read from the terminal")?;
            match ReplCommand::parse(&line) {
                Ok(Some(command)) => {
                    if !self.execute(command)? {
                        break;
                    }
                }
                Ok(None) => {}
                Err(err) => self.notice(&err.to_string()),
            }
        }
        Ok(())
    }

    /// Returns false when the session should end.
    pub fn execute(&mut self, command: ReplCommand) -> anyhow::Result<bool> {
        match command {
            ReplCommand::Send(text) => {
                if let Err(err) =
                    self.manager
                        .send_message(&text, self.settings.language, &mut self.backend)
                {
                    self.notice(&err.to_string());
                }
            }
            ReplCommand::New => {
                self.manager.create_session();
            }
            ReplCommand::Tabs => self.print_tabs(),
            ReplCommand::Switch(target) => {
                let ids = self.tab_ids();
                match target.resolve(&ids) {
                    Some(id) if self.manager.switch_tab(id) => {}
                    _ => self.notice(&gettext("No such tab.")),
                }
            }
            ReplCommand::Close(target) => {
                let ids = self.tab_ids();
                let id = match &target {
                    Some(target) => target.resolve(&ids).map(str::to_string),
                    None => self.manager.active_tab().map(str::to_string),
                };
                match id {
                    Some(id) if self.manager.close_tab(&id) => {}
                    _ => self.notice(&gettext("No such tab.")),
                }
            }
            ReplCommand::Rename(title) => match self.manager.active_tab().map(str::to_string) {
                Some(id) => {
                    if let Err(err) = self.manager.rename_session(&id, &title) {
                        self.notice(&err.to_string());
                    }
                }
                None => self.notice(&gettext("No chat is open.")),
            },
            ReplCommand::Recent => {
                if let Err(err) = self.manager.view_mut().print_recent_chats() {
                    tracing::warn!("Failed to print recent chats: {}", err);
                }
            }
            ReplCommand::Open(target) => {
                let ids = self.recent_ids();
                match target.resolve(&ids) {
                    Some(id) if self.manager.open_recent(id) => {}
                    _ => self.notice(&gettext("No such chat.")),
                }
            }
            ReplCommand::Delete(target) => {
                let ids = self.recent_ids();
                match target.resolve(&ids) {
                    Some(id) if self.manager.delete_session(id) => {}
                    _ => self.notice(&gettext("No such chat.")),
                }
            }
            ReplCommand::Export(path) => self.export(path)?,
            ReplCommand::Clear => {
                self.manager.clear_all_sessions();
                self.notice(&i18n::chat_cleared());
            }
            ReplCommand::Mode(mode) => {
                self.settings.mode = mode;
                self.save_settings();
            }
            ReplCommand::Language(language) => {
                self.settings.language = language;
                self.save_settings();
            }
            ReplCommand::Help => {
                let lines: Vec<String> = commands()
                    .iter()
                    .map(|command| format!("{:<22} {}", command.usage, command.description))
                    .collect();
                self.notice(&lines.join("\n"));
            }
            ReplCommand::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn tab_ids(&self) -> Vec<String> {
        self.manager.open_tabs().into_iter().map(|tab| tab.id).collect()
    }

    fn recent_ids(&self) -> Vec<String> {
        self.manager
            .recent_chats()
            .into_iter()
            .map(|chat| chat.session_id)
            .collect()
    }

    fn print_tabs(&mut self) {
        let entries = self.manager.tab_entries();
        if entries.is_empty() {
            self.notice(&gettext("No open tabs."));
            return;
        }
        let lines: Vec<String> = entries
            .iter()
            .enumerate()
            .map(|(index, tab)| {
                let marker = if tab.active { '*' } else { ' ' };
                format!("{}{:>2}. {}  [{}]", marker, index + 1, tab.label, tab.id)
            })
            .collect();
        self.notice(&lines.join("\n"));
    }

    fn export(&mut self, path: Option<PathBuf>) -> anyhow::Result<()> {
        let Some(id) = self.manager.active_tab().map(str::to_string) else {
            self.notice(&gettext("No chat is open."));
            return Ok(());
        };

        match self.manager.export_session(&id) {
            Ok(text) => {
                let path = path.unwrap_or_else(|| {
                    PathBuf::from(export_file_name(chrono::Local::now().date_naive()))
                });
                std::fs::write(&path, text)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                self.notice(&gettext("Saved {}").replace("{}", &path.display().to_string()));
            }
            Err(err) => self.notice(&err.to_string()),
        }
        Ok(())
    }

    fn save_settings(&mut self) {
        match self.settings.save(self.manager.store_mut()) {
            Ok(()) => self.notice(
                &gettext("Language: {language}, mode: {mode}")
                    .replace("{language}", self.settings.language.display_name())
                    .replace("{mode}", &self.settings.mode.to_string()),
            ),
            Err(err) => tracing::warn!("Failed to save settings: {}", err),
        }
        self.backend.apply_settings(&self.settings);
    }

    fn notice(&mut self, text: &str) {
        if let Err(err) = self.manager.view_mut().notice(text) {
            tracing::warn!("Failed to write to the terminal: {}", err);
        }
    }
}
