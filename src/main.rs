use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use gettextrs::gettext;

use legalbot_chat::config::{APP_ID, PROFILE, VERSION};
use legalbot_chat::data_dir::DataDir;
use legalbot_chat::export::export_file_name;
use legalbot_chat::i18n::{self, InterpretationMode, Language};
use legalbot_chat::repl::Repl;
use legalbot_chat::{
    HeadlessView, MockBackend, SessionManager, Settings, SqliteStore, TerminalView,
};

#[derive(Parser)]
#[command(name = "legalbot-chat", version, about = "Chat with LegalBot from the terminal")]
struct Args {
    /// Keep the chat database in this directory instead of the user data dir
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Reply language (ko, en, ja, zh, es)
    #[arg(long)]
    language: Option<Language>,

    /// Interpretation mode (default, easy)
    #[arg(long)]
    mode: Option<InterpretationMode>,

    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive chat (the default)
    Chat,
    /// Print open tabs and recent chats
    List,
    /// Write a chat transcript
    Export {
        /// Session to export (default: the active tab)
        #[arg(long)]
        session: Option<String>,
        /// Output file; "-" prints to stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Delete every chat
    Clear,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Enable logging
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    i18n::init();

    let data_dir = DataDir::resolve(args.data_dir.as_deref())?;
    std::fs::create_dir_all(&data_dir.root)
        .with_context(|| format!("Failed to create {}", data_dir.root.display()))?;
    let db_path = data_dir.db_path();
    tracing::info!(
        "Starting {} {} ({} profile), database {}",
        APP_ID,
        VERSION,
        PROFILE,
        db_path.display()
    );

    let mut store = SqliteStore::open(&db_path)?;
    let mut settings = Settings::load(&store).context("Failed to load settings")?;
    if args.language.is_some() || args.mode.is_some() {
        settings.language = args.language.unwrap_or(settings.language);
        settings.mode = args.mode.unwrap_or(settings.mode);
        settings
            .save(&mut store)
            .context("Failed to save settings")?;
    }

    match args.command.unwrap_or(Command::Chat) {
        Command::Chat => run_chat(store, settings),
        Command::List => list(store),
        Command::Export { session, output } => export(store, session, output),
        Command::Clear => {
            let mut manager = SessionManager::restore(store, HeadlessView::new())
                .context("Failed to restore chat sessions")?;
            manager.clear_all_sessions();
            println!("{}", i18n::chat_cleared());
            Ok(())
        }
    }
}

fn run_chat(store: SqliteStore, settings: Settings) -> Result<()> {
    let view = TerminalView::new(io::stdout());
    let manager =
        SessionManager::restore(store, view).context("Failed to restore chat sessions")?;
    let backend = MockBackend::new(settings.mode);

    println!("{}", gettext("Type a question, or /help for commands."));
    let mut repl = Repl::new(manager, backend, settings);
    repl.run(io::stdin().lock())
}

fn list(store: SqliteStore) -> Result<()> {
    let manager = SessionManager::restore(store, HeadlessView::new())
        .context("Failed to restore chat sessions")?;

    let tabs = manager.tab_entries();
    if tabs.is_empty() {
        println!("{}", gettext("No open tabs."));
    }
    for tab in &tabs {
        let marker = if tab.active { '*' } else { ' ' };
        println!(
            "{} {}  {} ({} messages)",
            marker,
            tab.id,
            tab.title,
            manager.messages(&tab.id).len()
        );
    }

    println!();
    let recent = manager.recent_chats();
    if recent.is_empty() {
        println!("{}", i18n::no_recent_chats());
    }
    for chat in recent {
        println!("{}{}  [{}]", i18n::recent_chat_prefix(), chat.label, chat.session_id);
    }
    Ok(())
}

fn export(store: SqliteStore, session: Option<String>, output: Option<PathBuf>) -> Result<()> {
    let manager = SessionManager::restore(store, HeadlessView::new())
        .context("Failed to restore chat sessions")?;

    let Some(session_id) = session.or_else(|| manager.active_tab().map(str::to_string)) else {
        bail!("No chat is open; pass --session");
    };
    let text = manager
        .export_session(&session_id)
        .with_context(|| format!("Cannot export session {}", session_id))?;

    match output {
        Some(path) if path.as_os_str() == "-" => println!("{}", text),
        output => {
            let path = output.unwrap_or_else(|| {
                PathBuf::from(export_file_name(chrono::Local::now().date_naive()))
            });
            std::fs::write(&path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{}", path.display());
        }
    }
    Ok(())
}
