use std::io::Write;

use crate::export::format_timestamp;
use crate::i18n;
use crate::markup::to_terminal_text;
use crate::models::{Message, PENDING_REPLY_TEXT, RecentChat, Sender};
use crate::view::{ChatView, TabEntry, ViewResult};

/// Line-oriented view for the interactive prompt.
///
/// A terminal cannot take back what it printed, so updates print the final
/// text of a message and removals are silent.
pub struct TerminalView<W: Write> {
    out: W,
    recent_chats: Vec<RecentChat>,
    send_enabled: bool,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            recent_chats: Vec::new(),
            send_enabled: true,
        }
    }

    pub fn send_enabled(&self) -> bool {
        self.send_enabled
    }

    /// Print the last rendered recent-chats list.
    pub fn print_recent_chats(&mut self) -> ViewResult {
        if self.recent_chats.is_empty() {
            writeln!(self.out, "{}", i18n::no_recent_chats())?;
            return Ok(());
        }

        let prefix = i18n::recent_chat_prefix();
        for (index, chat) in self.recent_chats.iter().enumerate() {
            writeln!(
                self.out,
                "{:>2}. {}{}  [{}]",
                index + 1,
                prefix,
                chat.label,
                chat.session_id
            )?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Print feedback that is not part of any chat.
    pub fn notice(&mut self, text: &str) -> ViewResult {
        writeln!(self.out, "{}", text)?;
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_message(&mut self, message: &Message) -> ViewResult {
        let name = match message.sender {
            Sender::User => i18n::user_name(),
            Sender::Bot => i18n::bot_name(),
            Sender::System => "*".to_string(),
        };

        if message.is_pending_reply() {
            writeln!(self.out, "{} {}", name, PENDING_REPLY_TEXT)?;
        } else {
            writeln!(
                self.out,
                "{} ({}): {}",
                name,
                format_timestamp(&message.timestamp),
                to_terminal_text(&message.text)
            )?;
        }
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> ChatView for TerminalView<W> {
    fn render_tabs(&mut self, tabs: &[TabEntry]) -> ViewResult {
        if tabs.is_empty() {
            return Ok(());
        }

        let line = tabs
            .iter()
            .map(|tab| {
                if tab.active {
                    format!("[*{}]", tab.label)
                } else {
                    format!("[{}]", tab.label)
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(self.out, "{}", line)?;
        Ok(())
    }

    fn render_messages(&mut self, messages: &[Message]) -> ViewResult {
        for message in messages {
            self.write_message(message)?;
        }
        Ok(())
    }

    fn show_welcome(&mut self) -> ViewResult {
        writeln!(self.out, "{}: {}", i18n::bot_name(), i18n::welcome())?;
        self.out.flush()?;
        Ok(())
    }

    fn append_message(&mut self, message: &Message) -> ViewResult {
        // The user's own line is already on screen as typed input.
        if message.sender == Sender::User {
            return Ok(());
        }
        self.write_message(message)
    }

    fn update_message(&mut self, message: &Message) -> ViewResult {
        self.write_message(message)
    }

    fn remove_message(&mut self, _message_id: &str) -> ViewResult {
        Ok(())
    }

    fn render_recent_chats(&mut self, chats: &[RecentChat]) -> ViewResult {
        self.recent_chats = chats.to_vec();
        Ok(())
    }

    fn set_send_enabled(&mut self, enabled: bool) -> ViewResult {
        self.send_enabled = enabled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn output(view: TerminalView<Vec<u8>>) -> String {
        String::from_utf8(view.into_inner()).unwrap()
    }

    #[test]
    fn active_tab_is_marked() {
        let mut view = TerminalView::new(Vec::new());
        let tabs = vec![
            TabEntry {
                id: "a".into(),
                label: "Lease".into(),
                title: "Lease".into(),
                active: false,
            },
            TabEntry {
                id: "b".into(),
                label: "Deposit".into(),
                title: "Deposit".into(),
                active: true,
            },
        ];

        view.render_tabs(&tabs).unwrap();
        assert_eq!(output(view), "[Lease] [*Deposit]\n");
    }

    #[test]
    fn bot_messages_are_rendered_as_plain_text() {
        let mut view = TerminalView::new(Vec::new());
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let message = Message::new("m1", Sender::Bot, "This is **important**", ts);

        view.append_message(&message).unwrap();
        let text = output(view);
        assert!(text.contains("This is important"));
        assert!(!text.contains("**"));
    }

    #[test]
    fn pending_reply_shows_the_stored_placeholder() {
        let mut view = TerminalView::new(Vec::new());
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();

        view.append_message(&Message::new("m1", Sender::Bot, "", ts))
            .unwrap();
        view.append_message(&Message::new("m2", Sender::Bot, PENDING_REPLY_TEXT, ts))
            .unwrap();
        let expected = format!("{} {}\n", i18n::bot_name(), PENDING_REPLY_TEXT);
        assert_eq!(output(view), expected.repeat(2));
    }

    #[test]
    fn user_messages_are_not_echoed_on_append() {
        let mut view = TerminalView::new(Vec::new());
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();

        view.append_message(&Message::new("m1", Sender::User, "hi", ts))
            .unwrap();
        assert!(output(view).is_empty());
    }

    #[test]
    fn empty_recent_list_prints_placeholder() {
        let mut view = TerminalView::new(Vec::new());
        view.render_recent_chats(&[]).unwrap();
        view.print_recent_chats().unwrap();

        assert_eq!(output(view), format!("{}\n", i18n::no_recent_chats()));
    }
}
