//! Plain-text transcript of one session.

use chrono::{DateTime, Local, NaiveDate, Utc};
use thiserror::Error;

use crate::i18n;
use crate::models::{Message, Sender};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExportError {
    #[error("session '{0}' does not exist")]
    UnknownSession(String),
    #[error("nothing to export: the session has no messages")]
    NothingToExport,
}

/// Short local time, e.g. `9:05 PM`.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%-I:%M %p")
        .to_string()
}

/// `[time] Sender:\ntext` blocks separated by one blank line.
pub fn export_messages(messages: &[Message]) -> Result<String, ExportError> {
    if messages.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    let mut ordered: Vec<&Message> = messages.iter().collect();
    ordered.sort_by_key(|message| message.timestamp);

    let bot_name = i18n::bot_name();
    let blocks: Vec<String> = ordered
        .into_iter()
        .map(|message| {
            let sender = match message.sender {
                Sender::User => "User",
                Sender::Bot | Sender::System => bot_name.as_str(),
            };
            format!(
                "[{}] {}:\n{}",
                format_timestamp(&message.timestamp),
                sender,
                message.text
            )
        })
        .collect();

    Ok(blocks.join("\n\n"))
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("legalbot_chat_{}.txt", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn empty_session_has_nothing_to_export() {
        assert_eq!(export_messages(&[]), Err(ExportError::NothingToExport));
    }

    #[test]
    fn blocks_are_chronological_and_blank_line_separated() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let later = start + Duration::minutes(1);
        let messages = vec![
            Message::new("m2", Sender::Bot, "It depends.", later),
            Message::new("m1", Sender::User, "Is it fair?", start),
        ];

        let text = export_messages(&messages).unwrap();
        let blocks: Vec<&str> = text.split("\n\n").collect();

        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[0],
            format!("[{}] User:\nIs it fair?", format_timestamp(&start))
        );
        assert_eq!(
            blocks[1],
            format!(
                "[{}] {}:\nIt depends.",
                format_timestamp(&later),
                i18n::bot_name()
            )
        );
    }

    #[test]
    fn file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(export_file_name(date), "legalbot_chat_2024-03-07.txt");
    }
}
