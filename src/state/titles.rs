//! Titles shown for a session, all derived from its first user message.

pub const ELLIPSIS: char = '\u{2026}';
pub const TAB_LABEL_MAX_CHARS: usize = 12;
pub const SIDEBAR_PREVIEW_MAX_CHARS: usize = 30;

/// Stored title and tab label: first line, 12 characters.
pub fn tab_label(text: &str) -> String {
    truncate_chars(first_line(text), TAB_LABEL_MAX_CHARS)
}

/// Recent-chats preview: first line, 30 characters.
pub fn sidebar_preview(text: &str) -> String {
    truncate_chars(first_line(text), SIDEBAR_PREVIEW_MAX_CHARS)
}

/// Tab label for a stored title. Derived titles are already short, renamed
/// ones may need cutting.
pub fn display_label(title: &str) -> String {
    let body = title.strip_suffix(ELLIPSIS).unwrap_or(title);
    if body.chars().count() <= TAB_LABEL_MAX_CHARS && !body.contains('\n') {
        return title.to_string();
    }
    tab_label(title)
}

fn first_line(text: &str) -> &str {
    let text = text.trim_start();
    text.lines().next().unwrap_or("").trim_end()
}

pub(crate) fn truncate_chars(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }

    let mut truncated: String = value.chars().take(max_chars).collect();
    truncated.push(ELLIPSIS);
    truncated
}
