use crate::models::{Message, RecentChat};
use crate::view::{ChatView, TabEntry, ViewResult};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Welcome,
    Messages(Vec<Message>),
}

/// View without a screen. Keeps whatever was last rendered so scripted
/// commands and tests can inspect it.
#[derive(Debug, Clone)]
pub struct HeadlessView {
    pub tabs: Vec<TabEntry>,
    pub pane: Pane,
    pub recent_chats: Vec<RecentChat>,
    pub send_enabled: bool,
    pub render_count: usize,
}

impl Default for HeadlessView {
    fn default() -> Self {
        Self {
            tabs: Vec::new(),
            pane: Pane::Welcome,
            recent_chats: Vec::new(),
            send_enabled: true,
            render_count: 0,
        }
    }
}

impl HeadlessView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_showing_welcome(&self) -> bool {
        self.pane == Pane::Welcome
    }

    pub fn messages(&self) -> &[Message] {
        match &self.pane {
            Pane::Welcome => &[],
            Pane::Messages(messages) => messages,
        }
    }

    pub fn active_tab(&self) -> Option<&TabEntry> {
        self.tabs.iter().find(|tab| tab.active)
    }
}

impl ChatView for HeadlessView {
    fn render_tabs(&mut self, tabs: &[TabEntry]) -> ViewResult {
        self.render_count += 1;
        self.tabs = tabs.to_vec();
        Ok(())
    }

    fn render_messages(&mut self, messages: &[Message]) -> ViewResult {
        self.render_count += 1;
        self.pane = Pane::Messages(messages.to_vec());
        Ok(())
    }

    fn show_welcome(&mut self) -> ViewResult {
        self.render_count += 1;
        self.pane = Pane::Welcome;
        Ok(())
    }

    fn append_message(&mut self, message: &Message) -> ViewResult {
        self.render_count += 1;
        match &mut self.pane {
            Pane::Welcome => self.pane = Pane::Messages(vec![message.clone()]),
            Pane::Messages(messages) => messages.push(message.clone()),
        }
        Ok(())
    }

    fn update_message(&mut self, message: &Message) -> ViewResult {
        self.render_count += 1;
        if let Pane::Messages(messages) = &mut self.pane
            && let Some(existing) = messages.iter_mut().find(|m| m.id == message.id)
        {
            *existing = message.clone();
        }
        Ok(())
    }

    fn remove_message(&mut self, message_id: &str) -> ViewResult {
        self.render_count += 1;
        if let Pane::Messages(messages) = &mut self.pane {
            messages.retain(|m| m.id != message_id);
        }
        Ok(())
    }

    fn render_recent_chats(&mut self, chats: &[RecentChat]) -> ViewResult {
        self.render_count += 1;
        self.recent_chats = chats.to_vec();
        Ok(())
    }

    fn set_send_enabled(&mut self, enabled: bool) -> ViewResult {
        self.send_enabled = enabled;
        Ok(())
    }
}
