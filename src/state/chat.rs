//! Chat view model and container rendering.
//!
//! ARCHITECTURE
//! ============
//! Wire messages are projected into [`MessageView`]s (direction class, text,
//! formatted time). The Leptos `ChatPanel` renders views reactively; pages that
//! own a server-rendered container go through [`ChatSurface`] instead.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use std::rc::Rc;

use crate::net::chat::ChatMessage;
use crate::util::format::format_date;

/// Which side of the conversation a message belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Sent,
    Received,
}

impl Direction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Received => "received",
        }
    }
}

/// One rendered chat row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageView {
    pub direction: Direction,
    pub text: String,
    pub time: String,
}

impl MessageView {
    #[must_use]
    pub fn class(&self) -> String {
        format!("chat-message {}", self.direction.as_str())
    }
}

impl From<&ChatMessage> for MessageView {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            direction: if msg.is_sent { Direction::Sent } else { Direction::Received },
            text: msg.text.clone(),
            time: format_date(msg.timestamp.as_deref()),
        }
    }
}

/// Project a full message set into views, preserving order.
#[must_use]
pub fn render_messages(messages: &[ChatMessage]) -> Vec<MessageView> {
    messages.iter().map(MessageView::from).collect()
}

/// A place chat views can be drawn into, addressed by element id.
pub trait ChatSurface {
    /// Replace the container's content with `views` and scroll it to the
    /// bottom. Returns false when no such container exists.
    fn render(&self, container_id: &str, views: &[MessageView]) -> bool;
}

impl<S: ChatSurface + ?Sized> ChatSurface for Rc<S> {
    fn render(&self, container_id: &str, views: &[MessageView]) -> bool {
        (**self).render(container_id, views)
    }
}

/// Fully re-render `container_id` from `messages`. No-op when the container
/// is missing.
pub fn display_messages<S: ChatSurface + ?Sized>(surface: &S, messages: &[ChatMessage], container_id: &str) {
    let views = render_messages(messages);
    if !surface.render(container_id, &views) {
        leptos::logging::debug_warn!("chat container #{container_id} not found");
    }
}

/// State for the chat panel component.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub loading: bool,
    pub sending: bool,
}

impl ChatState {
    /// Replace the whole displayed set.
    pub fn replace(&mut self, messages: Vec<ChatMessage>) {
        self.messages = messages;
        self.loading = false;
    }

    #[must_use]
    pub fn views(&self) -> Vec<MessageView> {
        render_messages(&self.messages)
    }
}
