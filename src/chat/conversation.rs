//! Chat transcript.

use chrono::{DateTime, Local};
use std::fmt;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "You"),
            Sender::Bot => write!(f, "Bot"),
        }
    }
}

/// One line of the conversation.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Local>,
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.timestamp.format("%H:%M:%S"),
            self.sender,
            self.text
        )
    }
}

/// Messages in the order they were sent.
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message stamped with the current local time.
    pub fn push(&mut self, sender: Sender, text: impl Into<String>) -> &ChatMessage {
        self.messages.push(ChatMessage {
            text: text.into(),
            sender,
            timestamp: Local::now(),
        });
        &self.messages[self.messages.len() - 1]
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> &ChatMessage {
        self.push(Sender::User, text)
    }

    pub fn push_bot(&mut self, text: impl Into<String>) -> &ChatMessage {
        self.push(Sender::Bot, text)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Forget every message. Does not touch anything outside the chat.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
