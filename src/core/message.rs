//! # Transcript
//!
//! The conversation as shown on screen: an ordered, append-only list of
//! `ChatMessage` records. Lives in memory only and is dropped on exit.
//!
//! ```text
//! Transcript
//! └── messages: Vec<ChatMessage>
//!     ├── [0] Bot  "Welcome to ..."
//!     ├── [1] User "What is ...?"
//!     └── [2] Bot  "According to ..."
//! ```

/// Default greeting shown as the first bot message.
pub const DEFAULT_WELCOME: &str = "Welcome to **Geostrata AI**. \n\nI have access to the latest research on global affairs, national security, and foreign policy. How can I assist you today?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

/// One turn in the displayed conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            text: text.into(),
        }
    }

    pub fn is_bot(&self) -> bool {
        self.role == Role::Bot
    }
}

/// Append-only message history. Records cannot be removed or edited once pushed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    /// A transcript seeded with a single bot greeting.
    pub fn with_welcome(text: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::bot(text)],
        }
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::user(text));
    }

    pub fn push_bot(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::bot(text));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Index of the final record, but only when that record is from the bot.
    /// This is the one message the typewriter animates.
    pub fn last_bot_index(&self) -> Option<usize> {
        match self.messages.last() {
            Some(msg) if msg.is_bot() => Some(self.messages.len() - 1),
            _ => None,
        }
    }
}
