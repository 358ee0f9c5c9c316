//! Message types shown in the chat transcript.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Text shown by the typing placeholder while a reply is pending.
pub const TYPING_MARKER: &str = "...";

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Typed by the person using the widget.
    User,
    /// Produced by the assistant.
    Bot,
}

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique, monotonically assigned id.
    pub id: u64,
    /// Message text.
    pub text: String,
    /// Author of the message.
    pub sender: Sender,
    /// True while this is a typing placeholder awaiting its reply.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub pending: bool,
    /// When the message was created (or resolved, for bot replies).
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a user message.
    pub fn user(id: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            sender: Sender::User,
            pending: false,
            timestamp: Utc::now(),
        }
    }

    /// Create a resolved bot message.
    pub fn bot(id: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            sender: Sender::Bot,
            pending: false,
            timestamp: Utc::now(),
        }
    }

    /// Create a bot typing placeholder.
    pub fn placeholder(id: u64) -> Self {
        Self {
            id,
            text: TYPING_MARKER.to_string(),
            sender: Sender::Bot,
            pending: true,
            timestamp: Utc::now(),
        }
    }

    /// Whether this message was sent by the user.
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}
