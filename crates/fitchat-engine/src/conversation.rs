//! Conversation state machine for the chat widget.
//!
//! [`ConversationState`] owns the open/closed flag, the ordered message list
//! and the draft input. It never produces replies itself: submitting returns
//! a [`PendingReply`] that the caller resolves asynchronously and hands back
//! through [`ConversationState::resolve_reply`].

use crate::message::Message;
use tracing::debug;

/// Greeting shown before the user has said anything.
pub const GREETING: &str = "Hi there! I'm your fitness assistant. How can I help you today?";

/// A reply requested by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    /// Id of the typing placeholder to replace once the reply resolves.
    pub placeholder_id: u64,
    /// The submitted user text, passed verbatim to the reply provider.
    pub prompt: String,
}

/// Widget-owned conversation state.
#[derive(Debug, Clone)]
pub struct ConversationState {
    is_open: bool,
    messages: Vec<Message>,
    draft: String,
    /// Next message id to assign.
    next_id: u64,
    /// Bumped on every mutation of `messages`.
    revision: u64,
}

impl ConversationState {
    /// Create a closed conversation holding only the greeting.
    pub fn new() -> Self {
        Self {
            is_open: false,
            messages: vec![Message::bot(1, GREETING)],
            draft: String::new(),
            next_id: 2,
            revision: 0,
        }
    }

    /// Whether the chat window is visible.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Flip between open and closed.
    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;
    }

    /// Show the chat window.
    pub fn open(&mut self) {
        self.is_open = true;
    }

    /// Hide the chat window. In-flight replies are unaffected.
    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// All messages in display order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The newest message.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false in practice: the greeting is never removed.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of typing placeholders still awaiting a reply.
    pub fn pending_count(&self) -> usize {
        self.messages.iter().filter(|m| m.pending).count()
    }

    /// Current draft input.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Mutable access to the draft input.
    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    /// Replace the draft input.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Counter bumped whenever the message sequence changes.
    ///
    /// Views compare it against the last value they saw to decide when to
    /// scroll to the newest message.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Submit `text` as a user message.
    ///
    /// Whitespace-only text is ignored and returns `None`. Otherwise the user
    /// message and a typing placeholder are appended, the draft is cleared,
    /// and the reply to request is returned.
    pub fn submit_message(&mut self, text: &str) -> Option<PendingReply> {
        if text.trim().is_empty() {
            return None;
        }

        let user_id = self.allocate_id();
        self.messages.push(Message::user(user_id, text));
        self.draft.clear();

        let placeholder_id = self.allocate_id();
        self.messages.push(Message::placeholder(placeholder_id));
        self.revision += 1;

        debug!(user_id, placeholder_id, "Submitted message");

        Some(PendingReply {
            placeholder_id,
            prompt: text.to_string(),
        })
    }

    /// Submit the current draft.
    pub fn submit_draft(&mut self) -> Option<PendingReply> {
        let text = std::mem::take(&mut self.draft);
        let pending = self.submit_message(&text);
        if pending.is_none() {
            // Nothing was sent; keep what the user typed.
            self.draft = text;
        }
        pending
    }

    /// Replace the placeholder `placeholder_id` with the resolved reply.
    ///
    /// The reply keeps the placeholder's id and position. Returns `false` if
    /// no pending placeholder has that id.
    pub fn resolve_reply(&mut self, placeholder_id: u64, text: impl Into<String>) -> bool {
        let Some(slot) = self
            .messages
            .iter_mut()
            .find(|m| m.id == placeholder_id && m.pending)
        else {
            debug!(placeholder_id, "No pending placeholder to resolve");
            return false;
        };

        *slot = Message::bot(placeholder_id, text);
        self.revision += 1;
        debug!(placeholder_id, "Resolved reply");
        true
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}
