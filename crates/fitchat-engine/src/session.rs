//! Chat session: conversation state plus in-flight reply dispatch.
//!
//! Each submission spawns a tokio task that resolves the reply and sends it
//! back over a channel. The owner drains the channel from its own loop, so
//! the conversation state is only ever touched by one logical flow.
//!
//! Replies submitted back to back may resolve in either order. Closing the
//! widget does not cancel anything; only [`ChatSession::shutdown`] (or drop)
//! does, so that no reply lands after the owner is gone.

use crate::conversation::{ConversationState, PendingReply};
use crate::provider::ReplyProvider;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A reply that finished resolving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyResolved {
    /// Placeholder the reply replaces.
    pub placeholder_id: u64,
    /// Resolved reply text.
    pub text: String,
}

/// Conversation state bound to a reply provider.
///
/// Submitting requires a running tokio runtime.
#[derive(Debug)]
pub struct ChatSession {
    state: ConversationState,
    provider: Arc<ReplyProvider>,
    tx: mpsc::UnboundedSender<ReplyResolved>,
    rx: mpsc::UnboundedReceiver<ReplyResolved>,
    cancel: CancellationToken,
}

impl ChatSession {
    /// Create a session with a fresh conversation.
    pub fn new(provider: ReplyProvider) -> Self {
        Self::with_state(ConversationState::new(), provider)
    }

    /// Create a session over an existing conversation.
    pub fn with_state(state: ConversationState, provider: ReplyProvider) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state,
            provider: Arc::new(provider),
            tx,
            rx,
            cancel: CancellationToken::new(),
        }
    }

    /// Conversation state.
    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// Mutable conversation state (open/close, draft editing).
    pub fn state_mut(&mut self) -> &mut ConversationState {
        &mut self.state
    }

    /// The reply provider in use.
    pub fn provider(&self) -> &ReplyProvider {
        &self.provider
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Submit `text` and start resolving its reply.
    ///
    /// Returns `false` for whitespace-only text, or once the session has
    /// been shut down. Either way nothing changes.
    pub fn submit(&mut self, text: &str) -> bool {
        if self.is_shut_down() {
            return false;
        }
        match self.state.submit_message(text) {
            Some(pending) => {
                self.dispatch(pending);
                true
            }
            None => false,
        }
    }

    /// Submit the current draft and start resolving its reply.
    pub fn submit_draft(&mut self) -> bool {
        if self.is_shut_down() {
            return false;
        }
        match self.state.submit_draft() {
            Some(pending) => {
                self.dispatch(pending);
                true
            }
            None => false,
        }
    }

    fn dispatch(&self, pending: PendingReply) {
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        let cancel = self.cancel.child_token();

        tokio::spawn(async move {
            let PendingReply {
                placeholder_id,
                prompt,
            } = pending;

            tokio::select! {
                () = cancel.cancelled() => {
                    debug!(placeholder_id, "Reply cancelled");
                }
                text = provider.resolve_reply(&prompt) => {
                    // Receiver gone means the session was dropped.
                    let _ = tx.send(ReplyResolved { placeholder_id, text });
                }
            }
        });
    }

    fn apply(&mut self, resolved: ReplyResolved) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        self.state
            .resolve_reply(resolved.placeholder_id, resolved.text)
    }

    /// Apply every reply that has already resolved, without waiting.
    ///
    /// Returns the number of placeholders replaced.
    pub fn apply_resolved(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(resolved) = self.rx.try_recv() {
            if self.apply(resolved) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next reply to resolve and apply it.
    ///
    /// Returns the placeholder id that was replaced, or `None` when nothing
    /// is pending or the session was shut down.
    pub async fn next_resolved(&mut self) -> Option<u64> {
        if self.state.pending_count() == 0 || self.cancel.is_cancelled() {
            return None;
        }

        let resolved = tokio::select! {
            () = self.cancel.cancelled() => return None,
            resolved = self.rx.recv() => resolved?,
        };

        let id = resolved.placeholder_id;
        self.apply(resolved).then_some(id)
    }

    /// Cancel all in-flight replies. Later resolutions are discarded.
    pub fn shutdown(&self) {
        if !self.cancel.is_cancelled() {
            debug!(pending = self.state.pending_count(), "Shutting down chat session");
        }
        self.cancel.cancel();
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
