//! fitchat-engine: Headless core of the fitchat fitness assistant
//!
//! This crate provides everything except rendering:
//! - Message model and the conversation state machine
//! - Reply providers (keyword matcher, remote completion API)
//! - The chat-completion HTTP client
//! - Chat sessions that dispatch and apply pending replies
//! - Environment-driven configuration

pub mod completion;
pub mod config;
pub mod conversation;
pub mod message;
pub mod provider;
pub mod session;

// Re-export commonly used types
pub use completion::{
    CompletionApi, CompletionError, CompletionRequest, CompletionResponse, CompletionSettings,
    HttpCompletionClient,
};
pub use config::{Config, ConfigError};
pub use conversation::{ConversationState, PendingReply, GREETING};
pub use message::{Message, Sender, TYPING_MARKER};
pub use provider::{
    KeywordMatcher, ProviderKind, RemoteCompletionProvider, ReplyProvider, ReplyTopic,
    REMOTE_FALLBACK,
};
pub use session::{ChatSession, ReplyResolved};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
