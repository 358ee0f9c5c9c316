//! Reply providers.
//!
//! A [`ReplyProvider`] turns the latest user message into a reply string.
//! It is chosen once at construction time: either the local
//! [`KeywordMatcher`] (wrapped in an artificial delay) or the
//! [`RemoteCompletionProvider`] backed by a hosted completion API.

use crate::completion::{CompletionApi, CompletionRequest, CompletionSettings};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Reply returned when the remote API call fails for any reason.
pub const REMOTE_FALLBACK: &str = "Sorry, I couldn't process your request at the moment.";

/// Default artificial latency for the keyword provider.
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1000);

/// Topic a keyword reply was chosen for, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyTopic {
    Workout,
    Nutrition,
    Progress,
    Posture,
    Greeting,
    Fallback,
}

impl ReplyTopic {
    /// Keywords that select this topic. Empty for the fallback.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Workout => &["workout", "exercise"],
            Self::Nutrition => &["diet", "nutrition", "food"],
            Self::Progress => &["progress", "track"],
            Self::Posture => &["posture", "form"],
            Self::Greeting => &["hello", "hi"],
            Self::Fallback => &[],
        }
    }

    /// Canned reply for this topic.
    pub fn response(self) -> &'static str {
        match self {
            Self::Workout => "Absolutely! 💪 I can suggest workouts tailored to your goals and fitness level. You can also try our personalized workout generator on the home page to get a full routine ready in seconds.",
            Self::Nutrition => "Nutrition is just as important as exercise! 🥗 I can share tips on balanced eating, portion sizes, and even recommend foods that support your fitness goals. You can also explore our Nutrition Tracker to log meals and monitor macros.",
            Self::Progress => "Tracking your progress keeps you motivated! 📊 In the Progress Tracker, you can see your workout history, milestones, and how far you’ve come — and I can give you encouragement along the way.",
            Self::Posture => "Proper form makes all the difference in preventing injuries! 🏋️‍♂️ Our Posture Detection feature can give you real-time feedback while you work out.",
            Self::Greeting => "Hey there! 👋 Excited to help you on your fitness journey today. What’s on your mind — workouts, nutrition, progress tracking, or something else?",
            Self::Fallback => "I’m your fitness companion 🤖💚 — ready to guide you with workouts, diet tips, progress tracking, and posture correction. Just let me know what you’d like to focus on!",
        }
    }
}

/// Topics checked in order; the first whose keyword appears wins.
const PRIORITY: [ReplyTopic; 5] = [
    ReplyTopic::Workout,
    ReplyTopic::Nutrition,
    ReplyTopic::Progress,
    ReplyTopic::Posture,
    ReplyTopic::Greeting,
];

/// Deterministic substring-based reply selector.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordMatcher;

impl KeywordMatcher {
    /// Pick the topic for `message`.
    ///
    /// Matching is case-insensitive plain substring containment, so "this"
    /// counts as containing "hi".
    pub fn classify(message: &str) -> ReplyTopic {
        let lower = message.to_lowercase();
        PRIORITY
            .into_iter()
            .find(|topic| topic.keywords().iter().any(|kw| lower.contains(kw)))
            .unwrap_or(ReplyTopic::Fallback)
    }

    /// Canned reply for `message`.
    pub fn reply(message: &str) -> &'static str {
        Self::classify(message).response()
    }
}

/// Reply selector backed by a hosted completion API.
///
/// Every failure collapses into [`REMOTE_FALLBACK`].
#[derive(Clone)]
pub struct RemoteCompletionProvider {
    api: Arc<dyn CompletionApi>,
    settings: CompletionSettings,
}

impl RemoteCompletionProvider {
    /// Create a provider over an injected transport.
    pub fn new(api: Arc<dyn CompletionApi>, settings: CompletionSettings) -> Self {
        Self { api, settings }
    }

    /// Model requested from the API.
    pub fn model(&self) -> &str {
        &self.settings.model
    }

    /// Ask the API for a reply to `prompt`.
    pub async fn resolve_reply(&self, prompt: &str) -> String {
        let request = CompletionRequest::single_turn(&self.settings, prompt);
        match self.api.complete(&request).await {
            Ok(text) => {
                debug!(model = %self.settings.model, chars = text.len(), "Remote reply received");
                text
            }
            Err(e) => {
                warn!(model = %self.settings.model, error = %e, "Completion request failed");
                REMOTE_FALLBACK.to_string()
            }
        }
    }
}

impl std::fmt::Debug for RemoteCompletionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteCompletionProvider")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Which provider variant to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Local keyword matcher.
    #[default]
    Keyword,
    /// Hosted completion API.
    Remote,
}

impl ProviderKind {
    /// Lowercase name used in config and CLI.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Remote => "remote",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyword" | "local" => Ok(Self::Keyword),
            "remote" | "openai" => Ok(Self::Remote),
            other => Err(format!(
                "unknown provider '{other}' (expected 'keyword' or 'remote')"
            )),
        }
    }
}

/// Reply provider selected at construction time.
#[derive(Debug, Clone)]
pub enum ReplyProvider {
    /// Keyword matcher answering after a fixed delay.
    Keyword { delay: Duration },
    /// Hosted completion API; latency is the network call.
    Remote(RemoteCompletionProvider),
}

impl ReplyProvider {
    /// Keyword provider with the default one-second delay.
    pub fn keyword() -> Self {
        Self::Keyword {
            delay: DEFAULT_REPLY_DELAY,
        }
    }

    /// Keyword provider with a custom delay.
    pub fn keyword_with_delay(delay: Duration) -> Self {
        Self::Keyword { delay }
    }

    /// Remote provider over `api`.
    pub fn remote(api: Arc<dyn CompletionApi>, settings: CompletionSettings) -> Self {
        Self::Remote(RemoteCompletionProvider::new(api, settings))
    }

    /// Which variant this is.
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::Keyword { .. } => ProviderKind::Keyword,
            Self::Remote(_) => ProviderKind::Remote,
        }
    }

    /// Short label for status display.
    pub fn label(&self) -> String {
        match self {
            Self::Keyword { .. } => "keyword".to_string(),
            Self::Remote(remote) => remote.model().to_string(),
        }
    }

    /// Produce a reply for `user_text`. Never fails.
    pub async fn resolve_reply(&self, user_text: &str) -> String {
        match self {
            Self::Keyword { delay } => {
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
                KeywordMatcher::reply(user_text).to_string()
            }
            Self::Remote(remote) => remote.resolve_reply(user_text).await,
        }
    }
}
