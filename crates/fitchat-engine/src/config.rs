//! Configuration for fitchat.
//!
//! Everything is read once from the process environment at startup and then
//! passed around explicitly. Nothing is persisted.

use crate::completion::{
    CompletionSettings, HttpCompletionClient, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS,
};
use crate::provider::{ProviderKind, ReplyProvider, DEFAULT_REPLY_DELAY};
use crate::CompletionError;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Selects the reply provider.
pub const ENV_PROVIDER: &str = "FITCHAT_PROVIDER";
/// Bearer token for the completion API.
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
/// Completion API base URL.
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
/// Model identifier.
pub const ENV_MODEL: &str = "FITCHAT_MODEL";
/// Keyword provider delay in milliseconds.
pub const ENV_REPLY_DELAY_MS: &str = "FITCHAT_REPLY_DELAY_MS";
/// Remote request timeout in seconds.
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "FITCHAT_REQUEST_TIMEOUT_SECS";

/// Main configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Which reply provider to build.
    pub provider: ProviderKind,

    /// Completion API base URL.
    pub base_url: String,

    /// Model identifier.
    pub model: String,

    /// API key. Never serialized; see [`Config::api_key_set`].
    #[serde(skip)]
    pub api_key: Option<String>,

    /// Artificial delay before keyword replies, in milliseconds.
    pub reply_delay_ms: u64,

    /// Remote request timeout, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Keyword,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            reply_delay_ms: u64::try_from(DEFAULT_REPLY_DELAY.as_millis()).unwrap_or(1000),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unset and empty variables fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get(ENV_PROVIDER) {
            config.provider = value
                .parse()
                .map_err(|_| ConfigError::InvalidProvider(value.clone()))?;
        }
        if let Some(value) = get(ENV_BASE_URL) {
            config.base_url = value;
        }
        if let Some(value) = get(ENV_MODEL) {
            config.model = value;
        }
        // The key is passed through untouched; an invalid one fails at the API.
        config.api_key = lookup(ENV_API_KEY);

        if let Some(value) = get(ENV_REPLY_DELAY_MS) {
            config.reply_delay_ms = parse_number(ENV_REPLY_DELAY_MS, &value)?;
        }
        if let Some(value) = get(ENV_REQUEST_TIMEOUT_SECS) {
            config.request_timeout_secs = parse_number(ENV_REQUEST_TIMEOUT_SECS, &value)?;
        }

        Ok(config)
    }

    /// Whether an API key was supplied.
    #[must_use]
    pub fn api_key_set(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Keyword reply delay.
    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }

    /// Settings for the completion client.
    pub fn completion_settings(&self) -> CompletionSettings {
        CompletionSettings {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    /// Build the configured reply provider.
    pub fn build_provider(&self) -> Result<ReplyProvider, CompletionError> {
        match self.provider {
            ProviderKind::Keyword => Ok(ReplyProvider::keyword_with_delay(self.reply_delay())),
            ProviderKind::Remote => {
                let settings = self.completion_settings();
                let client = HttpCompletionClient::new(&settings)?;
                Ok(ReplyProvider::remote(Arc::new(client), settings))
            }
        }
    }
}

fn parse_number(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        })
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Unknown provider name.
    #[error("Invalid FITCHAT_PROVIDER value '{0}' (expected 'keyword' or 'remote')")]
    InvalidProvider(String),

    /// A numeric variable did not parse.
    #[error("Invalid {var} value '{value}' (expected a non-negative integer)")]
    InvalidNumber { var: &'static str, value: String },
}
