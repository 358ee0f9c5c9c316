//! Chat-completion API client.
//!
//! A thin pass-through to an OpenAI-compatible `/chat/completions` endpoint:
//! one request, one response, no retry, no streaming. The transport sits
//! behind [`CompletionApi`] so callers can substitute a fake.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Upper bound on generated tokens per reply.
pub const DEFAULT_MAX_TOKENS: u32 = 150;

/// Sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Role of a message sent to the completion API.
///
/// Requests are single turn, so only the user role is ever sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

/// A message in a completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<PromptMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    /// Build a single-turn request carrying `prompt` as the only user message.
    pub fn single_turn(settings: &CompletionSettings, prompt: impl Into<String>) -> Self {
        Self {
            model: settings.model.clone(),
            messages: vec![PromptMessage {
                role: Role::User,
                content: prompt.into(),
            }],
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        }
    }
}

/// Response body from `POST /chat/completions`.
///
/// Only the fields we read are modelled; everything else is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// One completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

/// The message inside a choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionResponse {
    /// Text of the first choice, trimmed.
    pub fn first_text(&self) -> Result<String, CompletionError> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(|content| content.trim().to_string())
            .ok_or(CompletionError::EmptyChoices)
    }
}

/// Connection and sampling settings for [`HttpCompletionClient`].
#[derive(Clone)]
pub struct CompletionSettings {
    /// Base URL, without the `/chat/completions` suffix.
    pub base_url: String,
    /// Bearer token. Not validated; a missing key fails at the API.
    pub api_key: Option<String>,
    /// Model identifier.
    pub model: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

// Keeps the key out of logs.
impl fmt::Debug for CompletionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Transport for completion requests.
#[async_trait]
pub trait CompletionApi: Send + Sync {
    /// Send `request` and return the trimmed text of the first choice.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

/// reqwest-backed [`CompletionApi`].
pub struct HttpCompletionClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpCompletionClient {
    /// Build a client from explicit settings.
    pub fn new(settings: &CompletionSettings) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(CompletionError::Http)?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", settings.base_url.trim_end_matches('/')),
            api_key: settings.api_key.clone(),
        })
    }

    /// Full URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionApi for HttpCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(CompletionError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(CompletionError::Http)?;
        let parsed: CompletionResponse =
            serde_json::from_slice(&bytes).map_err(CompletionError::Decode)?;
        parsed.first_text()
    }
}

/// Errors from the completion API.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// Transport failure (connect, timeout, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// Non-2xx response.
    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not the expected JSON.
    #[error("Decode error: {0}")]
    Decode(#[source] serde_json::Error),

    /// Response had no choice with text content.
    #[error("Response contained no completion text")]
    EmptyChoices,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// A captured HTTP request.
    struct Captured {
        head: String,
        body: String,
    }

    /// Serve exactly one request with a canned response, returning what was received.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<Captured>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];

            // Read headers
            let header_end = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "connection closed before headers");
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };

            let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
            let content_length = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);

            while buf.len() < header_end + content_length {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let request_body = String::from_utf8_lossy(&buf[header_end..]).to_string();

            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            Captured {
                head,
                body: request_body,
            }
        });

        (format!("http://{addr}/v1"), handle)
    }

    fn settings_for(base_url: String) -> CompletionSettings {
        CompletionSettings {
            base_url,
            api_key: Some("sk-test".into()),
            timeout: Duration::from_secs(5),
            ..CompletionSettings::default()
        }
    }

    #[test]
    fn test_single_turn_request_body() {
        let settings = CompletionSettings::default();
        let request = CompletionRequest::single_turn(&settings, "How do I squat?");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["max_tokens"], 150);
        assert!((json["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "How do I squat?");
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_first_text_trims() {
        let parsed: CompletionResponse = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"  Keep your back straight.\n"}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.first_text().unwrap(), "Keep your back straight.");
    }

    #[test]
    fn test_first_text_empty() {
        let parsed: CompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            parsed.first_text(),
            Err(CompletionError::EmptyChoices)
        ));

        let null_content: CompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(null_content.first_text().is_err());
    }

    #[test]
    fn test_settings_debug_redacts_key() {
        let settings = CompletionSettings {
            api_key: Some("sk-very-secret".into()),
            ..CompletionSettings::default()
        };
        let debug = format!("{settings:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let client = HttpCompletionClient::new(&settings_for("http://localhost:9/v1/".into()))
            .unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9/v1/chat/completions");
    }

    #[tokio::test]
    async fn test_http_client_success() {
        let (base_url, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"choices":[{"message":{"role":"assistant","content":"  Drink water.  "}}]}"#,
        )
        .await;

        let settings = settings_for(base_url);
        let client = HttpCompletionClient::new(&settings).unwrap();
        let request = CompletionRequest::single_turn(&settings, "hydration?");

        let text = client.complete(&request).await.unwrap();
        assert_eq!(text, "Drink water.");

        let captured = server.await.unwrap();
        assert!(captured.head.starts_with("POST /v1/chat/completions"));
        assert!(captured
            .head
            .to_ascii_lowercase()
            .contains("authorization: bearer sk-test"));

        let sent: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
        assert_eq!(sent["messages"][0]["content"], "hydration?");
        assert_eq!(sent["max_tokens"], 150);
    }

    #[tokio::test]
    async fn test_http_client_error_status() {
        let (base_url, server) = serve_once(
            "HTTP/1.1 401 Unauthorized",
            r#"{"error":{"message":"Incorrect API key provided"}}"#,
        )
        .await;

        let settings = settings_for(base_url);
        let client = HttpCompletionClient::new(&settings).unwrap();
        let request = CompletionRequest::single_turn(&settings, "hi");

        let err = client.complete(&request).await.unwrap_err();
        match err {
            CompletionError::Status { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("Incorrect API key"));
            }
            other => panic!("unexpected error: {other}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_http_client_malformed_body() {
        let (base_url, server) = serve_once("HTTP/1.1 200 OK", "not json").await;

        let settings = settings_for(base_url);
        let client = HttpCompletionClient::new(&settings).unwrap();
        let request = CompletionRequest::single_turn(&settings, "hi");

        let err = client.complete(&request).await.unwrap_err();
        assert!(matches!(err, CompletionError::Decode(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_http_client_connection_refused() {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let settings = settings_for(format!("http://{addr}/v1"));
        let client = HttpCompletionClient::new(&settings).unwrap();
        let request = CompletionRequest::single_turn(&settings, "hi");

        let err = client.complete(&request).await.unwrap_err();
        assert!(matches!(err, CompletionError::Http(_)));
    }
}
