use serde::{Deserialize, Serialize};

use super::EnrichmentError;

/// Default chat-completions endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Model used for both enrichment calls.
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Token budget per enrichment call.
const MAX_COMPLETION_TOKENS: u32 = 1000;

/// Chat-completion client abstraction (allows mocking).
pub trait ChatClient {
    fn complete(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, EnrichmentError>;
}

/// HTTP client for an OpenAI-compatible chat-completions API.
pub struct OpenAiChatClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OpenAiChatClient {
    pub fn new(base_url: &str, api_key: &str, model: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        }
    }

    /// Default client against api.openai.com with the key from the
    /// environment; `None` when no key is configured.
    pub fn from_env() -> Option<Self> {
        let key = std::env::var(crate::config::OPENAI_API_KEY_ENV).ok()?;
        if key.is_empty() {
            return None;
        }
        Some(Self::new(DEFAULT_API_BASE, &key, DEFAULT_MODEL, 60))
    }
}

/// Request body for /chat/completions
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response body from /chat/completions
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl ChatClient for OpenAiChatClient {
    fn complete(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, EnrichmentError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature,
            max_tokens: MAX_COMPLETION_TOKENS,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    EnrichmentError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    EnrichmentError::HttpClient(format!(
                        "Request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    EnrichmentError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(EnrichmentError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| EnrichmentError::ResponseParsing(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| EnrichmentError::MalformedResponse("Empty choices array".into()))
    }
}

/// Mock chat client for testing — returns a configured response or failure.
pub struct MockChatClient {
    outcome: Result<String, String>,
}

impl MockChatClient {
    pub fn new(response: &str) -> Self {
        Self {
            outcome: Ok(response.to_string()),
        }
    }

    /// A client whose every call fails at the transport layer.
    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
        }
    }
}

impl ChatClient for MockChatClient {
    fn complete(
        &self,
        _system: &str,
        _prompt: &str,
        _temperature: f32,
    ) -> Result<String, EnrichmentError> {
        self.outcome.clone().map_err(EnrichmentError::HttpClient)
    }
}
