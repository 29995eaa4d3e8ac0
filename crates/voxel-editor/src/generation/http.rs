//! OpenAI-compatible chat-completion provider over blocking HTTP.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{GenerationProvider, GenerationRequest, build_prompt};
use crate::error::GenerationError;

/// Default endpoint when `VOXEL_LLM_ENDPOINT` is unset.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default model when `VOXEL_LLM_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Where and how to reach the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Chat-completions URL.
    pub endpoint: String,
    /// Model name sent with every request.
    pub model: String,
    /// Bearer token. Without one the provider is not configured.
    pub api_key: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(60),
        }
    }
}

impl GenerationConfig {
    /// Read `VOXEL_LLM_ENDPOINT`, `VOXEL_LLM_MODEL` and `VOXEL_LLM_API_KEY`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`Self::from_env`] over an arbitrary lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            endpoint: non_empty("VOXEL_LLM_ENDPOINT").unwrap_or(defaults.endpoint),
            model: non_empty("VOXEL_LLM_MODEL").unwrap_or(defaults.model),
            api_key: non_empty("VOXEL_LLM_API_KEY"),
            timeout: defaults.timeout,
        }
    }

    /// Whether a key is present.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Chat completion request (OpenAI-compatible)
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Provider backed by an OpenAI-compatible HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    config: GenerationConfig,
    client: reqwest::blocking::Client,
}

impl HttpProvider {
    /// Build the HTTP client.
    ///
    /// # Errors
    /// Returns [`GenerationError::Request`] if the client cannot be created.
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, client })
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &GenerationConfig {
        &self.config
    }
}

impl GenerationProvider for HttpProvider {
    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(GenerationError::NotConfigured);
        };
        let (system, user) = build_prompt(request);
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &system,
                },
                ChatMessage {
                    role: "user",
                    content: &user,
                },
            ],
            temperature: 0.7,
        };

        tracing::debug!(endpoint = %self.config.endpoint, model = %self.config.model, "sending generation request");
        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json()?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| GenerationError::MalformedResponse("no message content".to_string()))
    }
}
