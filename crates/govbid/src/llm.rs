//! OpenAI-compatible chat completion client used for brief generation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::LlmConfig;

/// Single-turn text completion.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError>;
}

const DEFAULT_TEMPERATURE: f32 = 0.3;
const DEFAULT_MAX_TOKENS: u32 = 4_000;

#[derive(Debug, Clone)]
pub struct ChatCompletionClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl ChatCompletionClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| LlmError::Config("OPENAI_API_KEY not set".to_string()))?;
        Self::with_config(
            api_key,
            config.base_url.clone(),
            config.model.clone(),
            config.timeout,
        )
    }

    pub fn with_config(
        api_key: &str,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let auth_value = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| LlmError::Config("invalid API key format".to_string()))?;
        headers.insert(AUTHORIZATION, auth_value);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|error| LlmError::Config(format!("failed to build HTTP client: {error}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Serialize)]
struct ChatApiRequest<'a> {
    model: &'a str,
    messages: [ApiMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatApiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: Option<String>,
}

#[async_trait]
impl TextGenerator for ChatCompletionClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let request = ChatApiRequest {
            model: &self.model,
            messages: [
                ApiMessage {
                    role: "system",
                    content: system,
                },
                ApiMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        };

        let response = self.client.post(self.chat_url()).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let parsed: Option<ChatApiResponse> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let message = parsed
                .and_then(|payload| payload.error)
                .and_then(|error| error.message)
                .unwrap_or_else(|| body.chars().take(200).collect());
            warn!(status = status.as_u16(), model = %self.model, "chat completion rejected");
            return Err(LlmError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let payload = parsed.ok_or_else(|| LlmError::Provider {
            status: status.as_u16(),
            message: "response body was not valid JSON".to_string(),
        })?;

        if let Some(error) = payload.error {
            return Err(LlmError::Provider {
                status: status.as_u16(),
                message: error
                    .message
                    .unwrap_or_else(|| "unknown provider error".to_string()),
            });
        }

        let content = payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        debug!(model = %self.model, chars = content.len(), "chat completion received");
        Ok(content)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("LLM client misconfigured: {0}")]
    Config(String),
    #[error("LLM request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("LLM provider returned {status}: {message}")]
    Provider { status: u16, message: String },
    #[error("LLM response contained no content")]
    EmptyResponse,
}
