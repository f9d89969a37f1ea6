//! OpenAI text generation via the chat completions API.

use crate::config::Provider;
use crate::error::{Result, StudyError};
use crate::provider::{ContentType, GenerationParams, ProviderClient};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Request timeout for generation calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }

    /// Set a different model (e.g., "gpt-4o").
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the endpoint, for tests against a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn provider_error(&self, status: Option<u16>, message: impl Into<String>) -> StudyError {
        StudyError::Provider {
            provider: Provider::OpenAi,
            status,
            message: message.into(),
        }
    }
}

#[async_trait]
impl ProviderClient for OpenAiClient {
    async fn generate(&self, prompt: &str, content_type: ContentType) -> Result<String> {
        let params = GenerationParams::for_content(content_type);

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: params.temperature,
            max_tokens: params.max_output_tokens,
        };

        let url = format!("{}/v1/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    self.provider_error(None, "timeout")
                } else {
                    self.provider_error(None, format!("request failed: {}", e))
                }
            })?;

        let status = response.status();
        debug!("OpenAI API response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|e| self.provider_error(Some(status.as_u16()), format!("read failed: {}", e)))?;

        if !status.is_success() {
            // Try to surface the structured API error
            if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                return Err(self.provider_error(
                    Some(status.as_u16()),
                    format!("{} ({})", api_error.error.message, api_error.error.r#type),
                ));
            }
            return Err(self.provider_error(
                Some(status.as_u16()),
                format!("chat completion returned {}: {}", status, body),
            ));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| self.provider_error(Some(status.as_u16()), format!("bad envelope: {}", e)))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .map(|m| m.content)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(self.provider_error(Some(status.as_u16()), "empty response from model"));
        }

        Ok(text)
    }

    fn name(&self) -> &'static str {
        "OpenAI"
    }
}

// Request/Response types

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    content: String,
}

#[derive(Deserialize, Debug)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Deserialize, Debug)]
struct ApiErrorDetail {
    message: String,
    r#type: String,
}
