//! Gemini text generation via the Generative AI API.

use crate::config::Provider;
use crate::error::{Result, StudyError};
use crate::provider::{ContentType, GenerationParams, ProviderClient};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Request timeout for generation calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: "gemini-2.0-flash".to_string(),
        }
    }

    /// Set a different model (e.g., "gemini-1.5-pro").
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
            provider: Provider::Gemini,
            status,
            message: message.into(),
        }
    }
}

#[async_trait]
impl ProviderClient for GeminiClient {
    async fn generate(&self, prompt: &str, content_type: ContentType) -> Result<String> {
        let params = GenerationParams::for_content(content_type);

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: params.temperature,
                max_output_tokens: params.max_output_tokens,
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self.client.post(&url).json(&request).send().await.map_err(|e| {
            if e.is_timeout() {
                self.provider_error(None, "timeout")
            } else {
                self.provider_error(None, format!("request failed: {}", e))
            }
        })?;

        let status = response.status();
        debug!("Gemini API response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|e| self.provider_error(Some(status.as_u16()), format!("read failed: {}", e)))?;

        if !status.is_success() {
            return Err(self.provider_error(
                Some(status.as_u16()),
                format!("generateContent returned {}: {}", status, body),
            ));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| self.provider_error(Some(status.as_u16()), format!("bad envelope: {}", e)))?;

        if let Some(error) = parsed.error {
            return Err(self.provider_error(Some(status.as_u16()), error.message));
        }

        let text = parsed
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .and_then(|p| p.into_iter().next())
            .and_then(|p| p.text)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(self.provider_error(Some(status.as_u16()), "empty response from model"));
        }

        Ok(text)
    }

    fn name(&self) -> &'static str {
        "Google Gemini"
    }
}

// Request/Response types

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize, Debug)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiError {
    message: String,
}
