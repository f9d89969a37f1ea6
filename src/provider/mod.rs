pub mod gemini;
pub mod openai;

pub use gemini::GeminiClient;
pub use openai::OpenAiClient;

use crate::config::{Config, Provider};
use crate::error::{Result, StudyError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Which study aid is being generated. Determines the prompt shape, the
/// parser used, and the generation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Summary,
    Quiz,
    Notes,
    Tutor,
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::Summary => write!(f, "summary"),
            ContentType::Quiz => write!(f, "quiz"),
            ContentType::Notes => write!(f, "notes"),
            ContentType::Tutor => write!(f, "tutor"),
        }
    }
}

/// Sampling parameters applied per content type. These are internal
/// defaults, not caller-supplied: output-format compliance depends on them.
#[derive(Debug, Clone, Copy)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl GenerationParams {
    pub fn for_content(content_type: ContentType) -> Self {
        match content_type {
            ContentType::Summary => Self {
                temperature: 0.3,
                max_output_tokens: 1024,
            },
            ContentType::Quiz => Self {
                temperature: 0.7,
                max_output_tokens: 2048,
            },
            ContentType::Notes => Self {
                temperature: 0.3,
                max_output_tokens: 4096,
            },
            ContentType::Tutor => Self {
                temperature: 0.5,
                max_output_tokens: 1024,
            },
        }
    }
}

/// Common contract over LLM backends: a prompt in, raw model text out.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    async fn generate(&self, prompt: &str, content_type: ContentType) -> Result<String>;
    fn name(&self) -> &'static str;
}

/// Build the client for a provider. Fails fast with a configuration error
/// when the credential is missing, before any network call.
pub fn create_provider(provider: Provider, config: &Config) -> Result<Box<dyn ProviderClient>> {
    let api_key = config.api_key_for(provider).ok_or_else(|| {
        StudyError::Config(format!("No API key configured for provider '{}'", provider))
    })?;

    match provider {
        Provider::Gemini => Ok(Box::new(GeminiClient::new(api_key.to_string()))),
        Provider::OpenAi => Ok(Box::new(OpenAiClient::new(api_key.to_string()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_vary_by_content_type() {
        let summary = GenerationParams::for_content(ContentType::Summary);
        let quiz = GenerationParams::for_content(ContentType::Quiz);

        // Quiz generation runs hotter than summary by design
        assert!(quiz.temperature > summary.temperature);
        assert!(quiz.max_output_tokens >= summary.max_output_tokens);
    }

    #[test]
    fn test_create_provider_missing_key() {
        let config = Config::default();
        let result = create_provider(Provider::Gemini, &config);
        assert!(matches!(result, Err(StudyError::Config(_))));
    }

    #[test]
    fn test_create_provider_with_key() {
        let mut config = Config::default();
        config.gemini_api_key = Some("test-key".to_string());

        let client = create_provider(Provider::Gemini, &config).unwrap();
        assert_eq!(client.name(), "Google Gemini");
    }

    #[test]
    fn test_content_type_display() {
        assert_eq!(ContentType::Summary.to_string(), "summary");
        assert_eq!(ContentType::Tutor.to_string(), "tutor");
    }
}
