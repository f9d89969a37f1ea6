use crate::error::{Result, StudyError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Gemini,
    OpenAi,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Gemini => write!(f, "gemini"),
            Provider::OpenAi => write!(f, "openai"),
        }
    }
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Provider::Gemini),
            "openai" => Ok(Provider::OpenAi),
            _ => Err(format!("Unknown provider: {}. Use 'gemini' or 'openai'", s)),
        }
    }
}

/// Structural style for generated notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotesFormat {
    Bullet,
    #[default]
    Outline,
    Detailed,
}

impl std::fmt::Display for NotesFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotesFormat::Bullet => write!(f, "bullet"),
            NotesFormat::Outline => write!(f, "outline"),
            NotesFormat::Detailed => write!(f, "detailed"),
        }
    }
}

impl std::str::FromStr for NotesFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bullet" => Ok(NotesFormat::Bullet),
            "outline" => Ok(NotesFormat::Outline),
            "detailed" => Ok(NotesFormat::Detailed),
            _ => Err(format!(
                "Unknown notes format: {}. Use 'bullet', 'outline', or 'detailed'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub default_provider: Provider,
    /// Preferred caption languages, tried in order.
    pub transcript_languages: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            openai_api_key: None,
            default_provider: Provider::default(),
            transcript_languages: vec!["en".to_string(), "en-US".to_string()],
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                if let Ok(file_config) = toml::from_str::<Config>(&contents) {
                    config = file_config;
                }
            }
        }

        // Override with environment variables
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            config.gemini_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.openai_api_key = Some(key);
        }
        if let Ok(provider) = std::env::var("VIDSTUDY_DEFAULT_PROVIDER") {
            if let Ok(p) = provider.parse() {
                config.default_provider = p;
            }
        }

        Ok(config)
    }

    /// The credential configured for a provider, if any.
    pub fn api_key_for(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Gemini => self.gemini_api_key.as_deref(),
            Provider::OpenAi => self.openai_api_key.as_deref(),
        }
    }

    pub fn validate(&self, provider: Provider) -> Result<()> {
        match provider {
            Provider::Gemini => {
                if self.gemini_api_key.is_none() {
                    return Err(StudyError::Config(
                        "GEMINI_API_KEY not set. Get one at https://aistudio.google.com/apikey"
                            .to_string(),
                    ));
                }
            }
            Provider::OpenAi => {
                if self.openai_api_key.is_none() {
                    return Err(StudyError::Config(
                        "OPENAI_API_KEY not set. Export it with: export OPENAI_API_KEY=sk-..."
                            .to_string(),
                    ));
                }
            }
        }

        Ok(())
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("vidstudy").join("config.toml"))
    }
}
