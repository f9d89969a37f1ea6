use crate::config::Provider;
use crate::provider::ContentType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudyError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{provider} API error: {message}")]
    Provider {
        provider: Provider,
        status: Option<u16>,
        message: String,
    },

    #[error("Failed to parse {kind} response: {reason}")]
    Parse { kind: ContentType, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StudyError>;
