//! Error types for the companion core

use thiserror::Error;

/// Result type alias for companion operations
pub type CompanionResult<T> = Result<T, CompanionError>;

/// Errors that can occur in the conversation/playback cycle
#[derive(Error, Debug)]
pub enum CompanionError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Conversation request failed: {0}")]
    Request(String),

    #[error("Conversation API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Response parse error: {0}")]
    Parse(String),

    #[error("Audio fetch error: {0}")]
    AudioFetch(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for CompanionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CompanionError::Parse(err.to_string())
        } else {
            CompanionError::Request(err.to_string())
        }
    }
}
