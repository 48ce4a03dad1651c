//! SDK Error Types

use thiserror::Error;

/// SDK Result type
pub type Result<T> = std::result::Result<T, SdkError>;

/// SDK Error
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Transport error: {0}")]
    Transport(String),

    /// 429: the phase queue is full, retry later
    #[error("Queue saturated: {0}")]
    Saturated(String),

    /// 400: the gateway refused the request as malformed
    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("HTTP error ({status}): {message}")]
    Http { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SdkError {
    /// Whether resubmitting the same request later may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, SdkError::Saturated(_) | SdkError::Transport(_))
    }
}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            SdkError::InvalidUrl(e.to_string())
        } else {
            SdkError::Transport(e.to_string())
        }
    }
}
