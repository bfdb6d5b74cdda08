//! Error types for the generation client

use thiserror::Error;

/// Errors that can occur when calling the generation provider
#[derive(Error, Debug)]
pub enum OpenAiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Failed to serialize/deserialize JSON
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Provider returned a non-success status
    #[error("generation API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Requested model does not exist or is not available to this key
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// API key rejected
    #[error("generation API rejected the API key")]
    Unauthorized,

    /// Rate limited by the provider
    #[error("rate limited by generation API")]
    RateLimited,

    /// Request timeout
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Provider unreachable
    #[error("connection refused, is the generation API reachable at {0}?")]
    ConnectionRefused(String),

    /// Response was well-formed JSON but missing the expected content
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type for generation client operations
pub type OpenAiResult<T> = Result<T, OpenAiError>;
