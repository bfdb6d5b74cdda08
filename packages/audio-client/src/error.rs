//! Music generation API error types

use thiserror::Error;

/// Errors raised by the music generation clients
#[derive(Error, Debug)]
pub enum AudioClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("Failed to parse music provider response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Provider returned a non-success status
    #[error("Music provider error {status}: {message}")]
    Api { status: u16, message: String },

    /// Provider accepted the request but returned no clip
    #[error("Music provider returned no clips")]
    EmptyResponse,

    /// Provider could not be reached
    #[error("Music provider unreachable at {0}")]
    ConnectionRefused(String),

    /// Request timeout
    #[error("Request to music provider timed out after {0}s")]
    Timeout(u64),

    /// Stream ended with no audio bytes
    #[error("Audio stream was empty")]
    EmptyStream,
}

impl AudioClientError {
    /// Map a reqwest send error to the most specific variant
    pub(crate) fn from_send(e: reqwest::Error, url: &str, timeout_secs: u64) -> Self {
        if e.is_connect() {
            AudioClientError::ConnectionRefused(url.to_string())
        } else if e.is_timeout() {
            AudioClientError::Timeout(timeout_secs)
        } else {
            AudioClientError::Http(e)
        }
    }
}

/// Result type for music provider operations
pub type AudioClientResult<T> = Result<T, AudioClientError>;

/// Maximum error body size to prevent memory exhaustion
const MAX_ERROR_BODY_SIZE: usize = 1000;

/// Truncate error body on a UTF-8 boundary
pub(crate) fn truncate_error_body(body: String) -> String {
    if body.len() <= MAX_ERROR_BODY_SIZE {
        return body;
    }

    let truncate_at = body
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|i| *i <= MAX_ERROR_BODY_SIZE)
        .last()
        .unwrap_or(0);

    format!("{}... (truncated)", &body[..truncate_at])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keeps_short_bodies() {
        assert_eq!(truncate_error_body("nope".to_string()), "nope");
    }

    #[test]
    fn test_truncate_multibyte() {
        let body = "é".repeat(800);
        let truncated = truncate_error_body(body);
        assert!(truncated.ends_with("... (truncated)"));
        assert!(truncated.len() < 1100);
    }
}
