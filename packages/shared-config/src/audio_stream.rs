//! Streaming audio provider configuration

use crate::{get_required_env, parse_env, ConfigError, ConfigResult};

/// Configuration for a provider that returns generated audio as a byte stream
#[derive(Debug, Clone)]
pub struct AudioStreamConfig {
    /// Full URL of the generation endpoint
    pub url: String,

    /// API key sent with each request
    pub api_key: String,

    /// Requested track length in seconds
    pub duration_secs: u32,

    /// Request timeout in seconds (covers the whole streamed body)
    pub timeout_secs: u64,
}

impl AudioStreamConfig {
    /// Load configuration from environment variables
    ///
    /// Returns an error if the endpoint or key is not set, so callers can
    /// use `.ok()` when the streaming backend is optional.
    pub fn from_env() -> ConfigResult<Self> {
        let url = get_required_env("AUDIO_STREAM_URL")?;
        let api_key = get_required_env("AUDIO_STREAM_API_KEY")?;

        if url.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "AUDIO_STREAM_URL".to_string(),
                "URL cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            url,
            api_key,
            duration_secs: parse_env("AUDIO_STREAM_DURATION", 30)?,
            timeout_secs: parse_env("AUDIO_STREAM_TIMEOUT", 120)?,
        })
    }

    /// Create a configuration with custom URL and key (useful for testing)
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            duration_secs: 30,
            timeout_secs: 120,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config() {
        let config = AudioStreamConfig::new("http://audio:9000/v1/music", "key");
        assert_eq!(config.url, "http://audio:9000/v1/music");
        assert_eq!(config.duration_secs, 30);
    }

    #[test]
    fn test_from_env_requires_url() {
        temp_env::with_vars(
            [
                ("AUDIO_STREAM_URL", None::<&str>),
                ("AUDIO_STREAM_API_KEY", Some("key")),
            ],
            || {
                assert!(matches!(
                    AudioStreamConfig::from_env(),
                    Err(ConfigError::MissingEnvVar(_))
                ));
            },
        );
    }
}
