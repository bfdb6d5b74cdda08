//! Async music generation provider configuration

use crate::{get_env_or_default, parse_env, ConfigError, ConfigResult};

/// Suno-compatible music generation API configuration
#[derive(Debug, Clone)]
pub struct SunoConfig {
    /// API base URL
    pub url: String,

    /// Optional API key (self-hosted proxies usually run without one)
    pub api_key: Option<String>,

    /// Pinned model version sent with every generation request
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl SunoConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        let url = get_env_or_default("SUNO_API_URL", "http://localhost:3000");
        if url.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "SUNO_API_URL".to_string(),
                "URL cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            url,
            api_key: std::env::var("SUNO_API_KEY").ok().filter(|s| !s.is_empty()),
            model: get_env_or_default("SUNO_MODEL", "chirp-v3-5"),
            timeout_secs: parse_env("SUNO_TIMEOUT", 60)?,
        })
    }

    /// Create a configuration with a custom URL (useful for testing)
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        let base = self.url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/api/{}", base, path)
    }
}

impl Default for SunoConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:3000".to_string(),
            api_key: None,
            model: "chirp-v3-5".to_string(),
            timeout_secs: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SunoConfig::default();
        assert_eq!(config.model, "chirp-v3-5");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_api_url() {
        let config = SunoConfig::with_url("http://suno:3000");
        assert_eq!(config.api_url("generate"), "http://suno:3000/api/generate");
        assert_eq!(config.api_url("/get"), "http://suno:3000/api/get");
    }

    #[test]
    fn test_api_url_with_trailing_slash() {
        let config = SunoConfig::with_url("http://suno:3000/");
        assert_eq!(config.api_url("get_limit"), "http://suno:3000/api/get_limit");
    }

    #[test]
    fn test_empty_api_key_is_none() {
        temp_env::with_vars(
            [("SUNO_API_URL", Some("http://suno:3000")), ("SUNO_API_KEY", Some(""))],
            || {
                let config = SunoConfig::from_env().unwrap();
                assert!(config.api_key.is_none());
            },
        );
    }
}
