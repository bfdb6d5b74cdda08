//! Text and image generation provider configuration

use crate::{get_env_or_default, parse_env, ConfigResult};

/// OpenAI-compatible generation provider configuration
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Provider base URL (without the `/v1` suffix)
    pub url: String,

    /// API key sent as a bearer token
    pub api_key: String,

    /// Model used for keyword and idiom generation
    pub text_model: String,

    /// Model used for image generation
    pub image_model: String,

    /// Requested image size (e.g., 1024x1024)
    pub image_size: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OpenAiConfig {
    /// Load provider configuration from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            url: get_env_or_default("OPENAI_BASE_URL", "https://api.openai.com"),
            api_key: get_env_or_default("OPENAI_API_KEY", ""),
            text_model: get_env_or_default("OPENAI_TEXT_MODEL", "gpt-4o-mini"),
            image_model: get_env_or_default("OPENAI_IMAGE_MODEL", "dall-e-3"),
            image_size: get_env_or_default("OPENAI_IMAGE_SIZE", "1024x1024"),
            timeout_secs: parse_env("OPENAI_TIMEOUT", 120)?,
        })
    }

    /// Create a configuration with a custom URL (useful for testing)
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Check whether an API key has been provided
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Get the full URL for the chat completions endpoint
    pub fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.url.trim_end_matches('/'))
    }

    /// Get the full URL for the image generation endpoint
    pub fn image_generations_url(&self) -> String {
        format!("{}/v1/images/generations", self.url.trim_end_matches('/'))
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            url: "https://api.openai.com".to_string(),
            api_key: String::new(),
            text_model: "gpt-4o-mini".to_string(),
            image_model: "dall-e-3".to_string(),
            image_size: "1024x1024".to_string(),
            timeout_secs: 120,
        }
    }
}
