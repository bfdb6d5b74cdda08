//! Request and response types for the OpenAI-compatible API

use serde::{Deserialize, Serialize};

/// Chat message role
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: ChatRole,
    /// Content of the message
    #[serde(default)]
    pub content: String,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Request for a chat completion
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    /// Model to use
    pub model: String,
    /// Conversation messages
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Response from a chat completion (non-streaming)
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Completion choices (we only request one)
    pub choices: Vec<ChatChoice>,
    /// Model that served the request
    #[serde(default)]
    pub model: Option<String>,
}

/// One completion choice
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// The generated message
    pub message: ChatMessage,
    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Request for image generation
#[derive(Debug, Clone, Serialize)]
pub struct ImageGenerationRequest {
    /// Model to use
    pub model: String,
    /// Image prompt
    pub prompt: String,
    /// Number of images
    pub n: u32,
    /// Image size, e.g. 1024x1024
    pub size: String,
    /// Always `b64_json`, the caller uploads the bytes itself
    pub response_format: String,
}

/// Response from image generation
#[derive(Debug, Clone, Deserialize)]
pub struct ImageGenerationResponse {
    /// Generated images
    pub data: Vec<GeneratedImage>,
}

/// One generated image
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratedImage {
    /// Base64-encoded image payload
    #[serde(default)]
    pub b64_json: Option<String>,
    /// Hosted URL (only when `response_format = url`)
    #[serde(default)]
    pub url: Option<String>,
    /// Prompt after provider-side rewriting
    #[serde(default)]
    pub revised_prompt: Option<String>,
}

/// Error envelope returned by the provider
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}
