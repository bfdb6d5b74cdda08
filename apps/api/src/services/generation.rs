//! Text and image generation seam

use async_trait::async_trait;
use moodscape_openai_client::{OpenAiClient, OpenAiError};

/// Generates the three artifacts of a scenery run
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Complete a single text prompt
    async fn generate_text(&self, prompt: &str) -> Result<String, OpenAiError>;

    /// Generate one image; `None` when the provider returned no base64 payload
    async fn generate_image(&self, prompt: &str) -> Result<Option<String>, OpenAiError>;
}

#[async_trait]
impl GenerationClient for OpenAiClient {
    async fn generate_text(&self, prompt: &str) -> Result<String, OpenAiError> {
        OpenAiClient::generate_text(self, prompt).await
    }

    async fn generate_image(&self, prompt: &str) -> Result<Option<String>, OpenAiError> {
        let image = OpenAiClient::generate_image(self, prompt).await?;
        Ok(image.b64_json.filter(|payload| !payload.is_empty()))
    }
}
