//! OpenAI-compatible API client for Moodscape generation features
//!
//! This crate provides a client for the text (chat completion) and image
//! generation endpoints used by the scenery pipeline.
//!
//! # Thread Safety
//!
//! `OpenAiClient` is `Clone + Send + Sync` and can be safely shared
//! across tasks. It uses a shared HTTP client connection pool.
//!
//! # Example
//!
//! ```no_run
//! use moodscape_openai_client::OpenAiClient;
//! use moodscape_shared_config::OpenAiConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OpenAiConfig::default();
//! let client = OpenAiClient::new(&config)?;
//!
//! let keywords = client.generate_text("Give me three music keywords").await?;
//! let image = client.generate_image("A quiet harbour at dawn").await?;
//! println!("{} / payload: {}", keywords, image.b64_json.is_some());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod models;

pub use client::OpenAiClient;
pub use error::{OpenAiError, OpenAiResult};
pub use models::{
    ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatRole,
    GeneratedImage, ImageGenerationRequest, ImageGenerationResponse,
};
