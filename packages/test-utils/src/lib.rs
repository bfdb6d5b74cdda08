//! Shared test utilities for Moodscape workspace
//!
//! This crate provides mock implementations of the external HTTP services
//! the scenery pipeline talks to, so client and API tests run without
//! network dependencies.
//!
//! # Mock Services
//!
//! - [`MockOpenAiServer`] - Mock text and image generation provider
//! - [`MockSunoServer`] - Mock async music job API with scripted status sequences
//! - [`MockStorageServer`] - Mock Supabase Storage that records uploads
//!
//! # Example
//!
//! ```rust,ignore
//! use moodscape_test_utils::{MockOpenAiServer, MockStorageServer};
//!
//! #[tokio::test]
//! async fn test_with_mocks() {
//!     let openai = MockOpenAiServer::start().await;
//!     openai.mock_image_success().await;
//!
//!     // Use openai.url() to configure your client
//! }
//! ```

mod openai;
mod storage;
mod suno;

pub use openai::{MockOpenAiServer, TINY_PNG};
pub use storage::MockStorageServer;
pub use suno::MockSunoServer;
