//! Mock generation provider for testing text and image generation
//!
//! Provides a [`MockOpenAiServer`] that simulates the chat completion and
//! image generation endpoints of an OpenAI-compatible API.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Bytes returned as the image payload by [`MockOpenAiServer::mock_image_success`]
pub const TINY_PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

const CHAT_PATH: &str = "/v1/chat/completions";
const IMAGE_PATH: &str = "/v1/images/generations";

/// Mock generation provider
///
/// Wraps a [`wiremock::MockServer`] and provides convenience methods for
/// the responses the scenery pipeline needs.
///
/// # Example
///
/// ```rust,ignore
/// use moodscape_test_utils::MockOpenAiServer;
///
/// #[tokio::test]
/// async fn test_generation() {
///     let server = MockOpenAiServer::start().await;
///     server.mock_chat_containing("keywords", "ambient, piano").await;
///     server.mock_chat_containing("idioms", "one\ntwo\nthree").await;
///     server.mock_image_success().await;
/// }
/// ```
pub struct MockOpenAiServer {
    server: MockServer,
}

impl MockOpenAiServer {
    /// Start a new mock provider
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Get the server URL
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Get reference to the underlying mock server for custom mock setups
    pub fn inner(&self) -> &MockServer {
        &self.server
    }

    fn chat_body(content: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })
    }

    /// Answer chat completions whose request body contains `needle`
    pub async fn mock_chat_containing(&self, needle: &str, response_text: &str) {
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .and(body_string_contains(needle))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::chat_body(response_text)))
            .mount(&self.server)
            .await;
    }

    /// Answer every chat completion with the same text
    pub async fn mock_chat_success(&self, response_text: &str) {
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::chat_body(response_text)))
            .mount(&self.server)
            .await;
    }

    /// Fail every chat completion
    pub async fn mock_chat_failure(&self, status_code: u16, error_message: &str) {
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(ResponseTemplate::new(status_code).set_body_json(json!({
                "error": {"message": error_message, "type": "server_error"}
            })))
            .mount(&self.server)
            .await;
    }

    /// Return [`TINY_PNG`] as a base64 payload
    pub async fn mock_image_success(&self) {
        self.mock_image_payload(Some(BASE64.encode(TINY_PNG))).await;
    }

    /// Return a custom payload, or an image entry with no payload at all
    pub async fn mock_image_payload(&self, b64_json: Option<String>) {
        let entry = match b64_json {
            Some(payload) => json!({"b64_json": payload, "revised_prompt": "revised"}),
            None => json!({"revised_prompt": "revised"}),
        };

        Mock::given(method("POST"))
            .and(path(IMAGE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "created": 1_700_000_000,
                "data": [entry]
            })))
            .mount(&self.server)
            .await;
    }

    /// Fail image generation
    pub async fn mock_image_failure(&self, status_code: u16, error_message: &str) {
        Mock::given(method("POST"))
            .and(path(IMAGE_PATH))
            .respond_with(ResponseTemplate::new(status_code).set_body_json(json!({
                "error": {"message": error_message, "type": "invalid_request_error"}
            })))
            .mount(&self.server)
            .await;
    }

    /// Delay every response by `delay`
    pub async fn mock_slow_image(&self, delay: Duration) {
        Mock::given(method("POST"))
            .and(path(IMAGE_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(delay)
                    .set_body_json(json!({"data": [{"b64_json": BASE64.encode(TINY_PNG)}]})),
            )
            .mount(&self.server)
            .await;
    }

    /// Number of requests received by the image endpoint
    pub async fn image_calls(&self) -> usize {
        self.count(IMAGE_PATH).await
    }

    /// Number of requests received by the chat endpoint
    pub async fn chat_calls(&self) -> usize {
        self.count(CHAT_PATH).await
    }

    async fn count(&self, request_path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == request_path)
            .count()
    }
}
