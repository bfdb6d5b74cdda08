//! Core generation HTTP client with connection pooling

use std::time::Duration;

use moodscape_shared_config::OpenAiConfig;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{OpenAiError, OpenAiResult};
use crate::models::{
    ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, GeneratedImage,
    ImageGenerationRequest, ImageGenerationResponse,
};

/// Maximum error body size to prevent memory exhaustion
const MAX_ERROR_BODY_SIZE: usize = 1000;

/// Client for the text and image generation provider
#[derive(Clone)]
pub struct OpenAiClient {
    /// HTTP client with connection pool
    http_client: Client,
    /// Configuration
    config: OpenAiConfig,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("url", &self.config.url)
            .field("api_key", &"[REDACTED]")
            .field("text_model", &self.config.text_model)
            .field("image_model", &self.config.image_model)
            .finish()
    }
}

impl OpenAiClient {
    /// Create a new client from configuration
    pub fn new(config: &OpenAiConfig) -> OpenAiResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(OpenAiError::HttpError)?;

        Ok(Self {
            http_client,
            config: config.clone(),
        })
    }

    /// Truncate error body to prevent memory exhaustion
    /// Safely handles UTF-8 boundaries to avoid panics on multi-byte characters
    fn truncate_error_body(body: String) -> String {
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

    /// POST a JSON body and decode a JSON response, mapping provider errors
    async fn post_json<Req, Resp>(&self, url: String, body: &Req, model: &str) -> OpenAiResult<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let mut request = self.http_client.post(&url).json(body);
        if !self.config.api_key.is_empty() {
            request = request.bearer_auth(&self.config.api_key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_connect() {
                OpenAiError::ConnectionRefused(self.config.url.clone())
            } else if e.is_timeout() {
                OpenAiError::Timeout(self.config.timeout_secs)
            } else {
                OpenAiError::HttpError(e)
            }
        })?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response, model).await);
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Turn a non-success response into the matching error variant
    async fn error_from_response(response: Response, model: &str) -> OpenAiError {
        let status = response.status();
        let body = Self::truncate_error_body(response.text().await.unwrap_or_default());

        match status {
            StatusCode::UNAUTHORIZED => return OpenAiError::Unauthorized,
            StatusCode::TOO_MANY_REQUESTS => return OpenAiError::RateLimited,
            _ => {}
        }

        let parsed = serde_json::from_str::<ApiErrorResponse>(&body).ok();
        if parsed
            .as_ref()
            .and_then(|p| p.error.code.as_deref())
            .is_some_and(|code| code == "model_not_found")
        {
            return OpenAiError::ModelNotFound(model.to_string());
        }

        OpenAiError::ApiError {
            status: status.as_u16(),
            message: parsed.map(|p| p.error.message).unwrap_or(body),
        }
    }

    /// Generate text for a single user prompt using the configured text model
    #[instrument(skip(self, prompt), fields(model = %self.config.text_model, prompt_len = prompt.len()))]
    pub async fn generate_text(&self, prompt: &str) -> OpenAiResult<String> {
        self.chat(vec![ChatMessage::user(prompt)]).await
    }

    /// Run a chat completion and return the first choice's content
    pub async fn chat(&self, messages: Vec<ChatMessage>) -> OpenAiResult<String> {
        let request = ChatCompletionRequest {
            model: self.config.text_model.clone(),
            messages,
            temperature: None,
            max_tokens: None,
        };

        let response: ChatCompletionResponse = self
            .post_json(
                self.config.chat_completions_url(),
                &request,
                &self.config.text_model,
            )
            .await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| OpenAiError::InvalidResponse("no choices returned".to_string()))?;

        debug!(response_len = content.len(), "Text generated");

        Ok(content)
    }

    /// Generate one image for a prompt, requesting a base64 payload
    ///
    /// The returned image may have no payload; callers decide whether
    /// that is fatal.
    #[instrument(skip(self, prompt), fields(model = %self.config.image_model, prompt_len = prompt.len()))]
    pub async fn generate_image(&self, prompt: &str) -> OpenAiResult<GeneratedImage> {
        let request = ImageGenerationRequest {
            model: self.config.image_model.clone(),
            prompt: prompt.to_string(),
            n: 1,
            size: self.config.image_size.clone(),
            response_format: "b64_json".to_string(),
        };

        let response: ImageGenerationResponse = self
            .post_json(
                self.config.image_generations_url(),
                &request,
                &self.config.image_model,
            )
            .await?;

        let image = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| OpenAiError::InvalidResponse("no images returned".to_string()))?;

        debug!(
            has_payload = image.b64_json.is_some(),
            payload_len = image.b64_json.as_ref().map(|b| b.len()).unwrap_or(0),
            "Image generated"
        );

        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server_url: &str) -> OpenAiConfig {
        OpenAiConfig {
            url: server_url.to_string(),
            api_key: "sk-test".to_string(),
            text_model: "test-text".to_string(),
            image_model: "test-image".to_string(),
            image_size: "256x256".to_string(),
            timeout_secs: 30,
        }
    }

    #[test]
    fn test_client_creation() {
        let config = OpenAiConfig::default();
        assert!(OpenAiClient::new(&config).is_ok());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let client = OpenAiClient::new(&test_config("http://localhost")).unwrap();
        let debug_str = format!("{:?}", client);
        assert!(!debug_str.contains("sk-test"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_truncate_error_body() {
        let short = "short error".to_string();
        assert_eq!(OpenAiClient::truncate_error_body(short.clone()), short);

        let long = "x".repeat(2000);
        let truncated = OpenAiClient::truncate_error_body(long);
        assert!(truncated.len() < 1100);
        assert!(truncated.ends_with("... (truncated)"));
    }

    #[test]
    fn test_truncate_error_body_utf8_boundary() {
        let utf8_str = "日".repeat(500);
        let truncated = OpenAiClient::truncate_error_body(utf8_str);
        assert!(truncated.ends_with("... (truncated)"));
        let _ = truncated.chars().count();
    }

    #[tokio::test]
    async fn test_generate_text_returns_first_choice() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({"model": "test-text"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "test-text",
                "choices": [
                    {"index": 0, "message": {"role": "assistant", "content": "ambient, piano, slow"}, "finish_reason": "stop"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiClient::new(&test_config(&server.uri())).unwrap();
        let text = client.generate_text("keywords please").await.unwrap();
        assert_eq!(text, "ambient, piano, slow");
    }

    #[tokio::test]
    async fn test_generate_text_without_choices() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client = OpenAiClient::new(&test_config(&server.uri())).unwrap();
        let result = client.generate_text("hi").await;
        assert!(matches!(result, Err(OpenAiError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_generate_image_requests_base64() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .and(body_partial_json(json!({
                "model": "test-image",
                "size": "256x256",
                "response_format": "b64_json"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "created": 1,
                "data": [{"b64_json": "aGVsbG8="}]
            })))
            .mount(&server)
            .await;

        let client = OpenAiClient::new(&test_config(&server.uri())).unwrap();
        let image = client.generate_image("a calm lake").await.unwrap();
        assert_eq!(image.b64_json.as_deref(), Some("aGVsbG8="));
    }

    #[tokio::test]
    async fn test_model_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"message": "The model does not exist", "code": "model_not_found"}
            })))
            .mount(&server)
            .await;

        let client = OpenAiClient::new(&test_config(&server.uri())).unwrap();
        match client.generate_image("x").await {
            Err(OpenAiError::ModelNotFound(model)) => assert_eq!(model, "test-image"),
            other => panic!("Expected ModelNotFound, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_maps_to_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let client = OpenAiClient::new(&test_config(&server.uri())).unwrap();
        match client.generate_text("x").await {
            Err(OpenAiError::ApiError { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("Expected ApiError, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unauthorized_and_rate_limited() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = OpenAiClient::new(&test_config(&server.uri())).unwrap();
        assert!(matches!(
            client.generate_text("x").await,
            Err(OpenAiError::Unauthorized)
        ));
        assert!(matches!(
            client.generate_image("x").await,
            Err(OpenAiError::RateLimited)
        ));
    }
}
