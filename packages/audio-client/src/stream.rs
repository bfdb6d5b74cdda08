//! Streaming audio provider client
//!
//! One request returns the generated track as a raw byte stream.

use std::fmt;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use moodscape_shared_config::AudioStreamConfig;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::error::{truncate_error_body, AudioClientError, AudioClientResult};
use crate::models::StreamGenerateRequest;

/// Client for a provider that streams generated audio back directly
#[derive(Clone)]
pub struct StreamingAudioClient {
    http_client: Client,
    config: AudioStreamConfig,
}

impl fmt::Debug for StreamingAudioClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingAudioClient")
            .field("url", &self.config.url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl StreamingAudioClient {
    pub fn new(config: &AudioStreamConfig) -> AudioClientResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http_client,
            config: config.clone(),
        })
    }

    /// Generate a track and consume the response stream fully
    ///
    /// # Errors
    /// - `AudioClientError::Api` on a non-success status
    /// - `AudioClientError::EmptyStream` if no bytes arrive
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    pub async fn generate_stream(&self, prompt: &str) -> AudioClientResult<Bytes> {
        let request = StreamGenerateRequest {
            prompt,
            duration_seconds: self.config.duration_secs,
        };

        let response = self
            .http_client
            .post(&self.config.url)
            .header("x-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AudioClientError::from_send(e, &self.config.url, self.config.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = truncate_error_body(response.text().await.unwrap_or_default());
            warn!(status = status.as_u16(), "Streaming audio provider returned error status");
            return Err(AudioClientError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let mut buffer = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            buffer.extend_from_slice(&chunk?);
        }

        if buffer.is_empty() {
            return Err(AudioClientError::EmptyStream);
        }

        debug!(bytes = buffer.len(), "Audio stream consumed");
        Ok(buffer.freeze())
    }
}
