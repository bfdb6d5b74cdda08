//! Suno-compatible job API client

use std::fmt;
use std::time::Duration;

use moodscape_shared_config::SunoConfig;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::error::{truncate_error_body, AudioClientError, AudioClientResult};
use crate::models::{AudioClip, GenerateAudioPayload, QuotaInfo};

/// Client for an asynchronous music generation job API
#[derive(Clone)]
pub struct SunoClient {
    http_client: Client,
    config: SunoConfig,
}

impl fmt::Debug for SunoClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SunoClient")
            .field("url", &self.config.url)
            .field("api_key", &self.config.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.config.model)
            .finish()
    }
}

impl SunoClient {
    /// Create a new client from configuration
    pub fn new(config: &SunoConfig) -> AudioClientResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .pool_max_idle_per_host(5)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent("Moodscape/1.0")
            .build()?;

        Ok(Self {
            http_client,
            config: config.clone(),
        })
    }

    /// Model version pinned for generation requests
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> AudioClientResult<Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| AudioClientError::from_send(e, &self.config.url, self.config.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = truncate_error_body(response.text().await.unwrap_or_default());
            warn!(status = status.as_u16(), "Music provider returned error status");
            return Err(AudioClientError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> AudioClientResult<T> {
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Submit an instrumental generation job without waiting for audio
    ///
    /// # Errors
    /// - `AudioClientError::Api` if the provider rejects the request
    /// - `AudioClientError::EmptyResponse` if no clip is returned
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len(), model = %self.config.model))]
    pub async fn generate(&self, prompt: &str) -> AudioClientResult<Vec<AudioClip>> {
        let payload = GenerateAudioPayload::instrumental(prompt, &self.config.model);

        let response = self
            .send(self.http_client.post(self.config.api_url("generate")).json(&payload))
            .await?;
        let clips: Vec<AudioClip> = Self::read_json(response).await?;

        if clips.is_empty() {
            return Err(AudioClientError::EmptyResponse);
        }

        debug!(
            clip_count = clips.len(),
            job_id = %clips[0].id,
            "Music generation submitted"
        );

        Ok(clips)
    }

    /// Read the current state of one or more clips
    #[instrument(skip(self))]
    pub async fn get_audio_information(&self, ids: &[&str]) -> AudioClientResult<Vec<AudioClip>> {
        let ids = ids.join(",");
        let response = self
            .send(
                self.http_client
                    .get(self.config.api_url("get"))
                    .query(&[("ids", ids.as_str())]),
            )
            .await?;

        let clips: Vec<AudioClip> = Self::read_json(response).await?;
        debug!(clip_count = clips.len(), "Fetched clip status");
        Ok(clips)
    }

    /// Read remaining generation credits
    #[instrument(skip(self))]
    pub async fn get_quota(&self) -> AudioClientResult<QuotaInfo> {
        let response = self
            .send(self.http_client.get(self.config.api_url("get_limit")))
            .await?;
        Self::read_json(response).await
    }
}
