//! Artifact storage backed by Supabase Storage
//!
//! Each [`SupabaseBucket`] writes into one bucket and resolves public URLs
//! for the objects it stores.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use moodscape_shared_config::StorageConfig;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Maximum error body size to prevent memory exhaustion
const MAX_ERROR_BODY_SIZE: usize = 1000;

/// Errors from the artifact store
#[derive(Debug, Error)]
pub enum StorageError {
    /// Upload request could not be sent
    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The object URL could not be built from the configured project URL
    #[error("invalid storage URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Storage answered with a non-success status
    #[error("upload rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The public URL could not be built
    #[error("public URL unavailable for '{0}'")]
    PublicUrlUnavailable(String),
}

/// Object path `public/<correlation id>-<uuid>.<extension>`
///
/// The correlation id comes from the caller, so anything other than ASCII
/// alphanumerics, `-` and `_` is replaced with `_`. The id then always stays
/// inside one path segment.
pub fn artifact_path(correlation_id: &str, extension: &str) -> String {
    let key: String = correlation_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("public/{}-{}.{}", key, Uuid::new_v4(), extension)
}

/// A place to put generated bytes and get a shareable URL back
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Bucket name, for logging
    fn bucket(&self) -> &str;

    /// Write `bytes` at `path`, replacing any existing object
    async fn upload(&self, path: &str, bytes: Bytes, content_type: &str)
        -> Result<(), StorageError>;

    /// Public URL under which `path` is served
    fn public_url(&self, path: &str) -> Result<String, StorageError>;
}

/// One Supabase Storage bucket
#[derive(Clone)]
pub struct SupabaseBucket {
    http_client: Client,
    config: StorageConfig,
    bucket: String,
}

impl std::fmt::Debug for SupabaseBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseBucket")
            .field("url", &self.config.url)
            .field("bucket", &self.bucket)
            .field("service_key", &"[REDACTED]")
            .finish()
    }
}

impl SupabaseBucket {
    /// Create a store for `bucket`
    pub fn new(config: &StorageConfig, bucket: impl Into<String>) -> Result<Self, StorageError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http_client,
            config: config.clone(),
            bucket: bucket.into(),
        })
    }

    /// Store for the configured image bucket
    pub fn images(config: &StorageConfig) -> Result<Self, StorageError> {
        Self::new(config, config.image_bucket.clone())
    }

    /// Store for the configured audio bucket
    pub fn audio(config: &StorageConfig) -> Result<Self, StorageError> {
        Self::new(config, config.audio_bucket.clone())
    }

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
}

#[async_trait]
impl ArtifactStore for SupabaseBucket {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    #[instrument(skip(self, bytes), fields(bucket = %self.bucket, size = bytes.len()))]
    async fn upload(
        &self,
        path: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let url = self.config.object_url(&self.bucket, path)?;
        let response = self
            .http_client
            .post(url)
            .bearer_auth(&self.config.service_key)
            .header("apikey", &self.config.service_key)
            .header("x-upsert", "true")
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = Self::truncate_error_body(response.text().await.unwrap_or_default());
            warn!(status = status.as_u16(), "Storage rejected upload");
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Object uploaded");
        Ok(())
    }

    fn public_url(&self, path: &str) -> Result<String, StorageError> {
        self.config
            .public_object_url(&self.bucket, path)
            .map(String::from)
            .map_err(|_| StorageError::PublicUrlUnavailable(path.to_string()))
    }
}
