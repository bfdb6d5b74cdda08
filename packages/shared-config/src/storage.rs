//! Object storage configuration

use url::{ParseError, Url};

use crate::{get_env_or_default, parse_env, ConfigResult};

/// Supabase Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Project URL (e.g., https://xyz.supabase.co)
    pub url: String,

    /// Service role key used for uploads
    pub service_key: String,

    /// Bucket receiving generated images
    pub image_bucket: String,

    /// Bucket receiving generated audio
    pub audio_bucket: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl StorageConfig {
    /// Load storage configuration from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            url: get_env_or_default("SUPABASE_URL", "http://localhost:54321"),
            service_key: get_env_or_default("SUPABASE_SERVICE_KEY", ""),
            image_bucket: get_env_or_default("STORAGE_IMAGE_BUCKET", "imageFile"),
            audio_bucket: get_env_or_default("STORAGE_AUDIO_BUCKET", "audioFile"),
            timeout_secs: parse_env("STORAGE_TIMEOUT", 60)?,
        })
    }

    /// Create a configuration with a custom URL (useful for testing)
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// URL used to write an object
    pub fn object_url(&self, bucket: &str, path: &str) -> Result<Url, ParseError> {
        self.storage_url(&["object", bucket], path)
    }

    /// URL under which an object in a public bucket is served
    pub fn public_object_url(&self, bucket: &str, path: &str) -> Result<Url, ParseError> {
        self.storage_url(&["object", "public", bucket], path)
    }

    /// Append `prefix` and the `/`-separated `path` to the project URL
    ///
    /// Every segment is percent-encoded, so `?` and `#` stay part of the
    /// object key. Empty, `.` and `..` segments are dropped.
    fn storage_url(&self, prefix: &[&str], path: &str) -> Result<Url, ParseError> {
        let mut url = Url::parse(&self.url)?;
        url.path_segments_mut()
            .map_err(|_| ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(["storage", "v1"])
            .extend(prefix)
            .extend(
                path.split('/')
                    .filter(|segment| !matches!(*segment, "" | "." | "..")),
            );
        Ok(url)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:54321".to_string(),
            service_key: String::new(),
            image_bucket: "imageFile".to_string(),
            audio_bucket: "audioFile".to_string(),
            timeout_secs: 60,
        }
    }
}
