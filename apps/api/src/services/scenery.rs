//! The private-scenery pipeline
//!
//! One run turns a mood into an uploaded image, a soundtrack URL and three
//! short idioms:
//!
//! 1. image, keyword and idiom prompts are generated concurrently
//! 2. the image is decoded and uploaded to the image bucket
//! 3. the audio backend turns the keywords into a soundtrack (best effort)
//! 4. the record is persisted, or returned as-is when persistence is off
//!
//! Generation, image and persistence failures abort the run. Audio failures
//! only leave `audio_url` empty.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use bytes::Bytes;
use chrono::Utc;
use moodscape_openai_client::OpenAiError;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::audio::AudioBackend;
use super::generation::GenerationClient;
use super::storage::{artifact_path, ArtifactStore, StorageError};
use crate::models::{GeneratedContent, SceneryOutcome, SceneryRecord, SceneryUser};
use crate::repositories::RecordStore;

/// Content type of uploaded scenery images
pub const IMAGE_CONTENT_TYPE: &str = "image/png";

/// Idioms kept per record
pub const MAX_IDIOMS: usize = 3;

/// Fatal pipeline failures
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("content generation failed: {0}")]
    GenerationFailed(#[from] OpenAiError),

    #[error("image payload could not be decoded: {0}")]
    ImageDecodeFailed(String),

    #[error("image upload failed: {0}")]
    StorageUploadFailed(#[from] StorageError),

    #[error("record could not be saved: {0}")]
    PersistenceFailed(#[from] sqlx::Error),
}

pub fn image_prompt(mood: &str) -> String {
    format!(
        "Create a visually evocative image representing the following mood or feeling. \
         Focus on visual elements, atmosphere, and style. Do not include any text, \
         letters or words in the image. Mood: \"{}\"",
        mood
    )
}

pub fn keyword_prompt(mood: &str) -> String {
    format!(
        "Generate 5-7 comma-separated keywords suitable for Suno music generation based on \
         the following mood or feeling description. Focus on genre, tempo, instruments, and \
         overall vibe. Mood: \"{}\"",
        mood
    )
}

pub fn idiom_prompt(mood: &str) -> String {
    format!(
        "Generate exactly 3 short, emotional idioms or famous quotes (like \"still waters run \
         deep\") that resonate with the following mood or feeling. Each idiom/quote should be \
         on a new line. Mood: \"{}\"",
        mood
    )
}

/// Split model output into at most [`MAX_IDIOMS`] trimmed, non-empty lines
pub fn parse_idioms(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(MAX_IDIOMS)
        .map(str::to_string)
        .collect()
}

/// Coordinates generation, storage, audio and persistence for one mood
pub struct SceneryPipeline {
    generator: Arc<dyn GenerationClient>,
    images: Arc<dyn ArtifactStore>,
    audio: Arc<dyn AudioBackend>,
    records: Option<Arc<dyn RecordStore>>,
}

impl SceneryPipeline {
    /// `records: None` disables persistence; runs then yield [`SceneryOutcome::Transient`]
    pub fn new(
        generator: Arc<dyn GenerationClient>,
        images: Arc<dyn ArtifactStore>,
        audio: Arc<dyn AudioBackend>,
        records: Option<Arc<dyn RecordStore>>,
    ) -> Self {
        Self {
            generator,
            images,
            audio,
            records,
        }
    }

    pub fn audio_backend(&self) -> &str {
        self.audio.name()
    }

    pub fn persists_records(&self) -> bool {
        self.records.is_some()
    }

    #[instrument(
        skip(self, mood, user),
        fields(correlation_id = %correlation_id, user_id = %user.id, audio_backend = %self.audio.name())
    )]
    pub async fn run(
        &self,
        mood: &str,
        correlation_id: &str,
        user: &SceneryUser,
    ) -> Result<SceneryOutcome, PipelineError> {
        let mood = mood.trim();
        if mood.is_empty() {
            return Err(PipelineError::InvalidInput("mood text is empty".to_string()));
        }

        let image_prompt = image_prompt(mood);
        let keyword_prompt = keyword_prompt(mood);
        let idiom_prompt = idiom_prompt(mood);
        info!(mood_len = mood.len(), "Generating scenery");

        let (image_payload, keywords, idiom_text) = tokio::try_join!(
            self.generator.generate_image(&image_prompt),
            self.generator.generate_text(&keyword_prompt),
            self.generator.generate_text(&idiom_prompt),
        )
        .map_err(|e| {
            warn!(error = %e, "Content generation failed");
            PipelineError::GenerationFailed(e)
        })?;

        let keywords = keywords.trim().to_string();
        let idioms = parse_idioms(&idiom_text);
        debug!(
            keywords = %keywords,
            idiom_count = idioms.len(),
            "Text generation complete"
        );

        let image_url = self.store_image(image_payload, correlation_id).await?;

        let audio_url = match self.audio.produce(&keywords, correlation_id).await {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "Audio generation failed, continuing without audio");
                String::new()
            }
        };

        let now = Utc::now();
        let record = SceneryRecord {
            record_id: Uuid::new_v4(),
            id: correlation_id.to_string(),
            user_id: user.id.clone(),
            user_email: user.email.clone(),
            image_prompt,
            image_url,
            audio_prompt: keywords,
            audio_url,
            idioms,
            created_at: now,
            updated_at: now,
        };

        let Some(records) = &self.records else {
            info!(has_audio = !record.is_missing_audio(), "Scenery generated (not persisted)");
            return Ok(SceneryOutcome::Transient(GeneratedContent::from(record)));
        };

        let saved = records.insert(&record).await.map_err(|e| {
            warn!(error = %e, image_url = %record.image_url, "Failed to save scenery record");
            PipelineError::PersistenceFailed(e)
        })?;

        info!(has_audio = !saved.is_missing_audio(), "Scenery record saved");
        Ok(SceneryOutcome::Persisted(saved))
    }

    async fn store_image(
        &self,
        payload: Option<String>,
        correlation_id: &str,
    ) -> Result<String, PipelineError> {
        let payload = payload.ok_or_else(|| {
            PipelineError::ImageDecodeFailed("no image data returned".to_string())
        })?;
        let bytes = BASE64
            .decode(payload.trim())
            .map_err(|e| PipelineError::ImageDecodeFailed(e.to_string()))?;

        let path = artifact_path(correlation_id, "png");
        self.images
            .upload(&path, Bytes::from(bytes), IMAGE_CONTENT_TYPE)
            .await?;
        let url = self.images.public_url(&path)?;

        debug!(bucket = %self.images.bucket(), image_url = %url, "Image stored");
        Ok(url)
    }
}
