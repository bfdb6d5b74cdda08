//! Scenery record models
//!
//! A scenery record is the composite output of one pipeline run: the
//! uploaded image, the soundtrack (possibly empty) and up to three idioms.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Persisted scenery record (`scenery_records` table)
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SceneryRecord {
    /// Surrogate primary key; correlation ids may repeat
    #[serde(skip)]
    pub record_id: Uuid,

    /// Correlation id (chat session id)
    pub id: String,

    pub user_id: String,

    pub user_email: String,

    /// Prompt sent to the image model
    pub image_prompt: String,

    /// Public URL of the uploaded image, never empty
    pub image_url: String,

    /// Keywords sent to the music provider
    pub audio_prompt: String,

    /// Playable URL; empty when audio failed or timed out
    pub audio_url: String,

    /// Ordered, trimmed, non-empty lines
    pub idioms: Vec<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl SceneryRecord {
    /// True when the soundtrack could not be produced
    pub fn is_missing_audio(&self) -> bool {
        self.audio_url.is_empty()
    }
}

/// Image half of [`GeneratedContent`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageContent {
    pub image_url: String,
    pub prompt: String,
}

/// Audio half of [`GeneratedContent`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioContent {
    pub audio_url: String,
    pub prompt: String,
}

/// The composite returned when records are not persisted
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub gpt_image: ImageContent,
    pub suno: AudioContent,
    pub idioms: Vec<String>,
}

impl From<SceneryRecord> for GeneratedContent {
    fn from(record: SceneryRecord) -> Self {
        Self {
            gpt_image: ImageContent {
                image_url: record.image_url,
                prompt: record.image_prompt,
            },
            suno: AudioContent {
                audio_url: record.audio_url,
                prompt: record.audio_prompt,
            },
            idioms: record.idioms,
        }
    }
}

/// Result of a successful pipeline run
#[derive(Debug, Clone, PartialEq)]
pub enum SceneryOutcome {
    /// The record as stored
    Persisted(SceneryRecord),
    /// Persistence disabled; the composite is only returned
    Transient(GeneratedContent),
}

impl SceneryOutcome {
    pub fn image_url(&self) -> &str {
        match self {
            Self::Persisted(record) => &record.image_url,
            Self::Transient(content) => &content.gpt_image.image_url,
        }
    }

    pub fn audio_url(&self) -> &str {
        match self {
            Self::Persisted(record) => &record.audio_url,
            Self::Transient(content) => &content.suno.audio_url,
        }
    }

    pub fn idioms(&self) -> &[String] {
        match self {
            Self::Persisted(record) => &record.idioms,
            Self::Transient(content) => &content.idioms,
        }
    }
}
