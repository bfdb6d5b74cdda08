//! Music provider request and response types

use serde::{Deserialize, Serialize};

/// Payload for `POST /api/generate`
#[derive(Debug, Clone, Serialize)]
pub struct GenerateAudioPayload {
    /// Description of the track (keywords)
    pub prompt: String,
    /// Request a track without vocals
    pub make_instrumental: bool,
    /// Pinned model version
    pub model: String,
    /// Block until audio is ready; always false, the caller polls
    pub wait_audio: bool,
}

impl GenerateAudioPayload {
    /// Instrumental, non-blocking payload for the given model
    pub fn instrumental(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            make_instrumental: true,
            model: model.into(),
            wait_audio: false,
        }
    }
}

/// A clip as reported by the provider on submission and status reads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AudioClip {
    /// Job identifier
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Raw status string
    #[serde(default)]
    pub status: String,
    /// Playable URL, present once the clip is streaming or complete
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl AudioClip {
    /// Interpret the raw status string
    pub fn state(&self) -> ClipState {
        ClipState::from(self.status.as_str())
    }

    /// Audio URL if present and non-empty
    pub fn result_url(&self) -> Option<&str> {
        self.audio_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// Lifecycle of a clip at the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipState {
    Queued,
    Submitted,
    /// Playable; the audio URL can be used while rendering finishes
    Streaming,
    Complete,
    Error,
    Failed,
    Other(String),
}

impl ClipState {
    /// Audio is ready to be handed out
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Streaming | Self::Complete)
    }

    /// Provider reported a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Error | Self::Failed)
    }
}

impl From<&str> for ClipState {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "queued" => Self::Queued,
            "submitted" => Self::Submitted,
            "streaming" => Self::Streaming,
            "complete" => Self::Complete,
            "error" => Self::Error,
            "failed" => Self::Failed,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for ClipState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::Submitted => write!(f, "submitted"),
            Self::Streaming => write!(f, "streaming"),
            Self::Complete => write!(f, "complete"),
            Self::Error => write!(f, "error"),
            Self::Failed => write!(f, "failed"),
            Self::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Remaining generation credits (`GET /api/get_limit`)
#[derive(Debug, Clone, Deserialize)]
pub struct QuotaInfo {
    #[serde(default)]
    pub credits_left: i64,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub monthly_limit: i64,
    #[serde(default)]
    pub monthly_usage: i64,
}

/// Request body for the streaming provider
#[derive(Debug, Clone, Serialize)]
pub(crate) struct StreamGenerateRequest<'a> {
    pub prompt: &'a str,
    pub duration_seconds: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_state_parsing() {
        assert_eq!(ClipState::from("streaming"), ClipState::Streaming);
        assert_eq!(ClipState::from("COMPLETE"), ClipState::Complete);
        assert_eq!(
            ClipState::from("rendering"),
            ClipState::Other("rendering".to_string())
        );
        assert!(ClipState::Complete.is_success());
        assert!(ClipState::Failed.is_failure());
        assert!(!ClipState::Queued.is_success());
    }

    #[test]
    fn test_clip_parsing_with_missing_fields() {
        let json = r#"[{"id": "abc", "status": "submitted", "audio_url": ""}]"#;
        let clips: Vec<AudioClip> = serde_json::from_str(json).unwrap();
        assert_eq!(clips[0].id, "abc");
        assert_eq!(clips[0].state(), ClipState::Submitted);
        assert!(clips[0].result_url().is_none());
    }

    #[test]
    fn test_instrumental_payload() {
        let payload = GenerateAudioPayload::instrumental("lofi, piano", "chirp-v3-5");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["make_instrumental"], true);
        assert_eq!(json["wait_audio"], false);
        assert_eq!(json["model"], "chirp-v3-5");
    }
}
