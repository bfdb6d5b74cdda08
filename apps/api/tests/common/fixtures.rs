//! In-memory collaborators for pipeline and route tests
//!
//! Each fake records what it was asked to do so tests can assert on call
//! counts and ordering without any network.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use bytes::Bytes;
use moodscape_api::models::SceneryRecord;
use moodscape_api::repositories::RecordStore;
use moodscape_api::services::audio::{AudioBackend, AudioError, AudioStreamSource};
use moodscape_audio_client::AudioClientResult;
use moodscape_api::services::{ArtifactStore, GenerationClient, StorageError};
use moodscape_openai_client::OpenAiError;
use moodscape_test_utils::TINY_PNG;

pub const KEYWORDS: &str = "ambient, piano, slow tempo, rain, melancholic";
pub const IDIOMS: &str = "Still waters run deep\nEvery cloud has a silver lining\nThis too shall pass";

/// Scripted text and image generator
pub struct FakeGenerator {
    pub image_payload: Option<String>,
    pub fail_image: bool,
    pub fail_text: bool,
    pub keywords: String,
    pub idioms: String,
    pub image_delay: Duration,
    pub keyword_delay: Duration,
    pub idiom_delay: Duration,
    pub image_calls: AtomicUsize,
    pub text_calls: AtomicUsize,
}

impl Default for FakeGenerator {
    fn default() -> Self {
        Self {
            image_payload: Some(BASE64.encode(TINY_PNG)),
            fail_image: false,
            fail_text: false,
            keywords: KEYWORDS.to_string(),
            idioms: IDIOMS.to_string(),
            image_delay: Duration::ZERO,
            keyword_delay: Duration::ZERO,
            idiom_delay: Duration::ZERO,
            image_calls: AtomicUsize::new(0),
            text_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl GenerationClient for FakeGenerator {
    async fn generate_text(&self, prompt: &str) -> Result<String, OpenAiError> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        let is_keywords = prompt.contains("keywords");
        tokio::time::sleep(if is_keywords {
            self.keyword_delay
        } else {
            self.idiom_delay
        })
        .await;

        if self.fail_text {
            return Err(OpenAiError::RateLimited);
        }
        Ok(if is_keywords {
            self.keywords.clone()
        } else {
            self.idioms.clone()
        })
    }

    async fn generate_image(&self, _prompt: &str) -> Result<Option<String>, OpenAiError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.image_delay).await;

        if self.fail_image {
            return Err(OpenAiError::ApiError {
                status: 500,
                message: "image model unavailable".to_string(),
            });
        }
        Ok(self.image_payload.clone())
    }
}

/// Artifact store that keeps uploads in memory
#[derive(Default)]
pub struct MemoryStore {
    pub uploads: Mutex<Vec<(String, Bytes, String)>>,
    pub reject: bool,
}

impl MemoryStore {
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn paths(&self) -> Vec<String> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .map(|(path, _, _)| path.clone())
            .collect()
    }
}

#[async_trait]
impl ArtifactStore for MemoryStore {
    fn bucket(&self) -> &str {
        "imageFile"
    }

    async fn upload(&self, path: &str, bytes: Bytes, content_type: &str) -> Result<(), StorageError> {
        if self.reject {
            return Err(StorageError::Rejected {
                status: 403,
                message: "bucket policy".to_string(),
            });
        }
        self.uploads
            .lock()
            .unwrap()
            .push((path.to_string(), bytes, content_type.to_string()));
        Ok(())
    }

    fn public_url(&self, path: &str) -> Result<String, StorageError> {
        Ok(format!(
            "https://project.supabase.co/storage/v1/object/public/imageFile/{}",
            path
        ))
    }
}

/// Audio backend returning a fixed outcome
pub struct FixedAudio {
    pub url: Option<String>,
    pub calls: AtomicUsize,
}

impl FixedAudio {
    pub fn ready(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn timing_out() -> Self {
        Self {
            url: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AudioBackend for FixedAudio {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn produce(&self, _keywords: &str, _correlation_id: &str) -> Result<String, AudioError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.url.clone().ok_or(AudioError::JobTimeout {
            job_id: "job-1".to_string(),
            attempts: 12,
        })
    }
}

/// Streaming source returning the same bytes every time
pub struct StaticAudioStream {
    pub bytes: Bytes,
}

impl StaticAudioStream {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            bytes: Bytes::copy_from_slice(bytes),
        }
    }
}

#[async_trait]
impl AudioStreamSource for StaticAudioStream {
    async fn generate(&self, _prompt: &str) -> AudioClientResult<Bytes> {
        Ok(self.bytes.clone())
    }
}

/// Record store kept in memory
#[derive(Default)]
pub struct MemoryRecords {
    pub records: Mutex<Vec<SceneryRecord>>,
    pub fail: bool,
}

impl MemoryRecords {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl RecordStore for MemoryRecords {
    async fn insert(&self, record: &SceneryRecord) -> Result<SceneryRecord, sqlx::Error> {
        if self.fail {
            return Err(sqlx::Error::PoolTimedOut);
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(record.clone())
    }
}

/// Handles to every fake behind a pipeline
pub struct PipelineFakes {
    pub generator: Arc<FakeGenerator>,
    pub images: Arc<MemoryStore>,
    pub audio: Arc<FixedAudio>,
    pub records: Arc<MemoryRecords>,
}

impl Default for PipelineFakes {
    fn default() -> Self {
        Self {
            generator: Arc::new(FakeGenerator::default()),
            images: Arc::new(MemoryStore::default()),
            audio: Arc::new(FixedAudio::ready("https://cdn.example/audio/job-1.mp3")),
            records: Arc::new(MemoryRecords::default()),
        }
    }
}
