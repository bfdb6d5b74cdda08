//! Soundtrack backends
//!
//! The pipeline asks an [`AudioBackend`] for a playable URL. Backends never
//! decide what happens on failure; the pipeline logs the error and carries on
//! with an empty URL.
//!
//! - [`PollingAudioBackend`]: submit a job, then poll its status
//! - [`StreamingAudioBackend`]: one request returning the audio bytes, which
//!   are uploaded to the audio bucket
//! - [`DisabledAudioBackend`]: no audio at all

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use moodscape_audio_client::{
    AudioClientError, AudioClientResult, ClipState, StreamingAudioClient, SunoClient,
};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::poll::{PollError, PollPolicy, PollStep};
use super::storage::{artifact_path, ArtifactStore, StorageError};

/// Content type of uploaded soundtracks
pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// Why no soundtrack was produced
#[derive(Debug, Error)]
pub enum AudioError {
    /// The provider call itself failed
    #[error("music provider error: {0}")]
    Provider(#[from] AudioClientError),

    /// Submission returned no usable job id
    #[error("music provider returned no job id")]
    MissingJobId,

    /// The job reported a failure state
    #[error("audio job {job_id} failed with status '{status}'")]
    JobFailed { job_id: String, status: String },

    /// The job never became ready within the poll budget
    #[error("audio job {job_id} not ready after {attempts} attempts")]
    JobTimeout { job_id: String, attempts: u32 },

    /// Polling was cut short
    #[error("audio polling for job {job_id} stopped: {reason}")]
    Interrupted { job_id: String, reason: String },

    /// Streamed audio could not be stored
    #[error("audio upload failed: {0}")]
    Upload(#[from] StorageError),
}

/// Produces a playable soundtrack URL for a set of keywords
#[async_trait]
pub trait AudioBackend: Send + Sync {
    /// Short backend name for logs and health output
    fn name(&self) -> &'static str;

    /// Produce a soundtrack; `correlation_id` namespaces any stored artifact
    async fn produce(&self, keywords: &str, correlation_id: &str) -> Result<String, AudioError>;
}

/// Status of a submitted job as seen by one poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatus {
    pub state: ClipState,
    pub result_url: Option<String>,
}

/// The two calls the polling backend needs from a job API
#[async_trait]
pub trait MediaJobClient: Send + Sync {
    /// Submit an instrumental job and return its id (possibly empty)
    async fn submit(&self, prompt: &str) -> AudioClientResult<String>;

    /// Read a job's status; `None` when the provider returned nothing
    async fn status(&self, job_id: &str) -> AudioClientResult<Option<JobStatus>>;
}

#[async_trait]
impl MediaJobClient for SunoClient {
    async fn submit(&self, prompt: &str) -> AudioClientResult<String> {
        let clips = self.generate(prompt).await?;
        Ok(clips.into_iter().next().map(|clip| clip.id).unwrap_or_default())
    }

    async fn status(&self, job_id: &str) -> AudioClientResult<Option<JobStatus>> {
        let clips = self.get_audio_information(&[job_id]).await?;
        Ok(clips.into_iter().next().map(|clip| JobStatus {
            state: clip.state(),
            result_url: clip.result_url().map(str::to_string),
        }))
    }
}

/// Submit-then-poll backend
pub struct PollingAudioBackend {
    client: Arc<dyn MediaJobClient>,
    policy: PollPolicy,
    lenient: bool,
    shutdown: CancellationToken,
}

impl PollingAudioBackend {
    pub fn new(client: Arc<dyn MediaJobClient>, policy: PollPolicy) -> Self {
        Self {
            client,
            policy,
            lenient: false,
            shutdown: CancellationToken::new(),
        }
    }

    /// Keep polling through `error`/`failed` states instead of giving up
    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    /// Stop in-flight polls when `token` is cancelled
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    async fn probe(&self, job_id: &str, attempt: u32) -> Result<PollStep<String>, AudioError> {
        debug!(job_id = %job_id, attempt, "Polling audio job status");

        let status = match self.client.status(job_id).await {
            Ok(status) => status,
            Err(e) if self.lenient => {
                warn!(job_id = %job_id, attempt, error = %e, "Status read failed, will retry");
                return Ok(PollStep::Pending);
            }
            Err(e) => return Err(e.into()),
        };

        let Some(status) = status else {
            warn!(job_id = %job_id, attempt, "No status returned, will retry");
            return Ok(PollStep::Pending);
        };

        debug!(job_id = %job_id, attempt, status = %status.state, "Audio job status");

        if status.state.is_success() {
            if let Some(url) = status.result_url {
                return Ok(PollStep::Ready(url));
            }
            debug!(job_id = %job_id, "Job ready but URL not yet published");
            return Ok(PollStep::Pending);
        }

        if status.state.is_failure() {
            if self.lenient {
                warn!(job_id = %job_id, attempt, status = %status.state, "Job reported failure, still polling");
                return Ok(PollStep::Pending);
            }
            return Err(AudioError::JobFailed {
                job_id: job_id.to_string(),
                status: status.state.to_string(),
            });
        }

        Ok(PollStep::Pending)
    }
}

#[async_trait]
impl AudioBackend for PollingAudioBackend {
    fn name(&self) -> &'static str {
        "suno"
    }

    #[instrument(skip(self, keywords), fields(correlation_id = %correlation_id))]
    async fn produce(&self, keywords: &str, correlation_id: &str) -> Result<String, AudioError> {
        let job_id = self.client.submit(keywords).await?;
        if job_id.is_empty() {
            return Err(AudioError::MissingJobId);
        }
        info!(job_id = %job_id, "Audio job submitted");

        let cancel = self.shutdown.child_token();
        let job = job_id.as_str();

        let url = self
            .policy
            .poll_until(&cancel, |attempt| self.probe(job, attempt))
            .await
            .map_err(|e| match e {
                PollError::Failed { error, .. } => error,
                PollError::Exhausted { attempts } => AudioError::JobTimeout {
                    job_id: job_id.clone(),
                    attempts,
                },
                other @ (PollError::DeadlineExceeded(_) | PollError::Cancelled) => {
                    AudioError::Interrupted {
                        job_id: job_id.clone(),
                        reason: other.to_string(),
                    }
                }
            })?;

        info!(job_id = %job_id, audio_url = %url, "Audio ready");
        Ok(url)
    }
}

/// Source of fully-buffered generated audio
#[async_trait]
pub trait AudioStreamSource: Send + Sync {
    async fn generate(&self, prompt: &str) -> AudioClientResult<Bytes>;
}

#[async_trait]
impl AudioStreamSource for StreamingAudioClient {
    async fn generate(&self, prompt: &str) -> AudioClientResult<Bytes> {
        self.generate_stream(prompt).await
    }
}

/// Stream-then-upload backend
pub struct StreamingAudioBackend {
    source: Arc<dyn AudioStreamSource>,
    store: Arc<dyn ArtifactStore>,
}

impl StreamingAudioBackend {
    pub fn new(source: Arc<dyn AudioStreamSource>, store: Arc<dyn ArtifactStore>) -> Self {
        Self { source, store }
    }
}

#[async_trait]
impl AudioBackend for StreamingAudioBackend {
    fn name(&self) -> &'static str {
        "stream"
    }

    #[instrument(skip(self, keywords), fields(correlation_id = %correlation_id))]
    async fn produce(&self, keywords: &str, correlation_id: &str) -> Result<String, AudioError> {
        let audio = self.source.generate(keywords).await?;
        if audio.is_empty() {
            return Err(AudioClientError::EmptyStream.into());
        }
        let path = artifact_path(correlation_id, "mp3");

        self.store.upload(&path, audio, AUDIO_CONTENT_TYPE).await?;
        let url = self.store.public_url(&path)?;

        info!(bucket = %self.store.bucket(), audio_url = %url, "Streamed audio stored");
        Ok(url)
    }
}

/// Backend used when audio is switched off
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledAudioBackend;

#[async_trait]
impl AudioBackend for DisabledAudioBackend {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn produce(&self, _keywords: &str, _correlation_id: &str) -> Result<String, AudioError> {
        Ok(String::new())
    }
}
