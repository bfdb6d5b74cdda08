//! Business logic services for Moodscape
//!
//! - Access token verification
//! - Text and image generation seam
//! - Artifact storage
//! - Soundtrack backends and the poll policy they use
//! - The scenery pipeline tying them together
//! - Health checks

pub mod audio;
pub mod auth;
pub mod generation;
pub mod health;
pub mod poll;
pub mod scenery;
pub mod storage;

pub use audio::{
    AudioBackend, AudioError, DisabledAudioBackend, PollingAudioBackend, StreamingAudioBackend,
};
pub use auth::{AuthConfig, AuthService};
pub use generation::GenerationClient;
pub use health::HealthService;
pub use poll::{PollError, PollPolicy, PollStep};
pub use scenery::{PipelineError, SceneryPipeline};
pub use storage::{artifact_path, ArtifactStore, StorageError, SupabaseBucket};
