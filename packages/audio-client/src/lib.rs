//! Music generation API clients for Moodscape
//!
//! This crate provides two clients:
//! - [`SunoClient`]: submits a job and reads its status by id (polling)
//! - [`StreamingAudioClient`]: a single request that streams the track back
//!
//! # Example
//!
//! ```rust,no_run
//! use moodscape_audio_client::SunoClient;
//! use moodscape_shared_config::SunoConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SunoClient::new(&SunoConfig::default())?;
//!
//! let clips = client.generate("lofi, rain, slow piano").await?;
//! let status = client.get_audio_information(&[clips[0].id.as_str()]).await?;
//! println!("{}", status[0].state());
//! # Ok(())
//! # }
//! ```

mod error;
mod models;
mod stream;
mod suno;

pub use error::{AudioClientError, AudioClientResult};
pub use models::{AudioClip, ClipState, GenerateAudioPayload, QuotaInfo};
pub use stream::StreamingAudioClient;
pub use suno::SunoClient;
