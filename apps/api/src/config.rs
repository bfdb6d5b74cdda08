//! API server configuration

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crate::services::PollPolicy;
use moodscape_shared_config::{
    parse_env, AudioStreamConfig, CommonConfig, DatabaseConfig, Environment, OpenAiConfig,
    StorageConfig, SunoConfig,
};

/// Minimum required length for SUPABASE_JWT_SECRET to be considered secure
const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Which provider, if any, produces the soundtrack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioBackendKind {
    /// Submit a job and poll for the result
    #[default]
    Suno,
    /// Single request returning the audio bytes
    Stream,
    /// No audio
    Disabled,
}

impl FromStr for AudioBackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "suno" | "poll" | "polling" => Ok(Self::Suno),
            "stream" | "streaming" => Ok(Self::Stream),
            "disabled" | "none" | "off" => Ok(Self::Disabled),
            other => Err(format!("unknown audio backend '{}'", other)),
        }
    }
}

impl std::fmt::Display for AudioBackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Suno => write!(f, "suno"),
            Self::Stream => write!(f, "stream"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

/// Audio job polling settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Delay between status reads
    pub interval: Duration,
    /// Status reads before giving up
    pub max_attempts: u32,
    /// Treat `error`/`failed` as still pending instead of ending the loop
    pub lenient: bool,
    /// Bound on the whole poll loop; `None` relies on the attempt budget alone
    pub deadline: Option<Duration>,
}

impl PollSettings {
    pub fn policy(&self) -> PollPolicy {
        let policy = PollPolicy::new(self.max_attempts, self.interval);
        match self.deadline {
            Some(deadline) => policy.with_deadline(deadline),
            None => policy,
        }
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 12,
            lenient: false,
            deadline: None,
        }
    }
}

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Common configuration shared with the client crates
    pub common: CommonConfig,

    /// Server port (default: 8080)
    pub port: u16,

    /// Secret used by the auth provider to sign access tokens
    pub jwt_secret: String,

    /// CORS allowed origins (optional)
    pub cors_allowed_origins: Option<Vec<String>>,

    /// Selected soundtrack provider
    pub audio_backend: AudioBackendKind,

    /// Insert scenery records into the database (otherwise return them transiently)
    pub persist_records: bool,

    /// Audio job polling settings
    pub poll: PollSettings,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// In production mode, this function requires:
    /// - `SUPABASE_JWT_SECRET`: Must be set and at least 32 characters long
    /// - `DATABASE_URL`: Must be explicitly set when records are persisted
    ///
    /// The streaming backend additionally requires `AUDIO_STREAM_URL` and
    /// `AUDIO_STREAM_API_KEY` in every environment.
    pub fn from_env() -> Result<Self> {
        let environment = Environment::from_str(
            &env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        )
        .unwrap_or_default();
        let is_production = environment.is_production();

        let jwt_secret = Self::load_jwt_secret(is_production)?;
        let persist_records: bool =
            parse_env("SCENERY_PERSIST", true).context("Invalid SCENERY_PERSIST value")?;

        if is_production && persist_records {
            Self::validate_database_url()?;
        }

        let common = CommonConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        let audio_backend: AudioBackendKind = parse_env("AUDIO_BACKEND", AudioBackendKind::Suno)
            .context("Invalid AUDIO_BACKEND value")?;

        if audio_backend == AudioBackendKind::Stream && !common.has_audio_stream() {
            bail!(
                "AUDIO_BACKEND=stream requires AUDIO_STREAM_URL and AUDIO_STREAM_API_KEY to be set"
            );
        }

        let poll = PollSettings {
            interval: Duration::from_secs(
                parse_env("AUDIO_POLL_INTERVAL_SECS", 5u64)
                    .context("Invalid AUDIO_POLL_INTERVAL_SECS value")?,
            ),
            max_attempts: parse_env("AUDIO_POLL_MAX_ATTEMPTS", 12u32)
                .context("Invalid AUDIO_POLL_MAX_ATTEMPTS value")?,
            lenient: parse_env("AUDIO_POLL_LENIENT", false)
                .context("Invalid AUDIO_POLL_LENIENT value")?,
            deadline: match parse_env("AUDIO_POLL_DEADLINE_SECS", 0u64)
                .context("Invalid AUDIO_POLL_DEADLINE_SECS value")?
            {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
        };

        if poll.max_attempts == 0 {
            bail!("AUDIO_POLL_MAX_ATTEMPTS must be at least 1");
        }

        Ok(Self {
            common,

            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid PORT value")?,

            jwt_secret,

            cors_allowed_origins: env::var("CORS_ORIGINS").ok().map(|s| {
                s.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }),

            audio_backend,
            persist_records,
            poll,
        })
    }

    /// Load and validate SUPABASE_JWT_SECRET
    ///
    /// In production:
    /// - SUPABASE_JWT_SECRET must be explicitly set
    /// - Must be at least MIN_JWT_SECRET_LENGTH characters
    ///
    /// In development: uses a default value with a warning
    fn load_jwt_secret(is_production: bool) -> Result<String> {
        match env::var("SUPABASE_JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => {
                if is_production && secret.len() < MIN_JWT_SECRET_LENGTH {
                    bail!(
                        "SUPABASE_JWT_SECRET must be at least {} characters in production (got {})",
                        MIN_JWT_SECRET_LENGTH,
                        secret.len()
                    );
                }
                Ok(secret)
            }
            _ if is_production => {
                bail!(
                    "SUPABASE_JWT_SECRET environment variable is required in production. \
                     Copy it from the auth provider's project settings."
                );
            }
            _ => {
                tracing::warn!(
                    "SUPABASE_JWT_SECRET not set, using insecure default. \
                     This is only acceptable in development mode."
                );
                Ok("development-secret-change-in-production".to_string())
            }
        }
    }

    /// Validate that DATABASE_URL is explicitly set in production
    fn validate_database_url() -> Result<()> {
        match env::var("DATABASE_URL") {
            Ok(url) if !url.is_empty() => Ok(()),
            _ => {
                bail!(
                    "DATABASE_URL environment variable is required in production. \
                     Please set your PostgreSQL connection string."
                );
            }
        }
    }

    /// Get database configuration
    pub fn database(&self) -> &DatabaseConfig {
        &self.common.database
    }

    /// Get generation provider configuration
    pub fn openai(&self) -> &OpenAiConfig {
        &self.common.openai
    }

    /// Get music job provider configuration
    pub fn suno(&self) -> &SunoConfig {
        &self.common.suno
    }

    /// Get streaming audio provider configuration (if configured)
    pub fn audio_stream(&self) -> Option<&AudioStreamConfig> {
        self.common.audio_stream.as_ref()
    }

    /// Get object storage configuration
    pub fn storage(&self) -> &StorageConfig {
        &self.common.storage
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.common.environment.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("suno", AudioBackendKind::Suno)]
    #[case("polling", AudioBackendKind::Suno)]
    #[case("Stream", AudioBackendKind::Stream)]
    #[case(" disabled ", AudioBackendKind::Disabled)]
    #[case("off", AudioBackendKind::Disabled)]
    fn test_audio_backend_parsing(#[case] raw: &str, #[case] expected: AudioBackendKind) {
        assert_eq!(raw.parse::<AudioBackendKind>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_audio_backend() {
        assert!("mp3".parse::<AudioBackendKind>().is_err());
    }

    #[test]
    fn test_jwt_secret_required_in_production() {
        temp_env::with_var("SUPABASE_JWT_SECRET", None::<&str>, || {
            let result = Config::load_jwt_secret(true);
            let err = result.unwrap_err().to_string();
            assert!(err.contains("SUPABASE_JWT_SECRET"));
            assert!(err.contains("required in production"));
        });
    }

    #[test]
    fn test_jwt_secret_minimum_length_in_production() {
        temp_env::with_var("SUPABASE_JWT_SECRET", Some("short"), || {
            let err = Config::load_jwt_secret(true).unwrap_err().to_string();
            assert!(err.contains("at least 32 characters"));
        });
    }

    #[test]
    fn test_jwt_secret_uses_default_in_development() {
        temp_env::with_var("SUPABASE_JWT_SECRET", None::<&str>, || {
            assert_eq!(
                Config::load_jwt_secret(false).unwrap(),
                "development-secret-change-in-production"
            );
        });
    }

    #[test]
    fn test_database_url_required_in_production() {
        temp_env::with_var("DATABASE_URL", Some(""), || {
            let err = Config::validate_database_url().unwrap_err().to_string();
            assert!(err.contains("DATABASE_URL"));
        });
    }

    #[test]
    fn test_defaults() {
        temp_env::with_vars(
            [
                ("ENVIRONMENT", None::<&str>),
                ("AUDIO_BACKEND", None),
                ("SCENERY_PERSIST", None),
                ("AUDIO_POLL_INTERVAL_SECS", None),
                ("AUDIO_POLL_MAX_ATTEMPTS", None),
                ("AUDIO_POLL_LENIENT", None),
                ("AUDIO_POLL_DEADLINE_SECS", None),
                ("PORT", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.port, 8080);
                assert_eq!(config.audio_backend, AudioBackendKind::Suno);
                assert!(config.persist_records);
                assert_eq!(config.poll, PollSettings::default());
                assert_eq!(config.suno().model, "chirp-v3-5");
            },
        );
    }

    #[test]
    fn test_stream_backend_requires_stream_config() {
        temp_env::with_vars(
            [
                ("ENVIRONMENT", Some("development")),
                ("AUDIO_BACKEND", Some("stream")),
                ("AUDIO_STREAM_URL", None),
                ("AUDIO_STREAM_API_KEY", None),
            ],
            || {
                let err = Config::from_env().unwrap_err().to_string();
                assert!(err.contains("AUDIO_STREAM_URL"));
            },
        );
    }

    #[test]
    fn test_poll_overrides() {
        temp_env::with_vars(
            [
                ("ENVIRONMENT", Some("development")),
                ("AUDIO_BACKEND", Some("disabled")),
                ("SCENERY_PERSIST", Some("false")),
                ("AUDIO_POLL_INTERVAL_SECS", Some("1")),
                ("AUDIO_POLL_MAX_ATTEMPTS", Some("3")),
                ("AUDIO_POLL_LENIENT", Some("true")),
                ("AUDIO_POLL_DEADLINE_SECS", Some("40")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.audio_backend, AudioBackendKind::Disabled);
                assert!(!config.persist_records);
                assert_eq!(config.poll.interval, Duration::from_secs(1));
                assert_eq!(config.poll.max_attempts, 3);
                assert!(config.poll.lenient);
                assert_eq!(config.poll.deadline, Some(Duration::from_secs(40)));

                let policy = config.poll.policy();
                assert_eq!(policy.max_attempts, 3);
                assert_eq!(policy.interval, Duration::from_secs(1));
                assert_eq!(policy.deadline, Some(Duration::from_secs(40)));
            },
        );
    }

    #[test]
    fn test_zero_poll_deadline_means_none() {
        temp_env::with_vars(
            [
                ("ENVIRONMENT", Some("development")),
                ("AUDIO_BACKEND", Some("disabled")),
                ("SCENERY_PERSIST", Some("false")),
                ("AUDIO_POLL_DEADLINE_SECS", Some("0")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.poll.deadline, None);
                assert_eq!(config.poll.policy().deadline, None);
            },
        );
    }

    #[test]
    fn test_invalid_poll_deadline_rejected() {
        temp_env::with_vars(
            [
                ("ENVIRONMENT", Some("development")),
                ("AUDIO_POLL_DEADLINE_SECS", Some("soon")),
            ],
            || {
                let err = Config::from_env().unwrap_err().to_string();
                assert!(err.contains("AUDIO_POLL_DEADLINE_SECS"));
            },
        );
    }

    #[test]
    fn test_zero_poll_attempts_rejected() {
        temp_env::with_vars(
            [
                ("ENVIRONMENT", Some("development")),
                ("AUDIO_BACKEND", Some("suno")),
                ("AUDIO_POLL_MAX_ATTEMPTS", Some("0")),
            ],
            || {
                assert!(Config::from_env().is_err());
            },
        );
    }
}
