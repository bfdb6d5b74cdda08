//! Bounded polling with a fixed interval
//!
//! [`PollPolicy::poll_until`] drives a probe until it reports a result, the
//! attempt budget or deadline runs out, or the cancellation token fires.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// What a single probe observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStep<T> {
    /// Terminal success
    Ready(T),
    /// Not there yet; try again after the interval
    Pending,
}

/// Why polling stopped without a result
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PollError<E> {
    /// The probe returned an error
    #[error("probe failed on attempt {attempt}: {error}")]
    Failed { attempt: u32, error: E },

    /// Every attempt reported pending
    #[error("no result after {attempts} attempts")]
    Exhausted { attempts: u32 },

    /// The overall deadline passed before a result
    #[error("deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    /// The cancellation token fired
    #[error("polling cancelled")]
    Cancelled,
}

/// Reusable poll loop settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Probes before giving up (at least one probe always runs)
    pub max_attempts: u32,
    /// Delay between probes
    pub interval: Duration,
    /// Optional bound on the whole loop
    pub deadline: Option<Duration>,
}

impl PollPolicy {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            interval,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Call `probe` with the 1-based attempt number until it is ready
    ///
    /// No delay precedes the first probe and none follows the last.
    pub async fn poll_until<T, E, F, Fut>(
        &self,
        cancel: &CancellationToken,
        mut probe: F,
    ) -> Result<T, PollError<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<PollStep<T>, E>>,
    {
        let deadline = self.deadline.map(|d| (Instant::now() + d, d));
        let max_attempts = self.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            if cancel.is_cancelled() {
                return Err(PollError::Cancelled);
            }

            let step = match deadline {
                Some((at, limit)) => tokio::select! {
                    _ = cancel.cancelled() => return Err(PollError::Cancelled),
                    _ = tokio::time::sleep_until(at) => return Err(PollError::DeadlineExceeded(limit)),
                    step = probe(attempt) => step,
                },
                None => tokio::select! {
                    _ = cancel.cancelled() => return Err(PollError::Cancelled),
                    step = probe(attempt) => step,
                },
            };

            match step {
                Ok(PollStep::Ready(value)) => return Ok(value),
                Ok(PollStep::Pending) => {}
                Err(error) => return Err(PollError::Failed { attempt, error }),
            }

            if attempt == max_attempts {
                break;
            }

            let wake = Instant::now() + self.interval;
            if let Some((at, limit)) = deadline {
                if wake > at {
                    return Err(PollError::DeadlineExceeded(limit));
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => return Err(PollError::Cancelled),
                _ = tokio::time::sleep_until(wake) => {}
            }
        }

        Err(PollError::Exhausted {
            attempts: max_attempts,
        })
    }
}
