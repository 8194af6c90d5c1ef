//! Bounded polling of a long-running video job.

use std::time::Duration;

use bnb_models::{Operation, PipelineStage};
use bnb_vertex::VideoJobs;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::debug;

use crate::error::{GenerationError, GenerationResult};

/// Polling schedule and bounds.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay before the first status check, in milliseconds
    pub initial_interval_ms: u64,
    /// Upper bound for a single delay, in milliseconds
    pub max_interval_ms: u64,
    /// Backoff factor applied per attempt (1 = fixed interval)
    pub multiplier: u32,
    /// Total time allowed for the job to finish
    pub max_wait: Duration,
    /// Optional cap on status calls
    pub max_attempts: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: 5_000,
            max_interval_ms: 30_000,
            multiplier: 2,
            max_wait: Duration::from_secs(600),
            max_attempts: None,
        }
    }
}

impl PollConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            initial_interval_ms: std::env::var("VIDEO_POLL_INTERVAL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.initial_interval_ms),
            max_interval_ms: std::env::var("VIDEO_POLL_MAX_INTERVAL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_interval_ms),
            multiplier: std::env::var("VIDEO_POLL_MULTIPLIER")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.multiplier),
            max_wait: std::env::var("VIDEO_MAX_WAIT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.max_wait),
            max_attempts: std::env::var("VIDEO_MAX_POLL_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n: &u32| *n > 0),
        }
    }

    /// Delay before status check number `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = u64::from(self.multiplier.max(1)).saturating_pow(attempt);
        let delay = self.initial_interval_ms.saturating_mul(factor);
        Duration::from_millis(delay.min(self.max_interval_ms.max(self.initial_interval_ms)))
    }
}

/// A finished operation and the number of status calls it took.
#[derive(Debug)]
pub struct PolledOperation {
    pub operation: Operation,
    pub attempts: u32,
}

/// Resolve once shutdown has been signalled.
///
/// A dropped sender means shutdown can no longer be signalled, so this never resolves.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Poll `operation` until it is done.
///
/// Stops with `Timeout` once `max_wait` elapses or `max_attempts` status
/// calls were made, and with `Cancelled` when shutdown is signalled.
pub async fn wait_for_completion(
    jobs: &dyn VideoJobs,
    config: &PollConfig,
    mut shutdown: watch::Receiver<bool>,
    operation: Operation,
) -> GenerationResult<PolledOperation> {
    let started = Instant::now();
    let deadline = started + config.max_wait;
    let mut operation = operation;
    let mut attempts = 0u32;

    while !operation.is_done() {
        let exhausted = config.max_attempts.is_some_and(|max| attempts >= max);
        let now = Instant::now();
        if exhausted || now >= deadline {
            return Err(GenerationError::Timeout {
                waited: now - started,
                attempts,
            });
        }

        let delay = config.delay_for(attempts).min(deadline - now);
        tokio::select! {
            biased;
            _ = shutdown_requested(&mut shutdown) => return Err(GenerationError::Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }

        let name = operation.name.clone();
        attempts += 1;
        operation = tokio::select! {
            biased;
            _ = shutdown_requested(&mut shutdown) => return Err(GenerationError::Cancelled),
            result = jobs.status(&name) => {
                result.map_err(GenerationError::backend(PipelineStage::Polling))?
            }
        };

        debug!(
            operation = %name,
            attempt = attempts,
            elapsed_ms = started.elapsed().as_millis() as u64,
            done = operation.is_done(),
            "Polled video job"
        );
    }

    Ok(PolledOperation { operation, attempts })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_doubles_and_caps() {
        let config = PollConfig {
            initial_interval_ms: 1_000,
            max_interval_ms: 5_000,
            multiplier: 2,
            ..Default::default()
        };
        assert_eq!(config.delay_for(0), Duration::from_millis(1_000));
        assert_eq!(config.delay_for(1), Duration::from_millis(2_000));
        assert_eq!(config.delay_for(2), Duration::from_millis(4_000));
        assert_eq!(config.delay_for(3), Duration::from_millis(5_000));
        assert_eq!(config.delay_for(60), Duration::from_millis(5_000));
    }

    #[test]
    fn test_multiplier_one_is_fixed_interval() {
        let config = PollConfig {
            initial_interval_ms: 250,
            multiplier: 1,
            ..Default::default()
        };
        assert_eq!(config.delay_for(0), config.delay_for(10));
    }

    #[test]
    fn test_zero_multiplier_treated_as_fixed() {
        let config = PollConfig {
            initial_interval_ms: 100,
            multiplier: 0,
            ..Default::default()
        };
        assert_eq!(config.delay_for(3), Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_shutdown_requested_ignores_dropped_sender() {
        let (tx, mut rx) = watch::channel(false);
        drop(tx);
        let waited = tokio::time::timeout(
            Duration::from_millis(20),
            shutdown_requested(&mut rx),
        )
        .await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn test_shutdown_requested_after_signal() {
        let (tx, mut rx) = watch::channel(false);
        tx.send_replace(true);
        tokio::time::timeout(Duration::from_millis(20), shutdown_requested(&mut rx))
            .await
            .unwrap();
    }
}
