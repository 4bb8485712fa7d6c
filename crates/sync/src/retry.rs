//! Time-budgeted exponential backoff.
//!
//! [`RetryPolicy::run`] re-invokes an operation while it fails with a
//! retryable error, sleeping 1 s, 2 s, 4 s, ... (capped at
//! [`RetryConfig::max_delay`]) between attempts. There is no attempt limit:
//! once the wall-clock time since the first attempt reaches
//! [`RetryConfig::budget`], the last error is returned unchanged. Each call
//! to `run` gets its own budget.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

/// Errors that know whether another attempt could succeed.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// Tunable parameters for the backoff schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Wait before the second attempt.
    pub initial_delay: Duration,
    /// Upper bound on any single wait.
    pub max_delay: Duration,
    /// Factor by which the wait grows after each failure.
    pub multiplier: f64,
    /// Total wall-clock time across which an operation may be retried.
    pub budget: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            multiplier: 2.0,
            budget: Duration::from_secs(120),
        }
    }
}

/// Shortest wait ever scheduled between two attempts.
pub const MIN_DELAY: Duration = Duration::from_millis(1);

/// Calculate the next backoff delay from the current delay and config.
///
/// The result is clamped to [`RetryConfig::max_delay`] and never drops
/// below [`MIN_DELAY`].
pub fn next_delay(current: Duration, config: &RetryConfig) -> Duration {
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms)
        .min(config.max_delay)
        .max(MIN_DELAY)
}

/// Wraps fallible async operations with the backoff schedule.
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// A zero `initial_delay` is raised to [`MIN_DELAY`] so a failing
    /// upstream is never re-polled in a tight loop.
    pub fn new(mut config: RetryConfig) -> Self {
        config.initial_delay = config.initial_delay.max(MIN_DELAY);
        Self { config }
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error,
    /// or the budget is spent.
    ///
    /// Non-retryable errors return on the spot without sleeping. Waits are
    /// shortened so they never run past the end of the budget.
    pub async fn run<T, E, F, Fut>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + Display,
    {
        let started = Instant::now();
        let mut delay = self.config.initial_delay;
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !err.is_retryable() {
                return Err(err);
            }

            let elapsed = started.elapsed();
            if elapsed >= self.config.budget {
                tracing::error!(
                    attempt,
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %err,
                    "Retry budget exhausted",
                );
                return Err(err);
            }

            let wait = delay.min(self.config.budget - elapsed);
            tracing::warn!(
                attempt,
                delay_ms = wait.as_millis() as u64,
                error = %err,
                "Transient failure, retrying",
            );
            tokio::time::sleep(wait).await;

            delay = next_delay(delay, &self.config);
        }
    }
}
