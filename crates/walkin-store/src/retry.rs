//! Conflict retry with exponential backoff
//!
//! Optimistic commits fail when another writer got there first. The fix is
//! to re-read and try again; [`retry_on_conflict`] does exactly that, bounded
//! by [`RetryConfig::max_attempts`].

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};
use walkin_types::{QueueError, QueueResult};

/// Configuration for retrying conflicted commits
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Delay before the second attempt
    pub initial_delay: Duration,
    /// Maximum delay between attempts
    pub max_delay: Duration,
    /// Multiplier for exponential backoff (e.g., 2.0 doubles delay each attempt)
    pub multiplier: f64,
    /// Random jitter factor (0.0 to 1.0) so colliding writers drift apart
    pub jitter: f64,
    /// Total attempts, including the first one (at least 1)
    pub max_attempts: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(500),
            multiplier: 2.0,
            jitter: 0.2,
            max_attempts: 5,
        }
    }
}

impl RetryConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set initial delay
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set maximum delay
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set backoff multiplier
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Set jitter factor
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.clamp(0.0, 1.0);
        self
    }

    /// Set maximum attempts (clamped to at least 1)
    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = max.max(1);
        self
    }

    /// Retry immediately, without sleeping
    pub fn no_backoff() -> Self {
        Self {
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            jitter: 0.0,
            ..Default::default()
        }
    }

    /// Delay after a failed attempt (1-indexed)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return self.initial_delay;
        }

        let exponent = attempt.saturating_sub(1) as i32;
        let delay_ms = self.initial_delay.as_millis() as f64 * self.multiplier.powi(exponent);
        let delay = Duration::from_millis(delay_ms as u64);

        std::cmp::min(delay, self.max_delay)
    }

    /// Apply jitter to a base delay
    pub fn apply_jitter(&self, base: Duration) -> Duration {
        if self.jitter == 0.0 {
            return base;
        }

        let jitter_range = base.as_millis() as f64 * self.jitter;
        let jitter = rand::random::<f64>() * 2.0 * jitter_range - jitter_range;
        let adjusted_ms = (base.as_millis() as f64 + jitter).max(0.0) as u64;

        Duration::from_millis(adjusted_ms)
    }

    /// Get delay with jitter applied for a given attempt
    pub fn delay_with_jitter(&self, attempt: u32) -> Duration {
        let base = self.delay_for_attempt(attempt);
        self.apply_jitter(base)
    }

    /// Check if another attempt is allowed after `attempt` have been made
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts.max(1)
    }
}

/// Run `op` until it succeeds, fails with a non-conflict error, or the
/// attempt budget is spent
///
/// Each call to `op` must redo the whole read-modify-write from scratch.
/// Returns the value together with the number of attempts used. Running out
/// of attempts yields [`QueueError::Unavailable`].
pub async fn retry_on_conflict<T, F, Fut>(
    config: &RetryConfig,
    operation: &'static str,
    mut op: F,
) -> QueueResult<(T, u32)>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = QueueResult<T>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match op(attempt).await {
            Ok(value) => return Ok((value, attempt)),
            Err(err) if err.is_conflict() => {
                if !config.should_retry(attempt) {
                    warn!(operation, attempts = attempt, error = %err, "Giving up after repeated conflicts");
                    return Err(QueueError::unavailable(format!(
                        "{operation} still conflicting after {attempt} attempts"
                    )));
                }
                let delay = config.delay_with_jitter(attempt);
                debug!(operation, attempt, ?delay, error = %err, "Commit conflicted, retrying");
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
            Err(err) => return Err(err),
        }
    }
}
