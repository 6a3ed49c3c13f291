//! Exponential backoff around provider calls.
//!
//! Only rate-limit responses (HTTP 429) are retried. Every other failure propagates on the
//! first occurrence. Dropping the returned future cancels the pending sleep along with the
//! in-flight operation.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// HTTP status a provider uses to signal "slow down".
pub const RATE_LIMITED: u16 = 429;

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BASE_DELAY_MS: u64 = 2000;

/// Errors that may carry an HTTP-like status code.
pub trait RetryableError {
    fn status(&self) -> Option<u16>;

    fn is_rate_limited(&self) -> bool {
        self.status() == Some(RATE_LIMITED)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY_MS)
    }
}

impl RetryPolicy {
    /// `max_attempts` counts total calls, not retries. Zero is raised to one so the
    /// operation always runs at least once.
    pub fn new(max_attempts: u32, base_delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: Duration::from_millis(base_delay_ms),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay slept after the failed attempt with index `attempt`: `base * 2^attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Runs `operation` until it succeeds, fails with a non-rate-limit error, or the attempt
/// budget is spent. The last error is returned unchanged.
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryableError + Display,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_rate_limited() && attempt + 1 < policy.max_attempts => {
                let delay = policy.delay_for(attempt);
                warn!(
                    "Rate limited ({err}). Retrying in {}ms (attempt {}/{})",
                    delay.as_millis(),
                    attempt + 1,
                    policy.max_attempts
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
