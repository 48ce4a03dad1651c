// Retry logic: bounded attempts with exponential backoff
use std::time::Duration;
use tracing::{info, warn};

/// Retry decision result
#[derive(Debug, PartialEq, Eq)]
pub enum RetryDecision {
    /// Try again after the backoff delay
    Retry(Duration),
    /// Attempts exhausted, the job has failed permanently
    Exhausted,
}

/// Retry policy
///
/// A job gets `max_retries + 1` attempts in total. After the n-th failed
/// attempt (n starting at 1) the worker waits `base_delay * 2^n` before the
/// next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// Create a new retry policy
    ///
    /// # Arguments
    /// * `max_retries` - Retries allowed after the first attempt
    /// * `base_delay` - Base of the exponential backoff
    ///
    /// # Example
    /// ```text
    /// let policy = RetryPolicy::new(3, Duration::from_millis(500));
    /// // waits 1s, 2s, 4s between the four attempts
    /// ```
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Backoff after the `failed_attempt`-th failure: `base_delay * 2^failed_attempt`
    pub fn backoff(&self, failed_attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(failed_attempt);
        self.base_delay.saturating_mul(factor)
    }

    /// Decide what happens after attempt number `failed_attempt` (1-based) failed
    ///
    /// # Example
    /// ```text
    /// match policy.after_failure(job_id, attempt) {
    ///     RetryDecision::Retry(delay) => sleep(delay).await,
    ///     RetryDecision::Exhausted => mark_error(),
    /// }
    /// ```
    pub fn after_failure(&self, job_id: &str, failed_attempt: u32) -> RetryDecision {
        if failed_attempt >= self.max_attempts() {
            warn!(
                job_id = %job_id,
                attempts = failed_attempt,
                max_retries = self.max_retries,
                "Max retry attempts reached"
            );
            return RetryDecision::Exhausted;
        }

        let delay = self.backoff(failed_attempt);
        info!(
            job_id = %job_id,
            attempt = failed_attempt,
            max_retries = self.max_retries,
            delay_ms = delay.as_millis() as u64,
            "Scheduling retry"
        );
        RetryDecision::Retry(delay)
    }
}
