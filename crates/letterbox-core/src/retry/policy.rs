//! Retry policy: attempt bounds, exponential delays, per-attempt timeout.

use crate::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Predicate deciding whether a classified error may be retried.
///
/// Receives the error and the 0-indexed attempt that produced it.
pub type RetryPredicate = Arc<dyn Fn(&Error, u32) -> bool + Send + Sync>;

/// How a service retries failed backend calls.
///
/// Delays grow exponentially: `base_delay * backoff_multiplier^attempt`,
/// capped at `max_delay`. Jitter is off by default so delays are exact.
///
/// # Mathematical Formula
///
/// For attempt `n` (0-indexed, the initial attempt is 0):
/// ```text
/// base = base_delay * (backoff_multiplier ^ n)
/// jittered = base + base * jitter * random(-1.0, +1.0)
/// delay = min(jittered, max_delay)
/// ```
///
/// # Examples
///
/// ```rust
/// use letterbox_core::retry::RetryPolicy;
/// use std::time::Duration;
///
/// // Defaults: 3 retries, 1s base delay, doubling, no per-attempt timeout
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.next_delay(2), Duration::from_secs(4));
///
/// let policy = RetryPolicy::builder()
///     .max_retries(5)
///     .base_delay(Duration::from_millis(200))
///     .timeout(Duration::from_secs(10))
///     .build();
/// assert_eq!(policy.max_retries(), 5);
/// ```
#[derive(Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
    backoff_multiplier: f64,
    max_delay: Duration,
    jitter: f64,
    timeout: Option<Duration>,
    retry_if: Option<RetryPredicate>,
}

impl RetryPolicy {
    /// Create a new builder for configuring a retry policy.
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self::builder().max_retries(0).build()
    }

    /// Maximum number of retries after the initial attempt.
    ///
    /// With `max_retries() == 3` a persistently failing operation runs 4 times.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay before the first retry.
    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Growth factor applied per attempt.
    pub fn backoff_multiplier(&self) -> f64 {
        self.backoff_multiplier
    }

    /// Per-attempt time budget, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Delay to wait after `attempt` failed, before the next attempt.
    pub fn next_delay(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let base = self.base_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);

        let jittered = if self.jitter > 0.0 {
            // Spread over [base * (1 - jitter), base * (1 + jitter)]
            base + base * self.jitter * (rand::random::<f64>() - 0.5) * 2.0
        } else {
            base
        };

        let capped = jittered.min(self.max_delay.as_secs_f64()).max(0.0);
        if capped.is_finite() {
            Duration::from_secs_f64(capped)
        } else {
            self.max_delay
        }
    }

    /// Whether `error`, produced by `attempt`, may be retried.
    ///
    /// Validation errors are never retried. Attempt exhaustion is checked
    /// separately by the engine.
    pub fn should_retry(&self, error: &Error, attempt: u32) -> bool {
        if !error.is_retryable() {
            return false;
        }
        match &self.retry_if {
            Some(predicate) => predicate(error, attempt),
            None => true,
        }
    }
}

impl Default for RetryPolicy {
    /// Defaults:
    /// - `max_retries`: 3
    /// - `base_delay`: 1s
    /// - `backoff_multiplier`: 2.0
    /// - `max_delay`: 60s
    /// - `jitter`: 0.0
    /// - `timeout`: none
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("backoff_multiplier", &self.backoff_multiplier)
            .field("max_delay", &self.max_delay)
            .field("jitter", &self.jitter)
            .field("timeout", &self.timeout)
            .field("retry_if", &self.retry_if.as_ref().map(|_| "<predicate>"))
            .finish()
    }
}

/// Builder for [`RetryPolicy`].
///
/// Unset parameters fall back to the defaults listed on [`RetryPolicy::default`].
#[derive(Default)]
pub struct RetryPolicyBuilder {
    max_retries: Option<u32>,
    base_delay: Option<Duration>,
    backoff_multiplier: Option<f64>,
    max_delay: Option<Duration>,
    jitter: Option<f64>,
    timeout: Option<Duration>,
    retry_if: Option<RetryPredicate>,
}

impl RetryPolicyBuilder {
    /// Set the maximum number of retries. Default: 3
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Set the delay before the first retry. Default: 1s
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = Some(delay);
        self
    }

    /// Set the exponential multiplier. Default: 2.0
    pub fn backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = Some(multiplier);
        self
    }

    /// Cap every delay at `delay`. Default: 60s
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = Some(delay);
        self
    }

    /// Set the jitter factor, clamped to `0.0..=1.0`. Default: 0.0
    pub fn jitter(mut self, jitter: f64) -> Self {
        self.jitter = Some(jitter.clamp(0.0, 1.0));
        self
    }

    /// Race every attempt against `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Only retry errors for which `predicate` returns `true`.
    ///
    /// Validation errors stay terminal regardless of the predicate.
    pub fn retry_if<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&Error, u32) -> bool + Send + Sync + 'static,
    {
        self.retry_if = Some(Arc::new(predicate));
        self
    }

    /// Build the policy.
    pub fn build(self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries.unwrap_or(3),
            base_delay: self.base_delay.unwrap_or(Duration::from_millis(1000)),
            backoff_multiplier: self.backoff_multiplier.unwrap_or(2.0),
            max_delay: self.max_delay.unwrap_or(Duration::from_secs(60)),
            jitter: self.jitter.unwrap_or(0.0),
            timeout: self.timeout,
            retry_if: self.retry_if,
        }
    }
}
