use super::policy::RetryPolicy;
use super::sleeper::{Sleeper, TokioSleeper};
use crate::error::{RawFailure, Result, classify};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

/// Runs one backend operation under a [`RetryPolicy`].
///
/// Failures are classified on every attempt. Validation errors, errors the
/// policy refuses, and failures once `max_retries` retries have been spent are
/// returned immediately; anything else is retried after
/// [`RetryPolicy::next_delay`]. The error returned after exhaustion is the one
/// produced by the last attempt.
///
/// # Examples
///
/// ```rust
/// use letterbox_core::error::RawFailure;
/// use letterbox_core::retry::{RetryEngine, RetryPolicy};
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
///
/// # async fn example() -> letterbox_core::Result<()> {
/// let engine = RetryEngine::new(
///     RetryPolicy::builder()
///         .base_delay(Duration::from_millis(10))
///         .build(),
/// );
///
/// let calls = AtomicU32::new(0);
/// let value = engine
///     .execute("getNewsletters", || async {
///         if calls.fetch_add(1, Ordering::SeqCst) == 0 {
///             Err(RawFailure::message("fetch failed"))
///         } else {
///             Ok(42)
///         }
///     })
///     .await?;
/// assert_eq!(value, 42);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RetryEngine {
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl RetryEngine {
    /// Create an engine that sleeps on the tokio timer.
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Replace the sleeper used between attempts.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// The policy this engine applies.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Invoke `operation` until it succeeds or the policy gives up.
    ///
    /// `name` identifies the operation in error messages and logs.
    pub async fn execute<T, F, Fut>(&self, name: &str, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = std::result::Result<T, RawFailure>>,
    {
        let max_retries = self.policy.max_retries();
        let mut attempt = 0;

        loop {
            let outcome = match self.policy.timeout() {
                Some(limit) => match tokio::time::timeout(limit, operation()).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(RawFailure::Elapsed { after: limit }),
                },
                None => operation().await,
            };

            match outcome {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(operation = %name, attempts = attempt + 1, "Operation recovered after retry");
                    }
                    return Ok(value);
                }
                Err(raw) => {
                    let error = classify(raw, name);

                    if attempt >= max_retries || !self.policy.should_retry(&error, attempt) {
                        debug!(
                            operation = %name,
                            attempts = attempt + 1,
                            kind = %error.kind(),
                            error = %error,
                            "Operation failed"
                        );
                        return Err(error);
                    }

                    let delay = self.policy.next_delay(attempt);
                    warn!(
                        operation = %name,
                        attempt = attempt + 1,
                        max_attempts = max_retries + 1,
                        kind = %error.kind(),
                        delay_ms = delay.as_millis(),
                        error = %error,
                        "Attempt failed, retrying"
                    );
                    self.sleeper.sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryEngine {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl fmt::Debug for RetryEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryEngine")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
