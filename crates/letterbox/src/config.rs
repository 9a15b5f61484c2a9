//! Configuration for the Letterbox services

use letterbox_core::RetryPolicy;
use std::time::Duration;

/// Per-service options, fixed for the lifetime of a service instance.
///
/// Every service receives its own copy at construction; nothing here is
/// shared or mutated afterwards.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Whether UI callers may apply mutations before the backend confirms them
    pub enable_optimistic_updates: bool,

    /// How long callers may cache read results
    pub cache_timeout: Duration,

    /// Maximum number of bulk items in flight at once
    pub batch_size: usize,

    /// Retry policy applied to every backend call
    pub retry: RetryPolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            enable_optimistic_updates: true,
            cache_timeout: Duration::from_secs(5 * 60),
            batch_size: 10,
            retry: RetryPolicy::default(),
        }
    }
}

impl ServiceConfig {
    /// Start a [`ServiceConfigBuilder`] from the defaults.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::new()
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file is read first if present. This will look for:
    /// - `LETTERBOX_MAX_RETRIES` for the retry budget
    /// - `LETTERBOX_BASE_DELAY_MS` for the first backoff delay
    /// - `LETTERBOX_BACKOFF_MULTIPLIER` for the delay growth factor
    /// - `LETTERBOX_TIMEOUT_MS` for the per-attempt timeout
    /// - `LETTERBOX_BATCH_SIZE` for bulk concurrency
    /// - `LETTERBOX_CACHE_TIMEOUT_SECS` for the cache timeout
    /// - `LETTERBOX_OPTIMISTIC_UPDATES` (`true`/`false`)
    ///
    /// Unparseable values are ignored and the default is kept.
    #[cfg(feature = "env")]
    pub fn from_env() -> Self {
        use std::env;

        let _ = dotenvy::dotenv();

        let mut config = Self::default();
        let mut retry = RetryPolicy::builder();

        if let Ok(raw) = env::var("LETTERBOX_MAX_RETRIES")
            && let Ok(max_retries) = raw.trim().parse::<u32>()
        {
            retry = retry.max_retries(max_retries);
        }

        if let Ok(raw) = env::var("LETTERBOX_BASE_DELAY_MS")
            && let Ok(millis) = raw.trim().parse::<u64>()
        {
            retry = retry.base_delay(Duration::from_millis(millis));
        }

        if let Ok(raw) = env::var("LETTERBOX_BACKOFF_MULTIPLIER")
            && let Ok(multiplier) = raw.trim().parse::<f64>()
            && multiplier.is_finite()
            && multiplier >= 1.0
        {
            retry = retry.backoff_multiplier(multiplier);
        }

        if let Ok(raw) = env::var("LETTERBOX_TIMEOUT_MS")
            && let Ok(millis) = raw.trim().parse::<u64>()
            && millis > 0
        {
            retry = retry.timeout(Duration::from_millis(millis));
        }

        if let Ok(raw) = env::var("LETTERBOX_BATCH_SIZE")
            && let Ok(batch_size) = raw.trim().parse::<usize>()
            && batch_size > 0
        {
            config.batch_size = batch_size;
        }

        if let Ok(raw) = env::var("LETTERBOX_CACHE_TIMEOUT_SECS")
            && let Ok(secs) = raw.trim().parse::<u64>()
        {
            config.cache_timeout = Duration::from_secs(secs);
        }

        if let Ok(raw) = env::var("LETTERBOX_OPTIMISTIC_UPDATES")
            && let Ok(enabled) = raw.trim().parse::<bool>()
        {
            config.enable_optimistic_updates = enabled;
        }

        config.retry = retry.build();
        config
    }
}

/// Builder for creating [`ServiceConfig`] with a fluent API.
#[derive(Debug, Default)]
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable optimistic updates.
    pub fn enable_optimistic_updates(mut self, enabled: bool) -> Self {
        self.config.enable_optimistic_updates = enabled;
        self
    }

    /// Set the cache timeout.
    pub fn cache_timeout(mut self, timeout: Duration) -> Self {
        self.config.cache_timeout = timeout;
        self
    }

    /// Set the bulk concurrency. Zero is raised to one.
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.config.batch_size = batch_size.max(1);
        self
    }

    /// Set the retry policy.
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.config.retry = policy;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ServiceConfig {
        self.config
    }
}
