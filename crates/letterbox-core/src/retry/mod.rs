//! Retry engine with exponential backoff.
//!
//! Every backend call a domain service makes goes through a [`RetryEngine`].
//! The engine classifies each failure, stops immediately on validation errors,
//! and otherwise retries up to [`RetryPolicy::max_retries`] times, waiting
//! `base_delay * backoff_multiplier^attempt` between attempts.
//!
//! # Key Types
//!
//! - [`RetryPolicy`] - attempt bounds, delays and optional per-attempt timeout
//! - [`RetryEngine`] - runs an operation under a policy
//! - [`Sleeper`] - how the engine waits; swap it out in tests
//!
//! # Examples
//!
//! ```rust
//! use letterbox_core::error::RawFailure;
//! use letterbox_core::retry::{RetryEngine, RetryPolicy};
//! use std::time::Duration;
//!
//! # async fn example() -> letterbox_core::Result<()> {
//! let engine = RetryEngine::new(
//!     RetryPolicy::builder()
//!         .max_retries(3)
//!         .base_delay(Duration::from_millis(100))
//!         .build(),
//! );
//!
//! let tags = engine
//!     .execute("listTags", || async { Ok::<_, RawFailure>(vec!["rust"]) })
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod engine;
mod policy;
mod sleeper;

pub use engine::RetryEngine;
pub use policy::{RetryPolicy, RetryPolicyBuilder, RetryPredicate};
pub use sleeper::{RecordingSleeper, Sleeper, TokioSleeper};
