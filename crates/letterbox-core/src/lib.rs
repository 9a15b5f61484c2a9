#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core building blocks for Letterbox domain services.
//!
//! Every domain service (users, newsletters, tags, sources, source groups,
//! reading queue) is assembled from the same four pieces:
//!
//! - **Validation** via [`validation`]: fixed-message checks that run before
//!   any backend call and never consume retry budget
//! - **Error classification** via [`error::classify`]: maps loosely shaped
//!   backend failures onto six stable [`ErrorKind`]s
//! - **Retries** via [`RetryEngine`]: exponential backoff bounded by a
//!   per-service [`RetryPolicy`], with an injectable [`Sleeper`](retry::Sleeper)
//! - **Envelopes** via [`Envelope`] and [`BulkOutcome`]: mutations report
//!   failures as data instead of raising
//!
//! [`ServiceCore`] ties them together behind one `invoke` helper.
//!
//! # Examples
//!
//! ```rust
//! use letterbox_core::prelude::*;
//! use std::time::Duration;
//!
//! # async fn example() -> letterbox_core::Result<()> {
//! let core = ServiceCore::new(
//!     "tags",
//!     RetryPolicy::builder()
//!         .max_retries(3)
//!         .base_delay(Duration::from_millis(100))
//!         .build(),
//! );
//!
//! let envelope = core
//!     .mutate("deleteTag", || async { Ok::<_, RawFailure>(true) })
//!     .await;
//! assert!(envelope.is_success());
//! # Ok(())
//! # }
//! ```

pub mod envelope;
pub mod error;
pub mod retry;
pub mod service;
pub mod validation;

pub use envelope::{BulkItemError, BulkOutcome, BulkSuccessPolicy, Envelope};
pub use error::{Error, ErrorKind, RawFailure, Result};
pub use retry::{RetryEngine, RetryPolicy};
pub use service::{OperationKind, ServiceCore};

/// Convenient re-exports of commonly used items.
///
/// ```rust
/// use letterbox_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::envelope::{BulkOutcome, BulkSuccessPolicy, Envelope};
    pub use crate::error::{Error, ErrorKind, RawFailure, Result};
    pub use crate::retry::{RetryEngine, RetryPolicy, Sleeper};
    pub use crate::service::{OperationKind, ServiceCore};
    pub use crate::validation;
}
