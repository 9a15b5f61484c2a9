//! # Letterbox
//!
//! Domain services for a newsletter reader, built on `letterbox-core`:
//! - Users and subscriptions
//! - Newsletters, with state toggles, tagging and bulk actions
//! - Tags, sources and source groups
//! - Each reader's reading queue
//!
//! Every service validates input before touching the backend, retries
//! transient failures with exponential backoff, and reports mutation failures
//! as an [`Envelope`] instead of an error. Reads raise the classified
//! [`Error`].
//!
//! The backend itself is supplied by the application through the traits in
//! [`ports`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use letterbox::prelude::*;
//! use std::sync::Arc;
//!
//! async fn example(tags: Arc<dyn TagRepository>) -> letterbox::Result<()> {
//!     let service = TagService::new(tags, ServiceConfig::default());
//!
//!     let envelope = service
//!         .create_tag(CreateTagParams {
//!             name: "Rust".to_string(),
//!             color: None,
//!         })
//!         .await?;
//!
//!     match envelope.data() {
//!         Some(tag) => println!("created {}", tag.name),
//!         None => println!("failed: {:?}", envelope.error()),
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// Re-export commonly used types
pub use config::{ServiceConfig, ServiceConfigBuilder};
pub use letterbox_core::{
    BulkItemError, BulkOutcome, BulkSuccessPolicy, Envelope, Error, ErrorKind, RawFailure,
    Result, RetryPolicy,
};
pub use services::{
    NewsletterService, ReadingQueueService, Service, SourceGroupService, SourceService,
    TagService, UserService,
};
pub use types::*;

// Module declarations
pub mod config;
pub mod observability;
pub mod ports;
pub mod services;
pub mod types;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convenient re-exports of commonly used items.
pub mod prelude {
    pub use crate::config::ServiceConfig;
    pub use crate::ports::{
        NewsletterRepository, ReadingQueueRepository, SourceGroupRepository, SourceRepository,
        TagRepository, UserRepository,
    };
    pub use crate::services::{
        NewsletterService, ReadingQueueService, Service, SourceGroupService, SourceService,
        TagService, UserService,
    };
    pub use crate::types::*;
    pub use letterbox_core::prelude::*;
}
