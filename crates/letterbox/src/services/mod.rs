//! Domain services
//!
//! One service per entity. Every service validates its input, runs the
//! backend call through its [`ServiceCore`] and settles it as a read (errors
//! raised) or a mutation (errors enveloped).

pub mod newsletters;
pub mod queue;
pub mod source_groups;
pub mod sources;
pub mod tags;
pub mod users;

pub use newsletters::NewsletterService;
pub use queue::ReadingQueueService;
pub use source_groups::SourceGroupService;
pub use sources::SourceService;
pub use tags::TagService;
pub use users::UserService;

use crate::config::ServiceConfig;
use letterbox_core::{Envelope, Error, ErrorKind, Result, ServiceCore};

/// Base trait for domain services.
pub trait Service {
    /// The retry engine and logging context of this instance.
    fn core(&self) -> &ServiceCore;

    /// The configuration this instance was built with.
    fn config(&self) -> &ServiceConfig;
}

/// Shared builder methods and the [`Service`] impl for a service struct with
/// `core` and `config` fields.
macro_rules! impl_service {
    ($service:ident) => {
        impl $service {
            /// Replace the sleeper used between retry attempts.
            pub fn with_sleeper(
                mut self,
                sleeper: ::std::sync::Arc<dyn ::letterbox_core::retry::Sleeper>,
            ) -> Self {
                self.core = self.core.with_sleeper(sleeper);
                self
            }

            /// Log every operation under `span`.
            pub fn with_span(mut self, span: ::tracing::Span) -> Self {
                self.core = self.core.with_span(span);
                self
            }
        }

        impl $crate::services::Service for $service {
            fn core(&self) -> &::letterbox_core::ServiceCore {
                &self.core
            }

            fn config(&self) -> &$crate::config::ServiceConfig {
                &self.config
            }
        }
    };
}

pub(crate) use impl_service;

/// Settle a failed lookup that ran ahead of a mutation.
///
/// An unresolved reference is the caller's mistake and is raised. Anything
/// else the backend did wrong is enveloped like a failed write.
pub(crate) fn settle_pre_read<T>(operation: &str, error: Error) -> Result<Envelope<T>> {
    match error.kind() {
        ErrorKind::NotFound => Err(error),
        _ => Ok(Envelope::failed(error.envelope_message(operation))),
    }
}
