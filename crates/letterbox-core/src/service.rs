//! Shared plumbing for domain services.
//!
//! A [`ServiceCore`] owns one service's retry engine and logging span. Every
//! public operation on a domain service validates its input first and then
//! goes through [`ServiceCore::invoke`], tagged with an [`OperationKind`] that
//! decides what happens on failure:
//!
//! - [`OperationKind::Read`]: the classified error is returned as `Err`;
//! - [`OperationKind::Mutation`]: the error is folded into a failed
//!   [`Envelope`] and the call still returns `Ok`.

use crate::envelope::{BulkOutcome, BulkSuccessPolicy, Envelope};
use crate::error::{Error, RawFailure, Result};
use crate::retry::{RetryEngine, RetryPolicy, Sleeper};
use futures::StreamExt;
use std::future::Future;
use std::sync::Arc;
use tracing::{Instrument, Span, debug, info_span, warn};

/// What an operation does to the backend, and therefore how it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// get / list / search: failures are raised.
    Read,
    /// create / update / delete / bulk / toggles: failures are enveloped.
    Mutation,
}

/// Retry engine plus logging context for one domain service instance.
///
/// The span is injected rather than looked up globally, so two instances of
/// the same service can log under different contexts.
#[derive(Debug, Clone)]
pub struct ServiceCore {
    name: &'static str,
    engine: RetryEngine,
    span: Span,
}

impl ServiceCore {
    /// Create the core for the service called `name`.
    pub fn new(name: &'static str, policy: RetryPolicy) -> Self {
        Self {
            name,
            engine: RetryEngine::new(policy),
            span: info_span!("service", service = name),
        }
    }

    /// Replace the sleeper used between retry attempts.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.engine = self.engine.with_sleeper(sleeper);
        self
    }

    /// Log every operation under `span` instead of the default service span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// The service name used in logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The retry policy this service applies.
    pub fn policy(&self) -> &RetryPolicy {
        self.engine.policy()
    }

    /// Run `call` through the retry engine and settle it according to `kind`.
    ///
    /// Success always yields `Ok(Envelope::ok(value))`. A read failure yields
    /// `Err(classified)`; a mutation failure yields `Ok(Envelope::failed(..))`
    /// whose message is [`Error::envelope_message`].
    pub async fn invoke<T, F, Fut>(
        &self,
        kind: OperationKind,
        operation: &str,
        call: F,
    ) -> Result<Envelope<T>>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = std::result::Result<T, RawFailure>>,
    {
        let span = self.span.clone();
        async {
            debug!(operation = %operation, ?kind, "Invoking backend");
            match (self.engine.execute(operation, call).await, kind) {
                (Ok(value), _) => Ok(Envelope::ok(value)),
                (Err(error), OperationKind::Read) => Err(error),
                (Err(error), OperationKind::Mutation) => {
                    warn!(
                        operation = %operation,
                        kind = %error.kind(),
                        error = %error,
                        "Mutation failed"
                    );
                    Ok(Envelope::failed(error.envelope_message(operation)))
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Read operation: returns the value or raises the classified error.
    pub async fn read<T, F, Fut>(&self, operation: &str, call: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = std::result::Result<T, RawFailure>>,
    {
        self.invoke(OperationKind::Read, operation, call)
            .await?
            .into_result()
            .map_err(Error::service)
    }

    /// Mutation: never raises, failures come back as a failed envelope.
    pub async fn mutate<T, F, Fut>(&self, operation: &str, call: F) -> Envelope<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = std::result::Result<T, RawFailure>>,
    {
        match self.invoke(OperationKind::Mutation, operation, call).await {
            Ok(envelope) => envelope,
            Err(error) => Envelope::failed(error.envelope_message(operation)),
        }
    }

    /// Single-row lookup that tolerates the backend's "no rows" signal.
    ///
    /// A row-not-found failure resolves to `Ok(None)` without being retried;
    /// any other failure is handled like a [`read`](Self::read).
    pub async fn lookup<T, F, Fut>(&self, operation: &str, call: F) -> Result<Option<T>>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = std::result::Result<Option<T>, RawFailure>>,
    {
        self.read(operation, || {
            let pending = call();
            async move {
                match pending.await {
                    Err(raw) if raw.is_row_not_found() => Ok(None),
                    other => other,
                }
            }
        })
        .await
    }

    /// Lookup that requires the entity to exist.
    ///
    /// A missing row raises `"<entity> with ID <id> not found"`.
    pub async fn fetch<T, F, Fut>(&self, operation: &str, entity: &str, id: &str, call: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = std::result::Result<Option<T>, RawFailure>>,
    {
        self.lookup(operation, call)
            .await?
            .ok_or_else(|| Error::not_found(entity, id))
    }

    /// Run `per_item` once for every ID and aggregate the outcomes.
    ///
    /// Items run with at most `concurrency` in flight. One item's failure,
    /// raised or enveloped, never stops the others.
    pub async fn bulk<T, F, Fut>(
        &self,
        operation: &str,
        policy: BulkSuccessPolicy,
        ids: Vec<String>,
        concurrency: usize,
        per_item: F,
    ) -> BulkOutcome
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<Envelope<T>>>,
    {
        let total = ids.len();
        let results: Vec<(String, std::result::Result<(), String>)> =
            futures::stream::iter(ids)
                .map(|id| {
                    let pending = per_item(id.clone());
                    async move {
                        let settled = match pending.await {
                            Ok(envelope) => envelope.into_result().map(|_| ()),
                            Err(error) => Err(error.to_string()),
                        };
                        (id, settled)
                    }
                })
                .buffered(concurrency.max(1))
                .collect()
                .await;

        let outcome = BulkOutcome::collect(policy, results);
        self.span.in_scope(|| {
            debug!(
                operation = %operation,
                total,
                processed = outcome.processed_count(),
                failed = outcome.failed_count(),
                "Bulk operation finished"
            );
        });
        outcome
    }
}
