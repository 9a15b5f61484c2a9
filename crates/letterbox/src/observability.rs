//! Structured logging helpers shared by the services
//!
//! Per-attempt retry logging lives in the core retry engine; this module adds
//! the service-level events (bulk summaries, relation checks) and an optional
//! subscriber setup behind the `trace` feature.

use letterbox_core::BulkOutcome;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Timer for measuring operation duration
#[derive(Debug, Clone, Copy)]
pub struct OperationTimer {
    start: Instant,
}

impl OperationTimer {
    /// Start a new timer
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Log the summary of a finished bulk operation.
///
/// Partial failures are logged at `warn`, clean runs at `info`.
pub fn log_bulk_outcome(operation: &str, outcome: &BulkOutcome, timer: &OperationTimer) {
    let elapsed_ms = timer.elapsed().as_millis();
    if outcome.failed_count() == 0 {
        info!(
            operation = %operation,
            processed = outcome.processed_count(),
            elapsed_ms,
            "Bulk operation completed"
        );
    } else {
        warn!(
            operation = %operation,
            processed = outcome.processed_count(),
            failed = outcome.failed_count(),
            success = outcome.is_success(),
            elapsed_ms,
            "Bulk operation completed with failures"
        );
    }
}

/// Log that every referenced entity of a relation operation resolved.
pub fn log_relation_resolved(operation: &str, entity: &str, count: usize) {
    debug!(
        operation = %operation,
        entity = %entity,
        count,
        "Resolved related entities"
    );
}

/// Install a global `fmt` subscriber filtered by `RUST_LOG`.
///
/// Falls back to `info` when `RUST_LOG` is unset or invalid. Does nothing if a
/// global subscriber is already installed.
#[cfg(feature = "trace")]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
