//! Example: retrying backend calls through a `ServiceCore`
//!
//! This example demonstrates:
//! 1. A read that recovers after transient failures
//! 2. A mutation whose failure comes back as an envelope
//! 3. A retry predicate that gives up on auth failures immediately
//!
//! Run with:
//! ```bash
//! cargo run -p letterbox-core --example retry_example
//! ```

use letterbox_core::prelude::*;
use std::error::Error as StdError;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

/// A simulated backend table that fails the first few calls
struct FlakyTable {
    attempts: AtomicU32,
    fail_count: u32,
    failure: RawFailure,
}

impl FlakyTable {
    fn new(fail_count: u32, failure: RawFailure) -> Self {
        Self {
            attempts: AtomicU32::new(0),
            fail_count,
            failure,
        }
    }

    async fn select(&self) -> std::result::Result<Vec<String>, RawFailure> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.fail_count {
            println!("  Attempt {}: FAILED ({})", attempt + 1, self.failure);
            Err(self.failure.clone())
        } else {
            println!("  Attempt {}: SUCCESS", attempt + 1);
            Ok(vec!["Rust".to_string(), "Go".to_string()])
        }
    }

    fn total_attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

fn policy() -> RetryPolicy {
    RetryPolicy::builder()
        .max_retries(3)
        .base_delay(Duration::from_millis(100))
        .build()
}

/// Example 1: a read recovers after two network failures
async fn example_read_recovers() -> std::result::Result<(), Box<dyn StdError>> {
    println!("\n=== Example 1: Read recovers after transient failures ===\n");

    let core = ServiceCore::new("tags", policy());
    let table = FlakyTable::new(2, RawFailure::message("fetch failed"));

    let start = Instant::now();
    let tags = core.read("getTags", || table.select()).await?;

    println!("\nResult: {tags:?}");
    println!("Total attempts: {}", table.total_attempts());
    println!("Total time: {:?} (expected ~300ms of backoff)", start.elapsed());
    Ok(())
}

/// Example 2: a mutation that keeps failing is reported, not raised
async fn example_mutation_envelope() {
    println!("\n=== Example 2: Mutation failure becomes an envelope ===\n");

    let core = ServiceCore::new("tags", policy());
    let table = FlakyTable::new(u32::MAX, RawFailure::message("duplicate key value"));

    let envelope = core.mutate("createTag", || table.select()).await;

    println!("\nsuccess: {}", envelope.is_success());
    println!("error:   {:?}", envelope.error());
}

/// Example 3: auth failures are not worth retrying
async fn example_predicate() {
    println!("\n=== Example 3: Retry predicate ===\n");

    let policy = RetryPolicy::builder()
        .max_retries(3)
        .base_delay(Duration::from_millis(100))
        .retry_if(|error, _| error.kind() != ErrorKind::Unauthorized)
        .build();
    let core = ServiceCore::new("tags", policy);
    let table = FlakyTable::new(
        u32::MAX,
        RawFailure::http(Some("AuthApiError"), Some(401), Some("JWT expired")),
    );

    match core.read("getTags", || table.select()).await {
        Ok(_) => println!("unexpected success"),
        Err(error) => println!("\n{}: {error} after {} attempt(s)", error.kind(), table.total_attempts()),
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn StdError>> {
    example_read_recovers().await?;
    example_mutation_envelope().await;
    example_predicate().await;
    Ok(())
}
