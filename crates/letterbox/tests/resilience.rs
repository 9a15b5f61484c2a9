//! Retry, backoff and timeout behaviour of the services against the fake backend.
//!
//! These tests run on tokio's paused clock, so backoff delays are observed
//! exactly without waiting for them.

mod common;

use common::FakeBackend;
use letterbox::{
    CreateTagParams, CreateUserParams, ErrorKind, NewsletterService, NewsletterUpdate, RawFailure,
    RetryPolicy, ServiceConfig, SourceGroupService, TagService, UserService,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn tags(backend: &Arc<FakeBackend>, config: ServiceConfig) -> TagService {
    TagService::new(backend.clone(), config)
}

#[tokio::test(start_paused = true)]
async fn test_persistent_failure_backs_off_exponentially_then_raises() {
    let backend = Arc::new(FakeBackend::new());
    backend.fail("tags.list", RawFailure::message("fetch failed"), 10);

    let started = Instant::now();
    let err = tags(&backend, ServiceConfig::default())
        .list_tags()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(err.message(), "Network error during getTags: fetch failed");
    assert_eq!(backend.calls("tags.list"), 4);
    // 1000 + 2000 + 4000 ms of backoff
    assert_eq!(started.elapsed(), Duration::from_millis(7000));
}

#[tokio::test(start_paused = true)]
async fn test_transient_failure_recovers_within_budget() {
    let backend = Arc::new(FakeBackend::new());
    backend.fail(
        "tags.create",
        RawFailure::http(Some("TimeoutError"), None, Some("request timed out")),
        2,
    );

    let started = Instant::now();
    let envelope = tags(&backend, ServiceConfig::default())
        .create_tag(CreateTagParams {
            name: "Rust".to_string(),
            color: Some("#DEA584".to_string()),
        })
        .await
        .unwrap();

    assert!(envelope.is_success());
    assert_eq!(envelope.data().map(|t| t.color.as_str()), Some("#DEA584"));
    assert_eq!(backend.calls("tags.create"), 3);
    assert_eq!(started.elapsed(), Duration::from_millis(3000));
}

#[tokio::test]
async fn test_validation_failure_never_reaches_backend() {
    let backend = Arc::new(FakeBackend::new());
    let users = UserService::new(backend.clone(), ServiceConfig::default());

    let err = users
        .create_user(CreateUserParams {
            email: "bad".to_string(),
            name: "Ada".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.message(), "Invalid email format");
    assert_eq!(backend.calls("users.create"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_slow_backend_hits_per_attempt_timeout() {
    let backend = Arc::new(FakeBackend::new());
    backend.delay("tags.list", Duration::from_secs(5));
    backend.delay("tags.create", Duration::from_secs(5));

    let config = ServiceConfig::builder()
        .retry(
            RetryPolicy::builder()
                .max_retries(1)
                .base_delay(Duration::from_millis(100))
                .timeout(Duration::from_secs(1))
                .build(),
        )
        .build();
    let service = tags(&backend, config);

    let err = service.list_tags().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert_eq!(err.message(), "Timeout during getTags: no response after 1000ms");
    assert_eq!(backend.calls("tags.list"), 2);

    let envelope = service
        .create_tag(CreateTagParams {
            name: "Rust".to_string(),
            color: None,
        })
        .await
        .unwrap();
    assert_eq!(
        envelope.error(),
        Some("Timeout during createTag: no response after 1000ms")
    );
}

#[tokio::test]
async fn test_retry_predicate_can_stop_early() {
    let backend = Arc::new(FakeBackend::new());
    backend.fail(
        "users.delete",
        RawFailure::http(Some("AuthApiError"), Some(401), Some("Not authenticated")),
        10,
    );

    let config = ServiceConfig::builder()
        .retry(
            RetryPolicy::builder()
                .base_delay(Duration::from_millis(1))
                .retry_if(|error, _| error.kind() != ErrorKind::Unauthorized)
                .build(),
        )
        .build();
    let users = UserService::new(backend.clone(), config);

    let envelope = users.delete_user("u1").await.unwrap();
    assert_eq!(envelope.error(), Some("Not authenticated"));
    assert_eq!(backend.calls("users.delete"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_transient_lookup_failure_before_a_write_is_enveloped() {
    let backend = Arc::new(FakeBackend::new());
    backend.insert_newsletter("n1", "This Week in Rust");
    backend.insert_source("s1", "Rust Weekly");
    backend.fail("newsletters.get_by_id", RawFailure::message("fetch failed"), 10);
    backend.fail("tags.get_by_id", RawFailure::message("fetch failed"), 10);
    backend.fail("sources.get_by_id", RawFailure::message("fetch failed"), 10);

    let newsletters = NewsletterService::new(backend.clone(), backend.clone(), ServiceConfig::default());
    let groups = SourceGroupService::new(backend.clone(), backend.clone(), ServiceConfig::default());

    let liked = newsletters.toggle_like("n1").await.unwrap();
    assert_eq!(liked.error(), Some("Network error during getNewsletter: fetch failed"));

    let tagged = newsletters.update_tags("n1", &["t1"]).await.unwrap();
    assert_eq!(tagged.error(), Some("Network error during getTag: fetch failed"));

    let grown = groups.add_sources("g1", &["s1"]).await.unwrap();
    assert_eq!(grown.error(), Some("Network error during getSource: fetch failed"));

    assert_eq!(backend.calls("newsletters.get_by_id"), 4);
    assert_eq!(backend.calls("tags.get_by_id"), 4);
    assert_eq!(backend.calls("sources.get_by_id"), 4);
    assert_eq!(backend.calls("newsletters.update"), 0);
    assert_eq!(backend.calls("newsletters.set_tags"), 0);
    assert_eq!(backend.calls("groups.add_sources"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_bulk_items_run_with_bounded_concurrency() {
    let backend = Arc::new(FakeBackend::new());
    for id in ["n1", "n2", "n3", "n4"] {
        backend.insert_newsletter(id, "Issue");
    }
    backend.delay("newsletters.update", Duration::from_millis(100));

    let config = ServiceConfig::builder().batch_size(2).build();
    let newsletters = NewsletterService::new(backend.clone(), backend.clone(), config);

    let started = Instant::now();
    let outcome = newsletters
        .bulk_update(&["n1", "n2", "n3", "n4"], &NewsletterUpdate::read(true))
        .await
        .unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.processed_count(), 4);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(200), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(300), "{elapsed:?}");
}
