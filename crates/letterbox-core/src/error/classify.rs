use super::{Error, RawFailure};

const NETWORK_TOKENS: &[&str] = &["networkerror", "fetch failed", "network error"];
const TIMEOUT_TOKENS: &[&str] = &["timeouterror", "timed out", "timeout"];
const UNAUTHORIZED_TOKENS: &[&str] = &["401", "unauthorized", "not authenticated"];

/// Map a raw data-access failure to a classified [`Error`].
///
/// Rules are checked in order and the first match wins:
///
/// 1. an already classified error passes through untouched;
/// 2. network tokens (`NetworkError`, `fetch failed`, `Network error`) give a
///    [`Network`](super::ErrorKind::Network) error prefixed with
///    `"Network error during <operation>: "`;
/// 3. timeout tokens (`TimeoutError`, `timed out`, `timeout`) or an elapsed
///    per-attempt timer give a [`Timeout`](super::ErrorKind::Timeout) error;
/// 4. status 401 or `401` / `Unauthorized` / `Not authenticated` give an
///    [`Unauthorized`](super::ErrorKind::Unauthorized) error;
/// 5. everything else becomes a [`Service`](super::ErrorKind::Service) error
///    carrying the original message.
///
/// Token matching looks at both the failure name and message and ignores
/// case. Not-found errors are never inferred here: services raise them
/// explicitly and they arrive through rule 1.
///
/// # Examples
///
/// ```
/// use letterbox_core::error::{classify, ErrorKind, RawFailure};
///
/// let error = classify(RawFailure::message("fetch failed"), "getNewsletters");
/// assert_eq!(error.kind(), ErrorKind::Network);
/// assert_eq!(error.message(), "Network error during getNewsletters: fetch failed");
/// ```
pub fn classify(raw: RawFailure, operation: &str) -> Error {
    match raw {
        RawFailure::Classified(error) => error,
        RawFailure::Elapsed { after } => Error::timeout(format!(
            "Timeout during {operation}: no response after {}ms",
            after.as_millis()
        ))
        .with_original(raw),
        _ => classify_backend(raw, operation),
    }
}

fn classify_backend(raw: RawFailure, operation: &str) -> Error {
    let message = raw.description();
    let haystack = format!("{} {}", raw.name().unwrap_or_default(), message).to_lowercase();

    let error = if contains_any(&haystack, NETWORK_TOKENS) {
        Error::network(format!("Network error during {operation}: {message}"))
    } else if contains_any(&haystack, TIMEOUT_TOKENS) {
        Error::timeout(format!("Timeout during {operation}: {message}"))
    } else if raw.status() == Some(401) || contains_any(&haystack, UNAUTHORIZED_TOKENS) {
        Error::unauthorized(message)
    } else {
        Error::service(message)
    };

    let error = match raw.code() {
        Some(code) => error.with_code(code),
        None => error,
    };
    error.with_original(raw)
}

fn contains_any(haystack: &str, tokens: &[&str]) -> bool {
    tokens.iter().any(|token| haystack.contains(token))
}
