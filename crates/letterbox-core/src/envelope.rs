//! Result envelopes returned by mutating operations.
//!
//! Mutations never hand a classified backend error back as `Err`. They fold it
//! into an [`Envelope`] so the caller can show `error` inline and keep going.
//! Bulk mutations aggregate their per-item envelopes into a [`BulkOutcome`].

use serde::Serialize;

/// Outcome of a single mutation: `{success, data?, error?}`.
///
/// The constructors uphold the invariant that `success` is `true` exactly
/// when no error is set, and that a failed envelope never carries data.
///
/// # Examples
///
/// ```
/// use letterbox_core::Envelope;
///
/// let ok = Envelope::ok(3);
/// assert!(ok.is_success());
/// assert_eq!(ok.data(), Some(&3));
///
/// let failed: Envelope<u32> = Envelope::failed("Error during deleteTag: locked");
/// assert!(!failed.is_success());
/// assert_eq!(failed.error(), Some("Error during deleteTag: locked"));
/// assert_eq!(failed.data(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> Envelope<T> {
    /// A successful envelope carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// A failed envelope. A blank message is replaced so `error` is never empty.
    pub fn failed(error: impl Into<String>) -> Self {
        let error = error.into();
        let error = if error.trim().is_empty() {
            "Unknown error".to_owned()
        } else {
            error
        };
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }

    /// Whether the mutation succeeded.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// The mutation's result, present only on success.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// The failure message, present only on failure.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Consume the envelope, keeping only the data.
    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// Convert into a `Result` with the failure message as error.
    pub fn into_result(self) -> Result<T, String> {
        match (self.data, self.error) {
            (Some(data), None) => Ok(data),
            (_, Some(error)) => Err(error),
            (None, None) => Err("Unknown error".to_owned()),
        }
    }

    /// Transform the carried data, keeping failures as they are.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Envelope<U> {
        Envelope {
            success: self.success,
            data: self.data.map(f),
            error: self.error,
        }
    }
}

/// How a bulk operation decides its overall `success` flag.
///
/// Bulk operations disagree on this, so each one states its own policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkSuccessPolicy {
    /// `success` only when no item failed.
    AllSucceeded,
    /// `success` whenever the batch ran to completion; failures are reported
    /// through the counts and `errors`.
    Completed,
}

/// A failed item inside a bulk operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkItemError {
    /// The item's identifier.
    pub id: String,
    /// Why it failed.
    pub error: String,
}

/// Aggregate outcome of a bulk operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOutcome {
    success: bool,
    processed_count: usize,
    failed_count: usize,
    errors: Vec<BulkItemError>,
}

impl BulkOutcome {
    /// Aggregate per-item results under `policy`.
    ///
    /// Each entry pairs an item ID with either success or its error message.
    pub fn collect<I>(policy: BulkSuccessPolicy, results: I) -> Self
    where
        I: IntoIterator<Item = (String, Result<(), String>)>,
    {
        let mut processed_count = 0;
        let mut errors = Vec::new();

        for (id, result) in results {
            match result {
                Ok(()) => processed_count += 1,
                Err(error) => errors.push(BulkItemError { id, error }),
            }
        }

        let failed_count = errors.len();
        let success = match policy {
            BulkSuccessPolicy::AllSucceeded => failed_count == 0,
            BulkSuccessPolicy::Completed => true,
        };

        Self {
            success,
            processed_count,
            failed_count,
            errors,
        }
    }

    /// Overall success flag, as decided by the operation's policy.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Number of items that succeeded.
    pub fn processed_count(&self) -> usize {
        self.processed_count
    }

    /// Number of items that failed.
    pub fn failed_count(&self) -> usize {
        self.failed_count
    }

    /// Per-item failures, in input order.
    pub fn errors(&self) -> &[BulkItemError] {
        &self.errors
    }
}
