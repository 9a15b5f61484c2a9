//! Error taxonomy for the service layer.
//!
//! Every failure a domain service surfaces is an [`Error`] carrying one of the
//! six [`ErrorKind`]s. Backend failures arrive as loosely-shaped
//! [`RawFailure`]s and are turned into an [`Error`] by [`classify`], which is
//! the only place that inspects their contents.

mod classify;
mod raw;

pub use classify::classify;
pub use raw::{ROW_NOT_FOUND_CODE, RawFailure};

use std::fmt;
use thiserror::Error;

/// Result type alias for service-layer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The closed set of error kinds a classified failure can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller supplied bad input. Never retried.
    Validation,
    /// A referenced entity does not exist.
    NotFound,
    /// Transport-level failure talking to the backend.
    Network,
    /// The backend rejected the caller's credentials.
    Unauthorized,
    /// An attempt exceeded its time budget.
    Timeout,
    /// Anything else the backend reported.
    Service,
}

impl ErrorKind {
    /// Stable name of the kind, as exposed to callers and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "ValidationError",
            Self::NotFound => "NotFoundError",
            Self::Network => "NetworkError",
            Self::Unauthorized => "UnauthorizedError",
            Self::Timeout => "TimeoutError",
            Self::Service => "ServiceError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified service-layer failure.
///
/// The `Display` output is the human message alone, so callers can surface it
/// verbatim (`"Invalid email format"`, `"Tag with ID t1 not found"`).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    code: Option<String>,
    #[source]
    original: Option<Box<RawFailure>>,
}

impl Error {
    /// Create an error of the given kind with a message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            original: None,
        }
    }

    /// Caller input failed validation.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// An entity looked up by ID does not exist.
    ///
    /// Produces `"<Entity> with ID <id> not found"`.
    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::new(
            ErrorKind::NotFound,
            format!("{entity} with ID {id} not found"),
        )
    }

    /// Transport-level failure.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    /// Credentials were rejected.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// An attempt ran out of time.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Catch-all backend failure.
    pub fn service(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Service, message)
    }

    /// Attach a machine-readable code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach the failure this error was classified from.
    pub fn with_original(mut self, original: RawFailure) -> Self {
        self.original = Some(Box::new(original));
        self
    }

    /// The kind tag.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The human message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The machine code, if the backend supplied one.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// The raw failure this error was classified from, if any.
    pub fn original(&self) -> Option<&RawFailure> {
        self.original.as_deref()
    }

    /// Whether the retry engine may re-attempt after this error.
    ///
    /// Only validation failures are terminal by default; a retry policy can
    /// narrow this further with its own predicate.
    pub fn is_retryable(&self) -> bool {
        self.kind != ErrorKind::Validation
    }

    /// Message used when this error is folded into a result envelope.
    ///
    /// Catch-all backend errors get an `"Error during <operation>: "` prefix so
    /// the inline message says which action failed; every other kind already
    /// carries a complete message.
    pub fn envelope_message(&self, operation: &str) -> String {
        match self.kind {
            ErrorKind::Service => format!("Error during {operation}: {}", self.message),
            _ => self.message.clone(),
        }
    }
}
