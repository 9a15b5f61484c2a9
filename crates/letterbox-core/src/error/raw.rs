use super::Error;
use std::fmt;
use std::time::Duration;

/// Code the backend reports when a single-row lookup matched nothing.
pub const ROW_NOT_FOUND_CODE: &str = "PGRST116";

/// A failure as reported by a data-access call, before classification.
///
/// Backends are inconsistent about the shape of their failures: some report
/// `{message, code}`, others `{name, status}`. Data-access adapters pick the
/// variant that matches what they received and leave the interpretation to
/// [`classify`](super::classify).
#[derive(Debug, Clone, PartialEq)]
pub enum RawFailure {
    /// A `{message, code}` shaped failure from the data API.
    Backend {
        /// Human message.
        message: String,
        /// Optional machine code (for example a Postgres or PostgREST code).
        code: Option<String>,
    },
    /// A `{name, status}` shaped failure, typically from the transport or auth layer.
    Http {
        /// Error name such as `"TypeError"` or `"AuthApiError"`.
        name: Option<String>,
        /// HTTP status, when one was received.
        status: Option<u16>,
        /// Human message, when one was provided.
        message: Option<String>,
    },
    /// The attempt was abandoned after its per-attempt timeout.
    Elapsed {
        /// The timeout that elapsed.
        after: Duration,
    },
    /// Already classified upstream; passed through unchanged.
    Classified(Error),
}

impl RawFailure {
    /// A `{message, code}` failure.
    pub fn backend(message: impl Into<String>, code: Option<String>) -> Self {
        Self::Backend {
            message: message.into(),
            code,
        }
    }

    /// A failure that only carries a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self::backend(message, None)
    }

    /// A `{name, status}` failure.
    pub fn http(name: Option<&str>, status: Option<u16>, message: Option<&str>) -> Self {
        Self::Http {
            name: name.map(str::to_owned),
            status,
            message: message.map(str::to_owned),
        }
    }

    /// The backend's "no rows" signal for a single-row lookup.
    pub fn row_not_found() -> Self {
        Self::backend(
            "JSON object requested, multiple (or no) rows returned",
            Some(ROW_NOT_FOUND_CODE.to_owned()),
        )
    }

    /// Machine code carried by the failure, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Backend { code, .. } => code.as_deref(),
            Self::Classified(error) => error.code(),
            Self::Http { .. } | Self::Elapsed { .. } => None,
        }
    }

    /// Whether this is the backend's "no rows" signal.
    pub fn is_row_not_found(&self) -> bool {
        self.code() == Some(ROW_NOT_FOUND_CODE)
    }

    pub(crate) fn name(&self) -> Option<&str> {
        match self {
            Self::Http { name, .. } => name.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => *status,
            _ => None,
        }
    }

    /// Best available human description.
    pub fn description(&self) -> String {
        match self {
            Self::Backend { message, .. } => message.clone(),
            Self::Http {
                name,
                status,
                message,
            } => match (message, name, status) {
                (Some(message), _, _) => message.clone(),
                (None, Some(name), _) => name.clone(),
                (None, None, Some(status)) => format!("HTTP {status}"),
                (None, None, None) => "Unknown error".to_owned(),
            },
            Self::Elapsed { after } => format!("Operation timed out after {after:?}"),
            Self::Classified(error) => error.message().to_owned(),
        }
    }
}

impl fmt::Display for RawFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

impl std::error::Error for RawFailure {}

impl From<Error> for RawFailure {
    fn from(error: Error) -> Self {
        Self::Classified(error)
    }
}
