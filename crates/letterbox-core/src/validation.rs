//! Input validation and sanitization.
//!
//! Every domain service runs its parameters through these functions before any
//! backend call is made. Each check either returns the sanitized value
//! (trimmed, emails lower-cased) or a [`Validation`](crate::error::ErrorKind::Validation)
//! error with a fixed, caller-visible message.
//!
//! Labels are passed in the exact casing the message should use, so
//! `required(value, "Group name")` fails with `"Group name is required"`.
//!
//! # Examples
//!
//! ```
//! use letterbox_core::validation;
//!
//! let email = validation::email("  Reader@Example.COM ")?;
//! assert_eq!(email, "reader@example.com");
//!
//! let err = validation::length_between("A", "Group name", 2, 100).unwrap_err();
//! assert_eq!(err.message(), "Group name must be between 2 and 100 characters");
//! # Ok::<(), letterbox_core::Error>(())
//! ```

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

static HEX_COLOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("color pattern compiles"));

fn reject(label: &str, message: String) -> Error {
    debug!(field = %label, reason = %message, "Input validation failed");
    Error::validation(message)
}

/// Require a non-blank string and return it trimmed.
///
/// Fails with `"<label> is required"`.
pub fn required(value: &str, label: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(reject(label, format!("{label} is required")));
    }
    Ok(trimmed.to_owned())
}

/// Require a non-blank identifier and return it trimmed.
///
/// Fails with `"<label> ID is required"`.
pub fn required_id(value: &str, label: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(reject(label, format!("{label} ID is required")));
    }
    Ok(trimmed.to_owned())
}

/// Require a string whose trimmed length (in characters) lies in `min..=max`.
///
/// Blank input fails with `"<label> is required"`; anything outside the bounds
/// fails with `"<label> must be between <min> and <max> characters"`.
pub fn length_between(value: &str, label: &str, min: usize, max: usize) -> Result<String> {
    let trimmed = required(value, label)?;
    let len = trimmed.chars().count();
    if len < min || len > max {
        return Err(reject(
            label,
            format!("{label} must be between {min} and {max} characters"),
        ));
    }
    Ok(trimmed)
}

/// Validate an email address and return it trimmed and lower-cased.
///
/// Blank input fails with `"Email is required"`, anything that is not shaped
/// like `local@domain.tld` with `"Invalid email format"`.
pub fn email(value: &str) -> Result<String> {
    let trimmed = required(value, "Email")?;
    if !EMAIL_PATTERN.is_match(&trimmed) {
        return Err(reject("Email", "Invalid email format".to_owned()));
    }
    Ok(trimmed.to_lowercase())
}

/// Validate an `http`/`https` URL with a non-empty host.
///
/// Other schemes (`javascript:`, `ftp:`, `data:` …) and unparsable input fail
/// with `"Invalid <field> format"`.
pub fn url(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    let invalid = || reject(field, format!("Invalid {field} format"));

    let parsed = url::Url::parse(trimmed).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(trimmed.to_owned()),
        _ => Err(invalid()),
    }
}

/// Require at least one element.
///
/// Fails with `"<label> array cannot be empty"`.
pub fn non_empty<T>(items: &[T], label: &str) -> Result<()> {
    if items.is_empty() {
        return Err(reject(label, format!("{label} array cannot be empty")));
    }
    Ok(())
}

/// Validate a list of identifiers.
///
/// Every element must be non-blank, otherwise the call fails with
/// `"All <field> must be non-empty strings"`. When `require_one` is set an
/// empty list fails with `"<label> array cannot be empty"`. Elements are
/// returned trimmed, in order.
pub fn id_list<S: AsRef<str>>(
    ids: &[S],
    label: &str,
    field: &str,
    require_one: bool,
) -> Result<Vec<String>> {
    if require_one {
        non_empty(ids, label)?;
    }

    ids.iter()
        .map(|id| {
            let trimmed = id.as_ref().trim();
            if trimmed.is_empty() {
                Err(reject(
                    label,
                    format!("All {field} must be non-empty strings"),
                ))
            } else {
                Ok(trimmed.to_owned())
            }
        })
        .collect()
}

/// Require `value` to be one of `allowed`, comparing after trimming.
///
/// Fails with `"Invalid <field>"`.
pub fn one_of<'a>(value: &str, field: &str, allowed: &[&'a str]) -> Result<&'a str> {
    let trimmed = value.trim();
    allowed
        .iter()
        .find(|candidate| **candidate == trimmed)
        .copied()
        .ok_or_else(|| reject(field, format!("Invalid {field}")))
}

/// Require a `#RRGGBB` hex color.
///
/// Fails with `"Invalid <field>"`.
pub fn hex_color(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if !HEX_COLOR_PATTERN.is_match(trimmed) {
        return Err(reject(field, format!("Invalid {field}")));
    }
    Ok(trimmed.to_owned())
}

/// Validate an optional field only when present.
pub fn optional<T, F>(value: Option<&str>, check: F) -> Result<Option<T>>
where
    F: FnOnce(&str) -> Result<T>,
{
    value.map(check).transpose()
}
