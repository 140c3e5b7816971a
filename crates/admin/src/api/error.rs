//! API client errors.

use serde_json::Value;
use thiserror::Error;

/// Errors raised at the API client boundary.
///
/// Every variant renders a display-ready message, so callers can show
/// `err.to_string()` inline without inspecting the kind.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("{}", status_message(.status, .message))]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message reported by the server in the error body, if any.
        message: Option<String>,
    },

    /// A 2xx response whose body was not valid JSON.
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// The endpoint URL could not be built.
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl ApiError {
    /// HTTP status code, for errors that carry one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server rejected the session (401 or 403).
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// The message the server put in its error body, if there was one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref, clippy::ref_option)] // called with thiserror's field bindings
fn status_message(status: &u16, message: &Option<String>) -> String {
    message
        .clone()
        .unwrap_or_else(|| format!("HTTP error {status}"))
}

/// Fields checked, in order, for a human-readable error message.
const MESSAGE_FIELDS: [&str; 3] = ["detail", "error", "message"];

/// Pull a human-readable message out of an error response body.
///
/// Understands Django REST framework bodies: `{"detail": ..}`, the login
/// view's `{"error": ..}`, `{"non_field_errors": [..]}` and per-field
/// validation errors such as `{"name": ["This field is required."]}`.
pub(crate) fn extract_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let object = value.as_object()?;

    for field in MESSAGE_FIELDS {
        if let Some(text) = object.get(field).and_then(first_text) {
            return Some(text);
        }
    }

    if let Some(text) = object.get("non_field_errors").and_then(first_text) {
        return Some(text);
    }

    object
        .iter()
        .find_map(|(field, value)| first_text(value).map(|text| format!("{field}: {text}")))
}

/// A non-empty string, or the first non-empty string in an array.
fn first_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_text),
        _ => None,
    }
}
