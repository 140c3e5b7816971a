//! Unified error handling for the console.

use thiserror::Error;

use crate::api::ApiError;
use crate::views::ValidationError;

/// Errors returned by management screen actions.
///
/// Inline state (dialog error, delete error, list error) is updated before
/// one of these is returned, so a front-end can either render that state or
/// report the error directly.
#[derive(Debug, Clone, Error)]
pub enum ScreenError {
    /// The API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The draft cannot be submitted; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The id is not in the loaded list.
    #[error("No {kind} with id {id}")]
    UnknownRecord {
        /// Record kind, e.g. `channel`.
        kind: &'static str,
        /// The id that was asked for.
        id: String,
    },

    /// Submit was called with no dialog open.
    #[error("No form is open")]
    NoDialog,
}

impl ScreenError {
    /// Whether the server rejected the session.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        match self {
            Self::Api(e) => e.is_unauthorized(),
            _ => false,
        }
    }
}
