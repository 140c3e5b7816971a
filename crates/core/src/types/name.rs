//! Required display-name type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`RequiredName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// The input is empty or whitespace only.
    #[error("name cannot be empty")]
    Empty,
}

/// A non-empty, trimmed name (channel name or username).
///
/// ## Examples
///
/// ```
/// use ptt_admin_core::RequiredName;
///
/// assert_eq!(RequiredName::parse("  ops ").unwrap().as_str(), "ops");
/// assert!(RequiredName::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct RequiredName(String);

impl RequiredName {
    /// Parse a `RequiredName`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`NameError::Empty`] if nothing is left after trimming.
    pub fn parse(s: &str) -> Result<Self, NameError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(NameError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the name, returning the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RequiredName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for RequiredName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
