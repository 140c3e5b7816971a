//! Login form state.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use crate::api::{ApiClient, ApiError, auth};

/// Shown when a login fails without a server message.
pub const LOGIN_FAILED: &str = "Login failed";

/// Shown when the form is submitted with a blank field.
pub const LOGIN_INCOMPLETE: &str = "Username and password are required";

/// Username/password form.
pub struct LoginForm {
    pub username: String,
    pub password: SecretString,
    error: Option<String>,
    submitting: bool,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: SecretString::from(""),
            error: None,
            submitting: false,
        }
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("error", &self.error)
            .field("submitting", &self.submitting)
            .finish()
    }
}

impl LoginForm {
    #[must_use]
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
            ..Self::default()
        }
    }

    /// Whether the submit control is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.submitting
            && !self.username.trim().is_empty()
            && !self.password.expose_secret().is_empty()
    }

    /// Inline error from the last attempt.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Attempt a login. On failure the form keeps its fields and shows the
    /// server's message.
    ///
    /// Returns whether the session was established; `false` without a
    /// request when the form cannot be submitted, with [`LOGIN_INCOMPLETE`]
    /// as the error if a field is blank.
    #[instrument(skip(self, client), fields(username = %self.username))]
    pub async fn submit(&mut self, client: &ApiClient) -> bool {
        if !self.can_submit() {
            if !self.submitting {
                self.error = Some(LOGIN_INCOMPLETE.to_owned());
            }
            return false;
        }
        self.submitting = true;
        self.error = None;

        let result = auth::login(client, self.username.trim(), &self.password).await;
        self.submitting = false;

        match result {
            Ok(()) => true,
            Err(e) => {
                self.error = Some(failure_message(&e));
                false
            }
        }
    }
}

/// Message shown for a failed login.
#[must_use]
pub fn failure_message(err: &ApiError) -> String {
    match err {
        ApiError::Status { .. } => err.server_message().unwrap_or(LOGIN_FAILED).to_owned(),
        other => other.to_string(),
    }
}
