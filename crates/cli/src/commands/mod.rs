//! Command implementations.

use std::sync::Arc;

use ptt_admin::api::SessionError;
use ptt_admin::{ApiClient, ApiError, ConsoleConfig, ScreenError, SessionJar};
use thiserror::Error;

pub mod auth;
pub mod channels;
mod output;
pub mod records;
pub mod users;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// The session file could not be read or written.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// An API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A screen action failed.
    #[error(transparent)]
    Screen(#[from] ScreenError),

    /// A list could not be loaded.
    #[error("{message} ({source})")]
    Load {
        message: String,
        source: ApiError,
    },

    /// Writing output or reading the prompt failed.
    #[error("Terminal error: {0}")]
    Io(#[from] std::io::Error),

    /// No password given on the command line or in the environment.
    #[error("Password required: pass -p or set PTT_ADMIN_PASSWORD")]
    MissingPassword,

    /// The server refused the login.
    #[error("{0}")]
    LoginFailed(String),

    /// A related id on the command line is not known to the server.
    #[error("No {kind} with id {id}")]
    UnknownRelated { kind: &'static str, id: String },
}

impl CliError {
    /// Whether the failure means the session is missing or expired.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        match self {
            Self::Api(e) | Self::Load { source: e, .. } => e.is_unauthorized(),
            Self::Screen(e) => e.is_unauthorized(),
            _ => false,
        }
    }
}

/// Everything a command needs: configuration, the persisted session and a
/// client using it.
pub struct Context {
    config: ConsoleConfig,
    client: ApiClient,
}

impl Context {
    /// Load the session jar and build the client.
    ///
    /// # Errors
    ///
    /// Returns `CliError` if the session file is unreadable or the client
    /// cannot be built.
    pub fn open(config: ConsoleConfig) -> Result<Self, CliError> {
        let jar = Arc::new(SessionJar::load(&config.session_file)?);
        tracing::debug!(
            session_file = %config.session_file.display(),
            logged_in = !jar.is_empty(),
            "Session loaded"
        );
        let client = ApiClient::new(&config, jar)?;
        Ok(Self { config, client })
    }

    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Write the session jar back to disk.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Session` if the file cannot be written.
    pub fn save(&self) -> Result<(), CliError> {
        self.client.session().save(&self.config.session_file)?;
        Ok(())
    }
}
