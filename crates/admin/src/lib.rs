//! PTT admin console library.
//!
//! Talks to the console's REST API (Django session auth with CSRF) and
//! models every screen of the console as plain state:
//!
//! - [`api`] - HTTP client, session cookie jar, list envelope adapter, endpoints
//! - [`views`] - list, assignment editor, form dialog, delete confirmation, login form
//! - [`screens`] - the generic management screen composing them for channels and users
//!
//! # Security
//!
//! The session jar holds an authenticated admin session. Its file is written
//! owner-readable only, and passwords are kept in `SecretString`s that are
//! redacted from `Debug` output.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod screens;
pub mod views;

pub use api::{ApiClient, ApiError, SessionJar};
pub use config::ConsoleConfig;
pub use error::ScreenError;
pub use screens::{ChannelScreen, ManagedEntity, ManagementScreen, UserScreen};
