//! REST API access.
//!
//! [`ApiClient`] handles transport, cookies, CSRF and error mapping;
//! [`resource`] and [`auth`] name the endpoints.

pub mod auth;
mod client;
pub mod envelope;
mod error;
pub mod resource;
pub mod session;

pub use client::{ApiClient, CSRF_HEADER};
pub use envelope::{ListShape, decode_rows, normalize_list};
pub use error::ApiError;
pub use resource::Resource;
pub use session::{CSRF_COOKIE, SessionError, SessionJar};
