//! Session login and logout.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{info, instrument};

use super::client::ApiClient;
use super::error::ApiError;

/// Session login endpoint.
pub const LOGIN_PATH: &str = "/api/auth/login/";

/// Session logout endpoint.
pub const LOGOUT_PATH: &str = "/api/auth/logout/";

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Log in with a username and password.
///
/// On success the server's `Set-Cookie` headers land in the client's
/// session jar.
///
/// # Errors
///
/// Returns `ApiError::Status` with the server's message for rejected
/// credentials, or any other `ApiError` if the request fails.
#[instrument(skip(client, password))]
pub async fn login(
    client: &ApiClient,
    username: &str,
    password: &SecretString,
) -> Result<(), ApiError> {
    let body = LoginRequest {
        username,
        password: password.expose_secret(),
    };
    client.post(LOGIN_PATH, Some(&body)).await?;
    info!(username = %username, "Logged in");
    Ok(())
}

/// End the session and forget every stored cookie.
///
/// # Errors
///
/// Returns `ApiError` if the server rejects the call; the jar is left
/// untouched in that case.
#[instrument(skip(client))]
pub async fn logout(client: &ApiClient) -> Result<(), ApiError> {
    client.post::<()>(LOGOUT_PATH, None).await?;
    client.session().clear();
    info!("Logged out");
    Ok(())
}
