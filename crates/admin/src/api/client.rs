//! REST API client.
//!
//! Wraps every call with the session cookies, the CSRF header for unsafe
//! methods, and uniform error surfacing: callers only ever see [`ApiError`].

use std::sync::Arc;

use reqwest::header::REFERER;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use super::error::{ApiError, extract_message};
use super::session::SessionJar;
use crate::config::ConsoleConfig;

/// Header Django reads the CSRF token from.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Client for the admin REST API.
///
/// Cheap to clone; clones share the HTTP connection pool and the session jar.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    session: Arc<SessionJar>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the configured API, sharing `session` as its
    /// cookie store.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Client` if the HTTP client fails to build.
    pub fn new(config: &ConsoleConfig, session: Arc<SessionJar>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder().cookie_provider(Arc::clone(&session));
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_base_url.clone(),
                session,
            }),
        })
    }

    /// The API base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// The session jar backing this client.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionJar> {
        &self.inner.session
    }

    /// Build the absolute URL for an API path such as `/api/channels/`.
    ///
    /// The path is appended to the base URL, so a base with a path prefix
    /// keeps it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if the result is not a valid URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}")).map_err(|e| ApiError::InvalidUrl(e.to_string()))
    }

    /// Send a request and return the parsed JSON body.
    ///
    /// Returns `Ok(None)` for 204 responses and empty bodies.
    ///
    /// # Errors
    ///
    /// - `ApiError::Network` if no response was received
    /// - `ApiError::Status` for non-2xx responses, carrying the server's message
    /// - `ApiError::InvalidResponse` if a 2xx body is not valid JSON
    #[instrument(skip(self, body), fields(method = %method, path = %path))]
    pub async fn request<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Option<Value>, ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.endpoint(path)?;
        debug!(url = %url, "Calling API");

        let mut builder = self.inner.client.request(method.clone(), url);
        if !is_safe(&method) {
            if let Some(token) = self.inner.session.csrf_token() {
                builder = builder.header(CSRF_HEADER, token);
            }
            // Django rejects unsafe requests over HTTPS without a same-origin Referer.
            builder = builder.header(REFERER, self.inner.base_url.as_str());
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = extract_message(&bytes);
            warn!(
                status = status.as_u16(),
                message = ?message,
                "API returned an error"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if status == StatusCode::NO_CONTENT || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice(&bytes).map(Some).map_err(|e| {
            warn!(error = %e, "API returned a body that is not JSON");
            ApiError::InvalidResponse(e.to_string())
        })
    }

    /// `GET` a path.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get(&self, path: &str) -> Result<Option<Value>, ApiError> {
        self.request::<()>(Method::GET, path, None).await
    }

    /// `POST` a JSON body, or nothing.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn post<B>(&self, path: &str, body: Option<&B>) -> Result<Option<Value>, ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.request(Method::POST, path, body).await
    }

    /// `PUT` a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn put<B>(&self, path: &str, body: &B) -> Result<Option<Value>, ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    /// `DELETE` a path.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn delete(&self, path: &str) -> Result<Option<Value>, ApiError> {
        self.request::<()>(Method::DELETE, path, None).await
    }
}

/// Methods that never carry the CSRF token.
fn is_safe(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD)
}
