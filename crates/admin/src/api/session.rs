//! Session cookie jar.
//!
//! The REST API authenticates with Django's session cookie and protects
//! unsafe methods with the `csrftoken` cookie. [`SessionJar`] plugs into
//! reqwest as its cookie store, so every request carries the session and
//! every `Set-Cookie` updates it. The jar can be written to disk so a
//! command-line session survives between invocations.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use cookie::Cookie;
use cookie::time::{Duration, OffsetDateTime};
use reqwest::Url;
use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;
use thiserror::Error;
use tracing::{debug, warn};

/// Name of the cookie carrying Django's CSRF token.
pub const CSRF_COOKIE: &str = "csrftoken";

/// Errors that can occur when loading or saving a session file.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the file failed.
    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),

    /// The file does not contain a valid session.
    #[error("Session file is corrupt: {0}")]
    Format(#[from] serde_json::Error),
}

/// Cookie store holding the console's session.
///
/// The console talks to a single API host, so cookies are keyed by name
/// only; domain and path attributes are ignored.
#[derive(Default)]
pub struct SessionJar {
    cookies: RwLock<BTreeMap<String, String>>,
}

impl std::fmt::Debug for SessionJar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self.read().keys().cloned().collect();
        f.debug_struct("SessionJar")
            .field("cookies", &names)
            .finish_non_exhaustive()
    }
}

impl SessionJar {
    /// Create an empty jar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a jar from `path`. A missing file yields an empty jar.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No session file, starting logged out");
                return Ok(Self::new());
            }
            Err(e) => return Err(e.into()),
        };
        let cookies: BTreeMap<String, String> = serde_json::from_str(&raw)?;
        Ok(Self {
            cookies: RwLock::new(cookies),
        })
    }

    /// Write the jar to `path`, creating parent directories as needed.
    ///
    /// On Unix the file is created readable by the owner only.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&*self.read())?;

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(path)?;
        std::io::Write::write_all(&mut file, json.as_bytes())?;
        Ok(())
    }

    /// Value of the cookie called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        self.read().get(name).cloned()
    }

    /// The CSRF token, if the server has issued one.
    #[must_use]
    pub fn csrf_token(&self) -> Option<String> {
        self.get(CSRF_COOKIE).filter(|token| !token.is_empty())
    }

    /// Set a cookie directly.
    pub fn insert(&self, name: impl Into<String>, value: impl Into<String>) {
        self.write().insert(name.into(), value.into());
    }

    /// Drop every cookie.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Whether the jar holds no cookies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Apply one `Set-Cookie` header value.
    ///
    /// A cookie that is already expired (`Max-Age` of zero or less, or an
    /// `Expires` date in the past) or has an empty value is removed, which is
    /// how Django expires the session on logout.
    pub fn apply_set_cookie(&self, header: &str) {
        let cookie = match Cookie::parse(header) {
            Ok(cookie) => cookie,
            Err(e) => {
                warn!(error = %e, "Ignoring malformed Set-Cookie header");
                return;
            }
        };
        let name = cookie.name();
        let value = cookie.value().trim_matches('"');

        let mut cookies = self.write();
        if is_expired(&cookie) || value.is_empty() {
            cookies.remove(name);
            debug!(cookie = %name, "Cookie removed");
        } else {
            cookies.insert(name.to_owned(), value.to_owned());
            debug!(cookie = %name, "Cookie stored");
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, String>> {
        self.cookies.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<String, String>> {
        self.cookies.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn is_expired(cookie: &Cookie<'_>) -> bool {
    cookie.max_age().is_some_and(|age| age <= Duration::ZERO)
        || cookie
            .expires_datetime()
            .is_some_and(|at| at <= OffsetDateTime::now_utc())
}

impl CookieStore for SessionJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, _url: &Url) {
        for header in cookie_headers {
            match header.to_str() {
                Ok(raw) => self.apply_set_cookie(raw),
                Err(_) => warn!("Ignoring non-ASCII Set-Cookie header"),
            }
        }
    }

    fn cookies(&self, _url: &Url) -> Option<HeaderValue> {
        let cookies = self.read();
        if cookies.is_empty() {
            return None;
        }
        let header = cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        HeaderValue::from_str(&header).ok()
    }
}
