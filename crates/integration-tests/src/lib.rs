//! Integration tests for the PTT admin console.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ptt-admin-integration-tests
//! ```
//!
//! No external services are needed: [`FakeApi`] serves the console's REST
//! endpoints from memory on a random local port and records every request,
//! so tests drive the real `ApiClient` and screens over HTTP and then
//! inspect exactly what was sent.
//!
//! # Example
//!
//! ```rust,ignore
//! let api = FakeApi::start().await;
//! api.set_channels(vec![json!({"id": 7, "name": "ops", "authorized_users": [1, 2]})]);
//!
//! let mut screen = ChannelScreen::new(api.client());
//! screen.mount().await;
//! assert_eq!(api.requests_to("GET", "/api/channels/").len(), 1);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::{Request, State};
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{AppendHeaders, IntoResponse, Response};
use ptt_admin::{ApiClient, ConsoleConfig, SessionJar};
use serde_json::{Value, json};
use url::Url;

/// CSRF token the fake server hands out on login.
pub const FAKE_CSRF_TOKEN: &str = "fake-csrf-token";

/// Session id the fake server hands out on login.
pub const FAKE_SESSION_ID: &str = "fake-session-id";

/// One request as the fake server saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl RecordedRequest {
    /// Value of a header, if present and ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// A canned response for one method and path.
#[derive(Debug, Clone)]
struct Scripted {
    status: StatusCode,
    body: String,
}

#[derive(Default)]
struct FakeData {
    channels: Vec<Value>,
    users: Vec<Value>,
    list_overrides: HashMap<String, Value>,
    scripted: HashMap<(String, String), Scripted>,
    credentials: Option<(String, String)>,
    require_session: bool,
    requests: Vec<RecordedRequest>,
}

/// In-memory stand-in for the console's REST API.
#[derive(Clone)]
pub struct FakeApi {
    data: Arc<Mutex<FakeData>>,
    base_url: String,
}

impl FakeApi {
    /// Bind a random local port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        let data = Arc::new(Mutex::new(FakeData::default()));
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&data));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake api listener");
        let addr = listener.local_addr().expect("fake api address");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            data,
            base_url: format!("http://{addr}"),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// A client with an empty session jar.
    #[must_use]
    pub fn client(&self) -> ApiClient {
        self.client_with_jar(Arc::new(SessionJar::new()))
    }

    /// A client using `jar` as its cookie store.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client_with_jar(&self, jar: Arc<SessionJar>) -> ApiClient {
        let url = Url::parse(&self.base_url).expect("fake api url");
        ApiClient::new(&ConsoleConfig::new(url), jar).expect("build api client")
    }

    /// Replace the stored channels.
    pub fn set_channels(&self, channels: Vec<Value>) {
        self.lock().channels = channels;
    }

    /// Replace the stored users.
    pub fn set_users(&self, users: Vec<Value>) {
        self.lock().users = users;
    }

    /// Answer `GET /api/<collection>/` with `body` verbatim.
    pub fn set_list_body(&self, collection: &str, body: Value) {
        self.lock()
            .list_overrides
            .insert(collection.to_owned(), body);
    }

    /// Answer the next `method path` request with `status` and a raw body.
    pub fn script(&self, method: &str, path: &str, status: u16, body: &str) {
        let status = StatusCode::from_u16(status).expect("valid status code");
        self.lock().scripted.insert(
            (method.to_owned(), path.to_owned()),
            Scripted {
                status,
                body: body.to_owned(),
            },
        );
    }

    /// Accept only this username and password on login.
    pub fn set_credentials(&self, username: &str, password: &str) {
        self.lock().credentials = Some((username.to_owned(), password.to_owned()));
    }

    /// Reject resource requests without the session cookie with 403.
    pub fn require_session(&self) {
        self.lock().require_session = true;
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Requests received for one method and path.
    #[must_use]
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    /// Current stored channels.
    #[must_use]
    pub fn channels(&self) -> Vec<Value> {
        self.lock().channels.clone()
    }

    /// Current stored users.
    #[must_use]
    pub fn users(&self) -> Vec<Value> {
        self.lock().users.clone()
    }

    fn lock(&self) -> MutexGuard<'_, FakeData> {
        lock(&self.data)
    }
}

fn lock(data: &Mutex<FakeData>) -> MutexGuard<'_, FakeData> {
    data.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

// =============================================================================
// Request Handling
// =============================================================================

async fn handle(State(data): State<Arc<Mutex<FakeData>>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();
    let recorded = RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_owned(),
        headers: parts.headers,
        body: serde_json::from_slice(&bytes).ok(),
    };

    let mut data = lock(&data);
    data.requests.push(recorded.clone());

    let key = (recorded.method.clone(), recorded.path.clone());
    if let Some(scripted) = data.scripted.remove(&key) {
        return raw(scripted.status, scripted.body);
    }

    let segments: Vec<&str> = recorded
        .path
        .trim_matches('/')
        .split('/')
        .collect();

    match (recorded.method.as_str(), segments.as_slice()) {
        ("POST", ["api", "auth", "login"]) => login(&data, recorded.body.as_ref()),
        ("POST", ["api", "auth", "logout"]) => logout(),
        (method, ["api", collection @ ("channels" | "users"), rest @ ..]) => {
            if data.require_session && !has_session(&recorded.headers) {
                return json_response(
                    StatusCode::FORBIDDEN,
                    &json!({"detail": "Authentication credentials were not provided."}),
                );
            }
            let id = match rest {
                [] => None,
                [id] => match id.parse::<i64>() {
                    Ok(id) => Some(id),
                    Err(_) => return not_found(),
                },
                _ => return not_found(),
            };
            collection_request(&mut data, collection, method, id, recorded.body)
        }
        _ => not_found(),
    }
}

fn collection_request(
    data: &mut FakeData,
    collection: &str,
    method: &str,
    id: Option<i64>,
    body: Option<Value>,
) -> Response {
    if method == "GET"
        && id.is_none()
        && let Some(body) = data.list_overrides.get(collection)
    {
        return json_response(StatusCode::OK, body);
    }

    let records = if collection == "channels" {
        &mut data.channels
    } else {
        &mut data.users
    };

    match (method, id) {
        ("GET", None) => json_response(StatusCode::OK, &Value::Array(records.clone())),
        ("GET", Some(id)) => records
            .iter()
            .find(|r| record_id(r) == Some(id))
            .map_or_else(not_found, |r| json_response(StatusCode::OK, r)),
        ("POST", None) => {
            let next_id = records.iter().filter_map(record_id).max().unwrap_or(0) + 1;
            let mut record = body.unwrap_or_else(|| json!({}));
            if let Some(object) = record.as_object_mut() {
                object.insert("id".to_owned(), json!(next_id));
                object.remove("password");
                if collection == "channels" {
                    object.insert("channel_id".to_owned(), json!(4_500_000 + next_id));
                }
            }
            records.push(record.clone());
            json_response(StatusCode::CREATED, &record)
        }
        ("PUT", Some(id)) => {
            let Some(existing) = records.iter_mut().find(|r| record_id(r) == Some(id)) else {
                return not_found();
            };
            if let (Some(target), Some(Value::Object(update))) = (existing.as_object_mut(), body) {
                for (key, value) in update {
                    if key != "password" {
                        target.insert(key, value);
                    }
                }
            }
            json_response(StatusCode::OK, existing)
        }
        ("DELETE", Some(id)) => {
            let before = records.len();
            records.retain(|r| record_id(r) != Some(id));
            if records.len() == before {
                not_found()
            } else {
                StatusCode::NO_CONTENT.into_response()
            }
        }
        _ => raw(StatusCode::METHOD_NOT_ALLOWED, String::new()),
    }
}

fn login(data: &FakeData, body: Option<&Value>) -> Response {
    let username = body.and_then(|b| b.get("username")).and_then(Value::as_str);
    let password = body.and_then(|b| b.get("password")).and_then(Value::as_str);

    let accepted = match (&data.credentials, username, password) {
        (Some((want_user, want_pass)), Some(user), Some(pass)) => {
            want_user == user && want_pass == pass
        }
        (None, Some(user), Some(pass)) => !user.is_empty() && !pass.is_empty(),
        _ => false,
    };

    if !accepted {
        return json_response(
            StatusCode::BAD_REQUEST,
            &json!({"error": "invalid credentials"}),
        );
    }

    (
        StatusCode::OK,
        AppendHeaders([
            (
                SET_COOKIE,
                format!("csrftoken={FAKE_CSRF_TOKEN}; Path=/; SameSite=Lax"),
            ),
            (
                SET_COOKIE,
                format!("sessionid={FAKE_SESSION_ID}; HttpOnly; Path=/; SameSite=Lax"),
            ),
        ]),
        axum::Json(json!({"success": true})),
    )
        .into_response()
}

fn logout() -> Response {
    (
        StatusCode::OK,
        AppendHeaders([(
            SET_COOKIE,
            "sessionid=\"\"; expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0; Path=/",
        )]),
        axum::Json(json!({"success": true})),
    )
        .into_response()
}

fn has_session(headers: &HeaderMap) -> bool {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .any(|pair| pair.trim() == format!("sessionid={FAKE_SESSION_ID}"))
}

fn record_id(record: &Value) -> Option<i64> {
    record.get("id").and_then(Value::as_i64)
}

fn json_response(status: StatusCode, body: &Value) -> Response {
    (status, axum::Json(body.clone())).into_response()
}

fn raw(status: StatusCode, body: String) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

fn not_found() -> Response {
    json_response(StatusCode::NOT_FOUND, &json!({"detail": "Not found."}))
}
