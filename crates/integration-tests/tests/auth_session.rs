//! Integration tests for login, logout and session persistence.

use std::sync::Arc;

use ptt_admin::api::{CSRF_HEADER, auth, resource};
use ptt_admin::views::LoginForm;
use ptt_admin::views::login::LOGIN_INCOMPLETE;
use ptt_admin::{ChannelScreen, SessionJar};
use ptt_admin_core::Channel;
use ptt_admin_integration_tests::{FAKE_CSRF_TOKEN, FAKE_SESSION_ID, FakeApi};
use secrecy::SecretString;
use serde_json::json;

// =============================================================================
// Login Tests
// =============================================================================

#[tokio::test]
async fn test_login_stores_session_and_csrf_cookies() {
    let api = FakeApi::start().await;
    api.set_credentials("admin", "hunter2");
    let client = api.client();

    let mut form = LoginForm::new("admin", SecretString::from("hunter2"));
    assert!(form.submit(&client).await);
    assert!(form.error().is_none());

    assert_eq!(client.session().get("sessionid").as_deref(), Some(FAKE_SESSION_ID));
    assert_eq!(client.session().csrf_token().as_deref(), Some(FAKE_CSRF_TOKEN));
}

#[tokio::test]
async fn test_requests_after_login_carry_session_and_token() {
    let api = FakeApi::start().await;
    api.require_session();
    api.set_channels(vec![json!({"id": 7, "name": "ops", "authorized_users": []})]);
    let client = api.client();

    auth::login(&client, "admin", &SecretString::from("pw"))
        .await
        .expect("login");
    resource::list::<Channel>(&client).await.expect("list");
    resource::delete::<Channel>(&client, ptt_admin_core::ChannelId::new(7))
        .await
        .expect("delete");

    let delete = api
        .requests_to("DELETE", "/api/channels/7/")
        .pop()
        .expect("delete recorded");
    assert_eq!(delete.header(CSRF_HEADER), Some(FAKE_CSRF_TOKEN));
    assert!(
        delete
            .header("cookie")
            .is_some_and(|c| c.contains(&format!("sessionid={FAKE_SESSION_ID}")))
    );
}

#[tokio::test]
async fn test_rejected_login_shows_server_message() {
    let api = FakeApi::start().await;
    api.set_credentials("admin", "hunter2");
    let client = api.client();

    let mut form = LoginForm::new("admin", SecretString::from("wrong"));
    assert!(!form.submit(&client).await);

    assert_eq!(form.error(), Some("invalid credentials"));
    assert_eq!(form.username, "admin", "fields are kept");
    assert!(client.session().get("sessionid").is_none());
}

#[tokio::test]
async fn test_rejected_login_without_message_falls_back() {
    let api = FakeApi::start().await;
    api.script("POST", "/api/auth/login/", 401, "");
    let client = api.client();

    let mut form = LoginForm::new("admin", SecretString::from("pw"));
    assert!(!form.submit(&client).await);
    assert_eq!(form.error(), Some("Login failed"));
}

#[tokio::test]
async fn test_incomplete_login_form_sends_nothing() {
    let api = FakeApi::start().await;
    let client = api.client();

    let mut form = LoginForm::new("admin", SecretString::from(""));
    assert!(!form.can_submit());
    assert!(!form.submit(&client).await);
    assert_eq!(form.error(), Some(LOGIN_INCOMPLETE));

    form.username = "   ".to_owned();
    form.password = SecretString::from("pw");
    assert!(!form.submit(&client).await);
    assert_eq!(form.error(), Some(LOGIN_INCOMPLETE));

    assert!(api.requests().is_empty());
}

// =============================================================================
// Session Tests
// =============================================================================

#[tokio::test]
async fn test_missing_session_is_unauthorized() {
    let api = FakeApi::start().await;
    api.require_session();
    let mut screen = ChannelScreen::new(api.client());

    screen.mount().await;

    let failure = screen.list.failure().expect("load failed");
    assert!(failure.is_unauthorized());
    assert_eq!(failure.status(), Some(403));
    assert_eq!(screen.list.error().as_deref(), Some("Failed to load channels."));
}

#[tokio::test]
async fn test_logout_clears_jar() {
    let api = FakeApi::start().await;
    let client = api.client();
    auth::login(&client, "admin", &SecretString::from("pw"))
        .await
        .expect("login");
    assert!(!client.session().is_empty());

    auth::logout(&client).await.expect("logout");

    assert!(client.session().is_empty());
    let logout = api
        .requests_to("POST", "/api/auth/logout/")
        .pop()
        .expect("logout recorded");
    assert_eq!(logout.header(CSRF_HEADER), Some(FAKE_CSRF_TOKEN));
}

#[tokio::test]
async fn test_saved_jar_resumes_session() {
    let api = FakeApi::start().await;
    api.require_session();
    let dir = std::env::temp_dir().join(format!("ptt-admin-session-{}", std::process::id()));
    let path = dir.join("session.json");

    let client = api.client();
    auth::login(&client, "admin", &SecretString::from("pw"))
        .await
        .expect("login");
    client.session().save(&path).expect("save jar");

    let resumed = api.client_with_jar(Arc::new(SessionJar::load(&path).expect("load jar")));
    resource::list::<Channel>(&resumed)
        .await
        .expect("list with resumed session");

    let _ = std::fs::remove_dir_all(&dir);
}
