//! Integration tests for the API client: CSRF handling, error mapping and
//! list normalization over real HTTP.

use std::sync::Arc;

use ptt_admin::api::{ApiError, CSRF_HEADER, resource};
use ptt_admin::{ApiClient, ConsoleConfig, SessionJar};
use ptt_admin_core::{Channel, ChannelId, ChannelPayload, UserId};
use ptt_admin_integration_tests::FakeApi;
use serde_json::json;
use url::Url;

// =============================================================================
// CSRF Tests
// =============================================================================

#[tokio::test]
async fn test_get_never_sends_csrf_header() {
    let api = FakeApi::start().await;
    let client = api.client();
    client.session().insert("csrftoken", "tok123");

    client.get("/api/channels/").await.expect("list channels");

    let request = api.requests_to("GET", "/api/channels/").pop().expect("request recorded");
    assert!(request.header(CSRF_HEADER).is_none());
    assert!(
        request.header("cookie").is_some_and(|c| c.contains("csrftoken=tok123")),
        "cookies are sent on every request"
    );
}

#[tokio::test]
async fn test_unsafe_methods_send_csrf_header() {
    let api = FakeApi::start().await;
    api.set_channels(vec![json!({"id": 7, "name": "ops", "authorized_users": []})]);
    let client = api.client();
    client.session().insert("csrftoken", "tok123");

    let payload = ChannelPayload {
        name: "ops".to_owned(),
        authorized_users: vec![UserId::new(1)],
    };
    resource::create::<Channel>(&client, &payload).await.expect("create");
    resource::update::<Channel>(&client, ChannelId::new(7), &payload)
        .await
        .expect("update");
    resource::delete::<Channel>(&client, ChannelId::new(7)).await.expect("delete");

    let unsafe_requests: Vec<_> = api
        .requests()
        .into_iter()
        .filter(|r| r.method != "GET")
        .collect();
    assert_eq!(unsafe_requests.len(), 3);
    for request in unsafe_requests {
        assert_eq!(request.header(CSRF_HEADER), Some("tok123"), "{}", request.method);
        assert_eq!(request.header("referer"), Some(format!("{}/", api.base_url()).as_str()));
    }
}

#[tokio::test]
async fn test_no_token_means_no_csrf_header() {
    let api = FakeApi::start().await;
    let client = api.client();

    client
        .post("/api/channels/", Some(&json!({"name": "ops", "authorized_users": []})))
        .await
        .expect("create");

    let request = api.requests_to("POST", "/api/channels/").pop().expect("request recorded");
    assert!(request.header(CSRF_HEADER).is_none());
}

// =============================================================================
// Error Mapping Tests
// =============================================================================

#[tokio::test]
async fn test_detail_message_is_surfaced() {
    let api = FakeApi::start().await;
    api.script("POST", "/api/channels/", 400, r#"{"detail":"name already exists"}"#);

    let payload = ChannelPayload {
        name: "ops".to_owned(),
        authorized_users: vec![],
    };
    let err = resource::create::<Channel>(&api.client(), &payload)
        .await
        .expect_err("scripted failure");

    assert_eq!(err.to_string(), "name already exists");
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_unparsable_error_body_gets_generic_message() {
    let api = FakeApi::start().await;
    api.script("GET", "/api/users/", 502, "<html>Bad Gateway</html>");

    let err = api.client().get("/api/users/").await.expect_err("scripted failure");
    assert_eq!(err.to_string(), "HTTP error 502");
}

#[tokio::test]
async fn test_invalid_success_body() {
    let api = FakeApi::start().await;
    api.script("GET", "/api/users/", 200, "{not json");

    let err = api.client().get("/api/users/").await.expect_err("invalid body");
    assert!(matches!(err, ApiError::InvalidResponse(_)), "{err:?}");
}

#[tokio::test]
async fn test_empty_success_body_is_none() {
    let api = FakeApi::start().await;
    api.script("POST", "/api/channels/", 200, "");
    api.set_channels(vec![json!({"id": 3, "name": "x"})]);

    let client = api.client();
    assert!(client.post::<()>("/api/channels/", None).await.expect("post").is_none());
    assert!(client.delete("/api/channels/3/").await.expect("delete").is_none());
}

#[tokio::test]
async fn test_network_failure_is_uniform_error() {
    // Reserve a port, then free it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let url = Url::parse(&format!("http://{addr}")).expect("url");
    let client = ApiClient::new(&ConsoleConfig::new(url), Arc::new(SessionJar::new()))
        .expect("client");

    let err = client.get("/api/users/").await.expect_err("unreachable");
    assert!(matches!(err, ApiError::Network(_)), "{err:?}");
    assert!(err.to_string().starts_with("Network error"));
}

// =============================================================================
// List Normalization Tests
// =============================================================================

#[tokio::test]
async fn test_list_accepts_envelopes() {
    let api = FakeApi::start().await;
    let client = api.client();

    api.set_list_body("channels", json!({"channels": [{"id": 1, "name": "a"}]}));
    let channels = resource::list::<Channel>(&client).await.expect("list");
    assert_eq!(channels.len(), 1);

    api.set_list_body(
        "channels",
        json!({"count": 2, "results": [{"id": 1, "name": "a"}, {"id": 2, "name": "b"}]}),
    );
    assert_eq!(resource::list::<Channel>(&client).await.expect("list").len(), 2);

    api.set_list_body("channels", json!({}));
    assert!(resource::list::<Channel>(&client).await.expect("list").is_empty());

    api.set_list_body("channels", json!({"detail": "x"}));
    assert!(resource::list::<Channel>(&client).await.expect("list").is_empty());
}

#[tokio::test]
async fn test_list_skips_malformed_rows() {
    let api = FakeApi::start().await;
    api.set_channels(vec![
        json!({"id": 1, "name": "ops"}),
        json!({"name": "no id"}),
        json!({"id": 2, "name": "sales", "channel_id": "4500002"}),
    ]);

    let channels = resource::list::<Channel>(&api.client()).await.expect("list");
    let ids: Vec<i64> = channels.iter().map(|c| c.id.as_i64()).collect();
    assert_eq!(ids, vec![1, 2]);
}
