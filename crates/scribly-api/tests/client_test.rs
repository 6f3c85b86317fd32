#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scribly_api::{
    ApiClient, ApiRequest, CredentialSource, Error, ErrorKind, FailureObserver, LoginRequest,
    PostQuery, TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

struct StaticToken(Option<&'static str>);

impl CredentialSource for StaticToken {
    fn credential(&self) -> Option<SecretString> {
        self.0.map(|t| SecretString::from(t.to_owned()))
    }
}

#[derive(Default)]
struct RecordingObserver {
    seen: Mutex<Vec<ErrorKind>>,
}

impl RecordingObserver {
    fn kinds(&self) -> Vec<ErrorKind> {
        self.seen.lock().unwrap().clone()
    }
}

impl FailureObserver for RecordingObserver {
    fn on_failure(&self, error: &Error) {
        self.seen.lock().unwrap().push(error.kind());
    }
}

async fn setup(token: Option<&'static str>) -> (MockServer, ApiClient, Arc<RecordingObserver>) {
    let server = MockServer::start().await;
    let observer = Arc::new(RecordingObserver::default());
    let client = ApiClient::new(Url::parse(&server.uri()).unwrap(), &TransportConfig::default())
        .unwrap()
        .with_credentials(Arc::new(StaticToken(token)))
        .with_observer(observer.clone());
    (server, client, observer)
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"code": 200, "message": "success", "data": data}))
}

// ── Credential attachment ───────────────────────────────────────────

#[tokio::test]
async fn test_bearer_credential_attached() {
    let (server, client, _) = setup(Some("abc")).await;

    Mock::given(method("GET"))
        .and(path("/api/auth/profile"))
        .and(header("Authorization", "Bearer abc"))
        .respond_with(ok(json!({"id": 1, "username": "alice"})))
        .expect(1)
        .mount(&server)
        .await;

    let me = client.get_profile().await.unwrap();
    assert_eq!(me.username.as_deref(), Some("alice"));
}

#[tokio::test]
async fn test_no_credential_no_header() {
    let (server, client, _) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/api/posts/7"))
        .respond_with(ok(json!({"id": 7, "title": "Hello"})))
        .mount(&server)
        .await;

    let post = client.get_post(7).await.unwrap();
    assert_eq!(post.title, "Hello");

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(received[0].headers.get("authorization").is_none());
}

// ── Envelope handling ───────────────────────────────────────────────

#[tokio::test]
async fn test_login_unwraps_envelope() {
    let (server, client, observer) = setup(None).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"username": "alice", "password": "pw"})))
        .respond_with(ok(json!({
            "token": "abc",
            "userInfo": {"id": 1, "username": "alice"}
        })))
        .mount(&server)
        .await;

    let form = LoginRequest::new("alice", SecretString::from("pw".to_owned()));
    let resp = client.login(&form).await.unwrap();

    assert_eq!(resp.token.expose_secret(), "abc");
    assert_eq!(resp.user_info.id, Some(1));
    assert!(observer.kinds().is_empty());
}

#[tokio::test]
async fn test_application_failure_in_2xx() {
    let (server, client, observer) = setup(None).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 400,
            "message": "username already taken",
            "data": null
        })))
        .mount(&server)
        .await;

    let form = scribly_api::RegisterRequest {
        username: "alice".into(),
        email: "a@example.com".into(),
        password: SecretString::from("pw".to_owned()),
        confirm_password: SecretString::from("pw".to_owned()),
        nickname: None,
    };
    let err = client.register(&form).await.unwrap_err();

    assert!(
        matches!(err, Error::Api { code: 400, .. }),
        "expected Api error, got: {err:?}"
    );
    assert_eq!(err.user_message(), "username already taken");
    assert_eq!(observer.kinds(), vec![ErrorKind::Application]);
}

#[tokio::test]
async fn test_list_posts_query_and_page() {
    let (server, client, _) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/api/posts"))
        .and(query_param("page", "2"))
        .and(query_param("size", "5"))
        .respond_with(ok(json!({
            "records": [{"id": 1, "title": "First"}, {"id": 2, "title": "Second"}],
            "total": 7,
            "size": 5,
            "current": 2,
            "pages": 2
        })))
        .mount(&server)
        .await;

    let page = client
        .list_posts(&PostQuery {
            page: Some(2),
            size: Some(5),
            status: None,
        })
        .await
        .unwrap();

    assert_eq!(page.total, 7);
    assert_eq!(page.records.len(), 2);
    assert_eq!(page.records[1].title, "Second");
}

#[tokio::test]
async fn test_batch_check_keys_by_post_id() {
    let (server, client, _) = setup(Some("abc")).await;

    Mock::given(method("POST"))
        .and(path("/api/likes/posts/batch-check"))
        .and(body_json(json!([1, 2])))
        .respond_with(ok(json!({"1": true, "2": false})))
        .mount(&server)
        .await;

    let liked = client.batch_check_post_likes(&[1, 2]).await.unwrap();
    assert_eq!(liked.get(&1), Some(&true));
    assert_eq!(liked.get(&2), Some(&false));
}

#[tokio::test]
async fn test_toggle_favorite_folder_query() {
    let (server, client, _) = setup(Some("abc")).await;

    Mock::given(method("PUT"))
        .and(path("/api/favorites/post/9/toggle"))
        .and(query_param("folderId", "3"))
        .respond_with(ok(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    let state = client.toggle_favorite(9, Some(3)).await.unwrap();
    assert_eq!(state, json!(true));
}

// ── Status classification ───────────────────────────────────────────

#[tokio::test]
async fn test_401_is_session_invalid() {
    let (server, client, observer) = setup(Some("stale")).await;

    Mock::given(method("GET"))
        .and(path("/api/auth/profile"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let err = client.get_profile().await.unwrap_err();
    assert!(err.is_session_invalid(), "got: {err:?}");
    assert_eq!(observer.kinds(), vec![ErrorKind::SessionInvalid]);
}

#[tokio::test]
async fn test_other_statuses_classified() {
    let (server, client, observer) = setup(None).await;

    for (status, suffix) in [(403, "403"), (404, "404"), (500, "500"), (418, "418")] {
        Mock::given(method("GET"))
            .and(path(format!("/api/status/{suffix}")))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;
    }

    for suffix in ["403", "404", "500", "418"] {
        let _ = client
            .call_unit(ApiRequest::get(format!("/status/{suffix}")))
            .await
            .unwrap_err();
    }

    assert_eq!(
        observer.kinds(),
        vec![
            ErrorKind::Forbidden,
            ErrorKind::NotFound,
            ErrorKind::ServerError,
            ErrorKind::RequestFailed,
        ]
    );
}

#[tokio::test]
async fn test_non_envelope_body_is_invalid_response() {
    let (server, client, _) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/api/posts/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client.get_post(1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidResponse);
}

// ── Transport failures ──────────────────────────────────────────────

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Grab a free port, then close it so nothing is listening.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let observer = Arc::new(RecordingObserver::default());
    let client = ApiClient::new(
        Url::parse(&format!("http://127.0.0.1:{port}")).unwrap(),
        &TransportConfig::default(),
    )
    .unwrap()
    .with_observer(observer.clone());

    let err = client.get_post(1).await.unwrap_err();
    assert!(err.is_network(), "got: {err:?}");
    assert_eq!(observer.kinds(), vec![ErrorKind::NetworkError]);
}

#[tokio::test]
async fn test_per_call_timeout() {
    let (server, client, _) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/api/posts/1"))
        .respond_with(ok(json!({"id": 1})).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let err = client
        .call::<serde_json::Value>(
            ApiRequest::get("/posts/1").timeout(Duration::from_millis(200)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Timeout { .. }), "got: {err:?}");
}

// ── Silent calls ────────────────────────────────────────────────────

#[tokio::test]
async fn test_silent_failure_not_observed() {
    let (server, client, observer) = setup(Some("abc")).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client.logout().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ServerError);
    assert!(observer.kinds().is_empty());
}
