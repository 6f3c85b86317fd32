#![allow(clippy::unwrap_used)]
// Session behavior over a fake transport and in-memory storage.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use futures_util::future::BoxFuture;
use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use url::Url;

use scribly_api::error::{FORBIDDEN_NOTICE, NETWORK_ERROR_NOTICE, SESSION_INVALID_NOTICE};
use scribly_api::{
    ErrorKind, HttpRequest, HttpResponse, Identity, LoginRequest, ProfileUpdate, Transport,
    TransportFailure,
};
use scribly_core::notice::{LOGIN_REQUIRED, LOGIN_SUCCESS, LOGOUT_SUCCESS};
use scribly_core::store::{IDENTITY_KEY, TOKEN_KEY};
use scribly_core::{
    CoreError, KeyValueStore, Location, MemoryStore, Navigation, Notice, NoticeLevel,
    RecordingNotifier, Session, SessionConfig, StoreError,
};

// ── Fakes ───────────────────────────────────────────────────────────

type Outcome = Result<HttpResponse, TransportFailure>;

/// Scripted responses keyed by `"METHOD /path"`. A queue with more than
/// one entry is consumed in order; the last entry repeats.
#[derive(Default)]
struct FakeTransport {
    script: Mutex<HashMap<String, VecDeque<Outcome>>>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    fn on(&self, method: &str, path: &str, outcome: Outcome) -> &Self {
        self.script
            .lock()
            .unwrap()
            .entry(format!("{method} {path}"))
            .or_default()
            .push_back(outcome);
        self
    }

    fn seen(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl Transport for FakeTransport {
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, Outcome> {
        let key = format!("{} {}", request.method, request.url.path());
        let outcome = {
            let mut script = self.script.lock().unwrap();
            match script.get_mut(&key) {
                Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
                Some(queue) => queue.front().cloned().unwrap(),
                None => Ok(HttpResponse::new(404, "")),
            }
        };
        self.seen.lock().unwrap().push(request);
        Box::pin(async move { outcome })
    }
}

/// Records every batch so pair consistency can be checked.
#[derive(Default, Clone)]
struct BatchLog {
    inner: MemoryStore,
    batches: Arc<Mutex<Vec<Vec<String>>>>,
}

impl KeyValueStore for BatchLog {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn write(&self, changes: &[(&str, Option<String>)]) -> Result<(), StoreError> {
        self.batches
            .lock()
            .unwrap()
            .push(changes.iter().map(|(k, _)| (*k).to_owned()).collect());
        self.inner.write(changes)
    }
}

/// Storage that reads as corrupt until it is written.
#[derive(Clone)]
struct CorruptUntilWritten {
    inner: MemoryStore,
    corrupt: Arc<Mutex<bool>>,
}

impl CorruptUntilWritten {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            corrupt: Arc::new(Mutex::new(true)),
        }
    }
}

impl KeyValueStore for CorruptUntilWritten {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if *self.corrupt.lock().unwrap() {
            return Err(StoreError::Corrupt {
                path: "default.json".into(),
                message: "key must be a string".into(),
            });
        }
        self.inner.get(key)
    }

    fn write(&self, changes: &[(&str, Option<String>)]) -> Result<(), StoreError> {
        *self.corrupt.lock().unwrap() = false;
        self.inner.write(changes)
    }
}

struct Harness {
    session: Session,
    transport: Arc<FakeTransport>,
    store: MemoryStore,
    notices: Arc<RecordingNotifier>,
}

fn ok(data: Value) -> Outcome {
    Ok(HttpResponse::json(
        200,
        &json!({"code": 200, "message": "success", "data": data}),
    ))
}

fn status(code: u16) -> Outcome {
    Ok(HttpResponse::new(code, ""))
}

fn login_ok(token: &str, id: i64, username: &str) -> Outcome {
    ok(json!({"token": token, "userInfo": {"id": id, "username": username}}))
}

fn config() -> SessionConfig {
    SessionConfig::new(Url::parse("http://blog.test").unwrap())
}

fn harness_with(store: MemoryStore) -> Harness {
    let transport = Arc::new(FakeTransport::default());
    let notices = Arc::new(RecordingNotifier::new());
    let session = Session::with_transport(
        &config(),
        transport.clone(),
        Box::new(store.clone()),
        notices.clone(),
    )
    .unwrap();
    Harness {
        session,
        transport,
        store,
        notices,
    }
}

fn harness() -> Harness {
    harness_with(MemoryStore::new())
}

fn logged_in() -> Harness {
    harness_with(MemoryStore::with_entries([
        (TOKEN_KEY, "abc"),
        (IDENTITY_KEY, r#"{"id":1,"username":"alice"}"#),
    ]))
}

fn alice() -> LoginRequest {
    LoginRequest::new("alice", SecretString::from("pw".to_owned()))
}

fn stored_identity(store: &MemoryStore) -> Option<Value> {
    store
        .get(IDENTITY_KEY)
        .unwrap()
        .map(|raw| serde_json::from_str(&raw).unwrap())
}

// ── Startup ─────────────────────────────────────────────────────────

#[tokio::test]
async fn scenario_a_anonymous_start_redirects_restricted_view() {
    let h = harness();

    assert!(!h.session.is_authenticated());

    let nav = h.session.router().navigate("/profile").unwrap();
    let Navigation::Redirected { to, .. } = &nav else {
        panic!("expected redirect, got {nav:?}");
    };
    assert_eq!(to.path, "/login");
    assert_eq!(to.query_value("redirect"), Some("/profile"));
    assert_eq!(h.notices.notices(), vec![Notice::warning(LOGIN_REQUIRED)]);
    assert!(h.transport.seen().is_empty());
}

#[tokio::test]
async fn stored_session_is_visible_before_any_call() {
    let h = harness_with(MemoryStore::with_entries([
        (TOKEN_KEY, "abc"),
        (IDENTITY_KEY, r#"{"id":1,"username":"alice","avatarUrl":"/a.png"}"#),
    ]));

    assert!(h.session.is_authenticated());
    assert_eq!(h.session.user_id(), Some(1));
    assert_eq!(h.session.username().as_deref(), Some("alice"));
    assert_eq!(h.session.display_name().as_deref(), Some("alice"));
    assert_eq!(h.session.avatar().as_deref(), Some("/a.png"));
    assert!(h.transport.seen().is_empty());
}

// ── Login / register ────────────────────────────────────────────────

#[tokio::test]
async fn scenario_b_login_stores_pair_and_restores_target() {
    let h = harness();
    h.transport.on("POST", "/api/auth/login", login_ok("abc", 1, "alice"));

    h.session.router().navigate("/profile").unwrap();
    let nav = h.session.login(&alice()).await.unwrap();

    assert_eq!(nav, Navigation::Entered(Location::parse("/profile").unwrap()));
    let snapshot = h.session.snapshot();
    assert_eq!(snapshot.token.as_ref().unwrap().expose_secret(), "abc");
    assert_eq!(
        serde_json::to_value(snapshot.identity.as_ref().unwrap()).unwrap(),
        json!({"id": 1, "username": "alice"})
    );
    assert_eq!(h.store.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
    assert_eq!(
        stored_identity(&h.store),
        Some(json!({"id": 1, "username": "alice"}))
    );
    assert!(h.notices.notices().contains(&Notice::success(LOGIN_SUCCESS)));
}

#[tokio::test]
async fn login_without_recorded_target_lands_home() {
    let h = harness();
    h.transport.on("POST", "/api/auth/login", login_ok("abc", 1, "alice"));

    let nav = h.session.login(&alice()).await.unwrap();
    assert_eq!(nav, Navigation::Entered(Location::root()));
    assert_eq!(h.session.router().title(), "Home - Scribly");
}

#[tokio::test]
async fn later_calls_carry_the_new_credential() {
    let h = harness();
    h.transport
        .on("POST", "/api/auth/login", login_ok("abc", 1, "alice"))
        .on("GET", "/api/posts/1", ok(json!({"id": 1, "title": "Hi"})));

    h.session.login(&alice()).await.unwrap();
    h.session.api().get_post(1).await.unwrap();

    let seen = h.transport.seen();
    assert!(seen[0].headers.get("authorization").is_none());
    assert_eq!(seen[1].headers.get("authorization").unwrap(), "Bearer abc");
}

#[tokio::test]
async fn second_login_wins() {
    let log = BatchLog::default();
    let transport = Arc::new(FakeTransport::default());
    transport
        .on("POST", "/api/auth/login", login_ok("first", 1, "alice"))
        .on("POST", "/api/auth/login", login_ok("second", 2, "bob"));
    let session = Session::with_transport(
        &config(),
        transport.clone(),
        Box::new(log.clone()),
        Arc::new(RecordingNotifier::new()),
    )
    .unwrap();

    session.login(&alice()).await.unwrap();
    session.login(&alice()).await.unwrap();

    assert_eq!(session.username().as_deref(), Some("bob"));
    assert_eq!(log.inner.get(TOKEN_KEY).unwrap().as_deref(), Some("second"));

    // Every write touching the credential also touches the identity.
    for batch in log.batches.lock().unwrap().iter() {
        if batch.iter().any(|k| k == TOKEN_KEY) {
            assert!(batch.iter().any(|k| k == IDENTITY_KEY), "split batch: {batch:?}");
        }
    }
}

#[tokio::test]
async fn application_failure_leaves_session_untouched() {
    let h = logged_in();
    h.transport.on(
        "POST",
        "/api/auth/login",
        Ok(HttpResponse::json(
            200,
            &json!({"code": 401, "message": "wrong password", "data": null}),
        )),
    );

    let err = h.session.login(&alice()).await.unwrap_err();

    assert_eq!(err.as_api().unwrap().kind(), ErrorKind::Application);
    assert!(h.session.is_authenticated());
    assert_eq!(h.store.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
    assert_eq!(h.notices.notices(), vec![Notice::error("wrong password")]);
}

#[tokio::test]
async fn register_goes_to_login_without_authenticating() {
    let h = harness();
    h.transport.on("POST", "/api/auth/register", ok(Value::Null));

    let form = scribly_api::RegisterRequest {
        username: "alice".into(),
        email: "a@example.com".into(),
        password: SecretString::from("pw".to_owned()),
        confirm_password: SecretString::from("pw".to_owned()),
        nickname: None,
    };
    let nav = h.session.register(&form).await.unwrap();

    assert_eq!(nav.location().path, "/login");
    assert!(!h.session.is_authenticated());
    assert!(h.store.entries().is_empty());
}

// ── Failure classification side effects ─────────────────────────────

#[tokio::test]
async fn unauthorized_clears_pair_and_redirects() {
    let h = logged_in();
    h.transport.on("GET", "/api/posts/1", status(401));
    h.session.router().navigate("/posts/1").unwrap();

    let err = h.session.api().get_post(1).await.unwrap_err();

    assert!(err.is_session_invalid());
    assert!(!h.session.is_authenticated());
    assert!(h.session.identity().is_none());
    assert!(h.store.entries().is_empty());
    assert_eq!(h.session.router().current().path, "/login");
    assert_eq!(
        h.notices.notices(),
        vec![Notice::error(SESSION_INVALID_NOTICE)]
    );
}

#[tokio::test]
async fn concurrent_unauthorized_calls_clear_once_safely() {
    let h = logged_in();
    h.transport
        .on("GET", "/api/posts/1", status(401))
        .on("GET", "/api/auth/profile", status(401));

    let api = h.session.api();
    let (a, b) = tokio::join!(api.get_post(1), api.get_profile());

    assert!(a.unwrap_err().is_session_invalid());
    assert!(b.unwrap_err().is_session_invalid());
    assert!(!h.session.is_authenticated());
    assert!(h.store.entries().is_empty());
    assert_eq!(h.session.router().current().path, "/login");
    // One notice per failed call.
    assert_eq!(h.notices.notices().len(), 2);
}

#[tokio::test]
async fn scenario_c_forbidden_keeps_credential() {
    let h = logged_in();
    h.transport.on("DELETE", "/api/posts/9", status(403));

    let err = h.session.api().delete_post(9).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Forbidden);
    assert!(h.session.is_authenticated());
    assert_eq!(h.store.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
    assert_eq!(h.notices.notices(), vec![Notice::error(FORBIDDEN_NOTICE)]);
}

#[tokio::test]
async fn scenario_d_network_failure_keeps_credential() {
    let h = logged_in();
    h.transport.on(
        "GET",
        "/api/posts",
        Err(TransportFailure::Connect("connection refused".into())),
    );

    let err = h
        .session
        .api()
        .list_posts(&scribly_api::PostQuery::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NetworkError);
    assert!(h.session.is_authenticated());
    let notices = h.notices.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].message, NETWORK_ERROR_NOTICE);
}

// ── Logout ──────────────────────────────────────────────────────────

#[tokio::test]
async fn logout_clears_even_when_server_unreachable() {
    let h = logged_in();
    h.transport.on(
        "POST",
        "/api/auth/logout",
        Err(TransportFailure::Connect("unreachable".into())),
    );

    let nav = h.session.logout().await.unwrap();

    assert_eq!(nav.location().path, "/login");
    assert!(!h.session.is_authenticated());
    assert!(h.store.entries().is_empty());
    // The failed server call is silent; only the logout notice shows.
    assert_eq!(h.notices.notices(), vec![Notice::success(LOGOUT_SUCCESS)]);
}

#[tokio::test]
async fn anonymous_logout_skips_the_server() {
    let h = harness();
    h.session.logout().await.unwrap();
    assert!(h.transport.seen().is_empty());
    assert_eq!(h.session.router().current().path, "/login");
}

#[tokio::test]
async fn corrupt_storage_starts_anonymous_and_login_recovers() {
    let store = CorruptUntilWritten::new();
    let transport = Arc::new(FakeTransport::default());
    transport.on("POST", "/api/auth/login", login_ok("abc", 1, "alice"));
    let session = Session::with_transport(
        &config(),
        transport.clone(),
        Box::new(store.clone()),
        Arc::new(RecordingNotifier::new()),
    )
    .unwrap();

    assert!(!session.is_authenticated());
    assert!(!*store.corrupt.lock().unwrap());

    let nav = session.logout().await.unwrap();
    assert_eq!(nav.location().path, "/login");

    session.login(&alice()).await.unwrap();
    assert_eq!(store.inner.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
}

// ── Identity ────────────────────────────────────────────────────────

#[tokio::test]
async fn scenario_e_local_identity_merge() {
    let h = logged_in();

    let merged = h
        .session
        .update_local_identity(Identity {
            nickname: Some("Al".into()),
            ..Identity::default()
        })
        .unwrap();

    let expected = json!({"id": 1, "username": "alice", "nickname": "Al"});
    assert_eq!(serde_json::to_value(&merged).unwrap(), expected);
    assert_eq!(stored_identity(&h.store), Some(expected));
    assert_eq!(h.session.display_name().as_deref(), Some("Al"));
    assert!(h.transport.seen().is_empty());
}

#[tokio::test]
async fn profile_update_merges_server_confirmation() {
    let h = logged_in();
    h.transport.on(
        "PUT",
        "/api/auth/profile",
        ok(json!({"id": 1, "username": "alice", "bio": "hello"})),
    );

    let update = ProfileUpdate {
        bio: Some("hello".into()),
        ..ProfileUpdate::default()
    };
    h.session.update_profile(&update).await.unwrap();

    assert_eq!(h.session.identity().unwrap().bio.as_deref(), Some("hello"));
    assert_eq!(
        stored_identity(&h.store),
        Some(json!({"id": 1, "username": "alice", "bio": "hello"}))
    );
}

#[tokio::test]
async fn refresh_replaces_identity() {
    let h = logged_in();
    h.transport.on(
        "GET",
        "/api/auth/profile",
        ok(json!({"id": 1, "username": "alice", "nickname": "Alice"})),
    );

    h.session.refresh_identity().await.unwrap();

    assert_eq!(h.session.display_name().as_deref(), Some("Alice"));
    assert_eq!(h.store.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
}

#[tokio::test]
async fn subscribers_observe_logout() {
    let h = logged_in();
    let mut rx = h.session.subscribe();
    assert!(rx.borrow_and_update().is_authenticated());

    h.session.logout().await.unwrap();

    assert!(rx.has_changed().unwrap());
    assert!(!rx.borrow_and_update().is_authenticated());
}

#[tokio::test]
async fn unknown_redirect_target_falls_back_home() {
    let h = harness();
    h.transport.on("POST", "/api/auth/login", login_ok("abc", 1, "alice"));
    h.session
        .router()
        .navigate("/login?redirect=%2Fnowhere")
        .unwrap();

    let nav = h.session.login(&alice()).await.unwrap();
    assert_eq!(nav, Navigation::Entered(Location::root()));
}

#[test]
fn unknown_path_is_an_error() {
    let h = harness();
    let err = h.session.router().navigate("/nope").unwrap_err();
    assert!(matches!(err, CoreError::RouteNotFound { .. }));
}
