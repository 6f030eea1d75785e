use std::sync::{Arc, Mutex};

use futures::executor::block_on;

use super::*;
use crate::model::{Session, SessionState, SharedSession, User};
use crate::role::Role;
use crate::store::{MemoryStore, SessionStore};

type Hook = Box<dyn Fn()>;

/// Replies with a fixed status and records each request. `during` runs while
/// the request is "in flight", before the reply is returned.
struct ScriptedTransport {
    status: u16,
    body: &'static str,
    seen: Arc<Mutex<Vec<ApiRequest>>>,
    during: Option<Hook>,
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.seen.lock().unwrap().push(request);
        if let Some(hook) = &self.during {
            hook();
        }
        Ok(ApiResponse::new(self.status, self.body))
    }
}

struct OfflineTransport;

impl Transport for OfflineTransport {
    async fn send(&self, _request: ApiRequest) -> Result<ApiResponse, TransportError> {
        Err(TransportError::Network("connection refused".to_owned()))
    }
}

#[derive(Clone, Default)]
struct RecordingNavigator {
    path: Arc<Mutex<String>>,
    redirects: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    fn at(path: &str) -> Self {
        let nav = Self::default();
        *nav.path.lock().unwrap() = path.to_owned();
        nav
    }

    fn redirects(&self) -> Vec<String> {
        self.redirects.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.path.lock().unwrap().clone()
    }

    fn redirect(&self, path: &str) {
        self.redirects.lock().unwrap().push(path.to_owned());
        *self.path.lock().unwrap() = path.to_owned();
    }
}

fn session(token: &str, role: Role) -> Session {
    Session {
        token: token.to_owned(),
        user: User { username: "u".to_owned(), role },
    }
}

fn handle() -> SessionHandle<MemoryStore, SharedSession> {
    SessionHandle::new(SessionStore::new(MemoryStore::new()), SharedSession::default())
}

struct Fixture {
    auth: RequestAuthenticator<ScriptedTransport, MemoryStore, SharedSession, RecordingNavigator>,
    handle: SessionHandle<MemoryStore, SharedSession>,
    nav: RecordingNavigator,
    seen: Arc<Mutex<Vec<ApiRequest>>>,
}

fn fixture(status: u16, body: &'static str, at: &str, during: Option<Hook>) -> Fixture {
    let handle = handle();
    let nav = RecordingNavigator::at(at);
    let seen: Arc<Mutex<Vec<ApiRequest>>> = Arc::default();
    let transport = ScriptedTransport { status, body, seen: Arc::clone(&seen), during };
    let auth = RequestAuthenticator::new(transport, handle.clone(), nav.clone());
    Fixture { auth, handle, nav, seen }
}

#[test]
fn attaches_bearer_token_when_signed_in() {
    let fx = fixture(200, "{}", "/admin/dashboard", None);
    fx.handle.establish(session("t1", Role::Admin)).unwrap();

    block_on(fx.auth.send(ApiRequest::get("/admin/dashboard/stats"))).unwrap();
    let seen = fx.seen.lock().unwrap();
    assert_eq!(seen[0].header(AUTHORIZATION), Some("Bearer t1"));
}

#[test]
fn sends_unauthenticated_without_token() {
    let fx = fixture(200, "[]", "/login", None);

    block_on(fx.auth.send(ApiRequest::get("/services"))).unwrap();
    assert_eq!(fx.seen.lock().unwrap()[0].header(AUTHORIZATION), None);
}

#[test]
fn token_is_read_from_store_at_send_time() {
    let fx = fixture(200, "{}", "/", None);
    fx.handle.establish(session("first", Role::Doctor)).unwrap();
    block_on(fx.auth.send(ApiRequest::get("/a"))).unwrap();
    fx.handle.establish(session("second", Role::Doctor)).unwrap();
    block_on(fx.auth.send(ApiRequest::get("/b"))).unwrap();

    let seen = fx.seen.lock().unwrap();
    assert_eq!(seen[0].header(AUTHORIZATION), Some("Bearer first"));
    assert_eq!(seen[1].header(AUTHORIZATION), Some("Bearer second"));
}

#[test]
fn unauthorized_clears_session_and_redirects_to_login() {
    let fx = fixture(401, "", "/doctor/dashboard", None);
    fx.handle.establish(session("expired", Role::Doctor)).unwrap();

    let err = block_on(fx.auth.send(ApiRequest::get("/doctor/appointments"))).unwrap_err();
    assert_eq!(err, ApiError::Unauthorized);
    assert!(err.is_unauthorized());
    assert!(!fx.handle.state().is_authenticated());
    assert_eq!(fx.handle.store().load(), None);
    assert_eq!(fx.nav.redirects(), vec!["/login".to_owned()]);
}

#[test]
fn unauthorized_on_login_page_does_not_redirect() {
    let fx = fixture(401, "", "/login", None);
    fx.handle.establish(session("expired", Role::Admin)).unwrap();

    assert!(block_on(fx.auth.send(ApiRequest::get("/x"))).is_err());
    assert!(!fx.handle.state().is_authenticated());
    assert!(fx.nav.redirects().is_empty());
}

#[test]
fn forbidden_keeps_session() {
    let fx = fixture(403, r#"{"message":"Doctors only"}"#, "/receptionist/dashboard", None);
    fx.handle.establish(session("t1", Role::Receptionist)).unwrap();

    let err = block_on(fx.auth.send(ApiRequest::get("/doctor/emr/1"))).unwrap_err();
    assert_eq!(err, ApiError::Forbidden { message: "Doctors only".to_owned() });
    assert!(fx.handle.state().is_authenticated());
    assert_eq!(fx.handle.stored_token().as_deref(), Some("t1"));
    assert!(fx.nav.redirects().is_empty());
}

#[test]
fn late_unauthorized_does_not_clear_newer_session() {
    let handle = handle();
    let relogin = handle.clone();
    let during: Hook = Box::new(move || {
        relogin.establish(session("fresh", Role::Admin)).unwrap();
    });
    let nav = RecordingNavigator::at("/admin/dashboard");
    let transport = ScriptedTransport { status: 401, body: "", seen: Arc::default(), during: Some(during) };
    let auth = RequestAuthenticator::new(transport, handle.clone(), nav.clone());
    handle.establish(session("stale", Role::Admin)).unwrap();

    assert_eq!(block_on(auth.send(ApiRequest::get("/admin/staff"))).unwrap_err(), ApiError::Unauthorized);
    assert_eq!(handle.state().token(), Some("fresh"));
    assert_eq!(handle.stored_token().as_deref(), Some("fresh"));
    assert!(nav.redirects().is_empty());
}

#[test]
fn late_success_after_logout_does_not_resurrect_session() {
    let handle = handle();
    let logout = handle.clone();
    let during: Hook = Box::new(move || logout.invalidate());
    let transport = ScriptedTransport { status: 200, body: "{}", seen: Arc::default(), during: Some(during) };
    let auth = RequestAuthenticator::new(transport, handle.clone(), RecordingNavigator::at("/"));
    handle.establish(session("t1", Role::Doctor)).unwrap();

    block_on(auth.send(ApiRequest::get("/doctor/dashboard"))).unwrap();
    assert_eq!(handle.state(), SessionState::signed_out());
    assert_eq!(handle.store().load(), None);
}

#[test]
fn other_errors_carry_status_and_message() {
    let fx = fixture(404, r#"{"error":"patient not found"}"#, "/", None);
    fx.handle.establish(session("t1", Role::Receptionist)).unwrap();

    let err = block_on(fx.auth.send(ApiRequest::get("/receptionist/patients/9"))).unwrap_err();
    assert_eq!(err, ApiError::Status { status: 404, message: "patient not found".to_owned() });
    assert!(fx.handle.state().is_authenticated());
}

#[test]
fn plain_text_and_empty_error_bodies_still_produce_messages() {
    let fx = fixture(500, "  boom  ", "/", None);
    assert_eq!(
        block_on(fx.auth.send(ApiRequest::get("/x"))).unwrap_err(),
        ApiError::Status { status: 500, message: "boom".to_owned() }
    );

    let fx = fixture(502, "", "/", None);
    assert_eq!(
        block_on(fx.auth.send(ApiRequest::get("/x"))).unwrap_err(),
        ApiError::Status { status: 502, message: "HTTP 502".to_owned() }
    );
}

#[test]
fn network_failure_leaves_session_alone() {
    let handle = handle();
    handle.establish(session("t1", Role::Admin)).unwrap();
    let auth = RequestAuthenticator::new(OfflineTransport, handle.clone(), RecordingNavigator::at("/"));

    let err = block_on(auth.send(ApiRequest::get("/admin/staff"))).unwrap_err();
    assert!(matches!(err, ApiError::Network(TransportError::Network(_))));
    assert!(handle.state().is_authenticated());
}

#[test]
fn json_helpers_forward_payloads_unchanged() {
    let fx = fixture(200, r#"{"id":7,"fullName":"Nguyen Van A"}"#, "/", None);
    fx.handle.establish(session("t1", Role::Receptionist)).unwrap();
    let payload = serde_json::json!({ "fullName": "Nguyen Van A", "phone": "0900" });

    let created: Value = block_on(fx.auth.post_json("/receptionist/patients", &payload)).unwrap();
    assert_eq!(created["id"], 7);

    let seen = fx.seen.lock().unwrap();
    assert_eq!(seen[0].method, Method::Post);
    assert_eq!(seen[0].body.as_ref(), Some(&payload));
}

#[test]
fn decode_failure_is_reported() {
    let fx = fixture(200, "not json", "/", None);
    let result: Result<Vec<String>, ApiError> = block_on(fx.auth.get_json("/services"));
    assert!(matches!(result, Err(ApiError::Decode(_))));
}

#[test]
fn delete_accepts_empty_reply() {
    let fx = fixture(204, "", "/", None);
    block_on(fx.auth.delete("/admin/medicines/3")).unwrap();
    assert_eq!(fx.seen.lock().unwrap()[0].method, Method::Delete);
}

#[test]
fn custom_login_path_is_honored() {
    let handle = handle();
    handle.establish(session("t1", Role::Admin)).unwrap();
    let nav = RecordingNavigator::at("/admin/dashboard");
    let transport = ScriptedTransport { status: 401, body: "", seen: Arc::default(), during: None };
    let auth = RequestAuthenticator::new(transport, handle, nav.clone()).with_login_path("/app/login");

    assert!(block_on(auth.send(ApiRequest::get("/x"))).is_err());
    assert_eq!(nav.redirects(), vec!["/app/login".to_owned()]);
}
