// Fake identity service for integration tests, served on an ephemeral port.
#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::{Value, json};
use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};
use tokio::sync::mpsc::UnboundedReceiver;
use url::Url;

use staff_session::SessionConfig;
use staff_session::domain::{FlagStorage, Route};
use staff_session::frameworks::SessionRuntime;
use staff_session::interface_adapters::{ChannelNavigator, FileFlagStorage};
use staff_session::use_cases::FLAG_KEY;

pub const SESSION_COOKIE: &str = "sid=staff-42";
pub const GOOD_PASSWORD: &str = "correct horse";
pub const GOOD_PROVIDER_TOKEN: &str = "provider-token-ok";

// Knobs and counters shared between the test and the fake server.
#[derive(Default)]
pub struct FakeState {
    // When set, /profile answers without checking the session cookie.
    pub trust_profile: AtomicBool,
    pub fail_logout: AtomicBool,
    pub profile_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
}

pub struct FakeIdentityService {
    pub api_base_url: Url,
    pub state: Arc<FakeState>,
}

impl FakeIdentityService {
    pub fn profile_calls(&self) -> usize {
        self.state.profile_calls.load(Ordering::SeqCst)
    }

    pub fn logout_calls(&self) -> usize {
        self.state.logout_calls.load(Ordering::SeqCst)
    }
}

// Start the fake on the current runtime and return its `/api` base url.
pub async fn spawn_identity_service() -> FakeIdentityService {
    let state = Arc::new(FakeState::default());
    let app = Router::new()
        .route("/api/login", post(login))
        .route("/api/register", post(register))
        .route("/api/google-auth", post(google_auth))
        .route("/api/profile", get(profile))
        .route("/api/logout", post(logout))
        .route("/api/employees", get(employees))
        .route("/api/employees/{id}", put(employees).delete(employees))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake server failed");
    });

    FakeIdentityService {
        api_base_url: Url::parse(&format!("http://{addr}/api")).expect("valid base url"),
        state,
    }
}

// Runtime pointed at the fake, with its login hint kept under `dir`.
pub fn runtime_for(
    service: &FakeIdentityService,
    dir: &tempfile::TempDir,
) -> (SessionRuntime, UnboundedReceiver<Route>) {
    let config = SessionConfig {
        api_base_url: service.api_base_url.clone(),
        flag_path: dir.path().join("flag.json"),
        ..SessionConfig::default()
    };
    let (navigator, route_rx) = ChannelNavigator::new();
    let runtime = SessionRuntime::build(config, Arc::new(navigator)).expect("runtime builds");
    (runtime, route_rx)
}

pub fn seed_login_hint(dir: &tempfile::TempDir) {
    FileFlagStorage::new(dir.path().join("flag.json"))
        .write(FLAG_KEY, "authenticated")
        .expect("seed flag");
}

pub fn login_hint(dir: &tempfile::TempDir) -> Option<String> {
    FileFlagStorage::new(dir.path().join("flag.json"))
        .read(FLAG_KEY)
        .expect("read flag")
}

pub fn drain_routes(route_rx: &mut UnboundedReceiver<Route>) -> Vec<Route> {
    let mut routes = Vec::new();
    while let Ok(route) = route_rx.try_recv() {
        routes.push(route);
    }
    routes
}

fn staff_member(email: &str) -> Value {
    let (id, role) = if email.starts_with("admin") {
        (1, "ADMIN")
    } else {
        (7, "EMPLOYEE")
    };
    json!({
        "id": id,
        "fullName": "Test Person",
        "email": email,
        "role": role,
        "photo": null,
    })
}

fn with_session_cookie(body: Value) -> Response {
    (
        [(header::SET_COOKIE, format!("{SESSION_COOKIE}; Path=/; HttpOnly"))],
        Json(body),
    )
        .into_response()
}

fn rejection(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn has_session_cookie(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.split(';').any(|pair| pair.trim() == SESSION_COOKIE))
}

async fn login(Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    if body["password"].as_str() == Some(GOOD_PASSWORD) {
        with_session_cookie(staff_member(email))
    } else {
        rejection(StatusCode::UNAUTHORIZED, "Bad credentials")
    }
}

async fn register(Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    if email.starts_with("taken") {
        return rejection(StatusCode::CONFLICT, "Email already registered");
    }
    let mut member = staff_member(email);
    member["fullName"] = body["fullName"].clone();
    with_session_cookie(member)
}

async fn google_auth(Json(body): Json<Value>) -> Response {
    if body["token"].as_str() == Some(GOOD_PROVIDER_TOKEN) {
        with_session_cookie(staff_member("employee@corp.test"))
    } else {
        rejection(StatusCode::UNAUTHORIZED, "Invalid provider token")
    }
}

async fn profile(State(state): State<Arc<FakeState>>, headers: HeaderMap) -> Response {
    state.profile_calls.fetch_add(1, Ordering::SeqCst);
    if state.trust_profile.load(Ordering::SeqCst) || has_session_cookie(&headers) {
        Json(staff_member("admin@corp.test")).into_response()
    } else {
        rejection(StatusCode::UNAUTHORIZED, "Session expired")
    }
}

async fn logout(State(state): State<Arc<FakeState>>) -> Response {
    state.logout_calls.fetch_add(1, Ordering::SeqCst);
    if state.fail_logout.load(Ordering::SeqCst) {
        return rejection(StatusCode::INTERNAL_SERVER_ERROR, "Logout store unavailable");
    }
    (
        [(header::SET_COOKIE, "sid=; Path=/; Max-Age=0".to_string())],
        Json(json!({ "message": "Logged out" })),
    )
        .into_response()
}

// Always behaves like an endpoint hit with an expired session.
async fn employees() -> Response {
    rejection(StatusCode::UNAUTHORIZED, "Token expired")
}
