use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use crate::domain::{
    Credentials, ErrorCategory, FlagStorage, Identity, IdentityService, Navigator,
    NormalizedError, ProviderSignOut, Registration, Role, Route,
};

// Shared identity fixture for use-case tests.
pub(crate) fn identity(id: u64, role: Role) -> Identity {
    Identity {
        id,
        full_name: format!("Employee {id}"),
        email: format!("employee{id}@corp.test"),
        role,
        photo: None,
    }
}

// Minimal classified failure for scripted responses.
pub(crate) fn failure(status: u16, url: &str) -> NormalizedError {
    NormalizedError {
        status,
        category: ErrorCategory::from_status(status),
        message: format!("scripted failure {status}"),
        timestamp: Utc::now(),
        url: url.to_string(),
        cause: Value::Null,
    }
}

// Flag storage whose every call fails.
pub(crate) struct BrokenFlags;

impl FlagStorage for BrokenFlags {
    fn read(&self, _key: &str) -> Result<Option<String>, String> {
        Err("read failed".to_string())
    }

    fn write(&self, _key: &str, _value: &str) -> Result<(), String> {
        Err("write failed".to_string())
    }

    fn remove(&self, _key: &str) -> Result<(), String> {
        Err("remove failed".to_string())
    }
}

#[derive(Default)]
struct Script {
    login: VecDeque<Result<Identity, NormalizedError>>,
    register: VecDeque<Result<Identity, NormalizedError>>,
    exchange: VecDeque<Result<Identity, NormalizedError>>,
    profile: VecDeque<Result<Identity, NormalizedError>>,
    logout: VecDeque<Result<(), NormalizedError>>,
}

#[derive(Default)]
pub(crate) struct CallCounts {
    pub login: AtomicUsize,
    pub register: AtomicUsize,
    pub exchange: AtomicUsize,
    pub profile: AtomicUsize,
    pub logout: AtomicUsize,
}

// Identity service fake answering from per-operation queues.
// An empty queue answers with a 500 so unexpected calls fail loudly.
#[derive(Clone, Default)]
pub(crate) struct ScriptedIdentityService {
    script: Arc<Mutex<Script>>,
    pub calls: Arc<CallCounts>,
}

impl ScriptedIdentityService {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on_login(self, result: Result<Identity, NormalizedError>) -> Self {
        self.script.lock().expect("script mutex poisoned").login.push_back(result);
        self
    }

    pub(crate) fn on_register(self, result: Result<Identity, NormalizedError>) -> Self {
        self.script.lock().expect("script mutex poisoned").register.push_back(result);
        self
    }

    pub(crate) fn on_exchange(self, result: Result<Identity, NormalizedError>) -> Self {
        self.script.lock().expect("script mutex poisoned").exchange.push_back(result);
        self
    }

    pub(crate) fn on_profile(self, result: Result<Identity, NormalizedError>) -> Self {
        self.script.lock().expect("script mutex poisoned").profile.push_back(result);
        self
    }

    pub(crate) fn on_logout(self, result: Result<(), NormalizedError>) -> Self {
        self.script.lock().expect("script mutex poisoned").logout.push_back(result);
        self
    }

    pub(crate) fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityService for ScriptedIdentityService {
    async fn login(&self, _credentials: &Credentials) -> Result<Identity, NormalizedError> {
        self.calls.login.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().expect("script mutex poisoned").login.pop_front();
        next.unwrap_or_else(|| Err(failure(500, "/login")))
    }

    async fn register(&self, _registration: &Registration) -> Result<Identity, NormalizedError> {
        self.calls.register.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().expect("script mutex poisoned").register.pop_front();
        next.unwrap_or_else(|| Err(failure(500, "/register")))
    }

    async fn exchange_provider_token(&self, _token: &str) -> Result<Identity, NormalizedError> {
        self.calls.exchange.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().expect("script mutex poisoned").exchange.pop_front();
        next.unwrap_or_else(|| Err(failure(500, "/google-auth")))
    }

    async fn profile(&self) -> Result<Identity, NormalizedError> {
        self.calls.profile.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().expect("script mutex poisoned").profile.pop_front();
        next.unwrap_or_else(|| Err(failure(500, "/profile")))
    }

    async fn logout(&self) -> Result<(), NormalizedError> {
        self.calls.logout.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().expect("script mutex poisoned").logout.pop_front();
        next.unwrap_or_else(|| Err(failure(500, "/logout")))
    }
}

// Navigator that records every redirect it is asked to perform.
#[derive(Default)]
pub(crate) struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub(crate) fn routes(&self) -> Vec<Route> {
        self.routes.lock().expect("routes mutex poisoned").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().expect("routes mutex poisoned").push(route);
    }
}

// Provider sign-out hook with a configurable outcome.
#[derive(Default)]
pub(crate) struct RecordingSignOut {
    pub should_fail: bool,
    pub calls: AtomicUsize,
}

impl ProviderSignOut for RecordingSignOut {
    fn sign_out(&self) -> Result<(), String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err("provider sign-out failed".to_string());
        }
        Ok(())
    }
}
