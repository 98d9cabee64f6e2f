use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use crate::domain::{Credentials, Identity, IdentityService, NormalizedError, Registration};
use crate::interface_adapters::protocol::ProviderTokenRequest;
use crate::interface_adapters::request_guard::RequestGuard;

const LOGIN_PATH: &str = "/login";
const REGISTER_PATH: &str = "/register";
const PROFILE_PATH: &str = "/profile";
const LOGOUT_PATH: &str = "/logout";

// Identity service adapter speaking the JSON/HTTP contract.
// Every call goes through the request guard, so credentials and the 401 policy apply.
#[derive(Clone)]
pub struct HttpIdentityService {
    requests: Arc<RequestGuard>,
    provider_path: String,
}

impl HttpIdentityService {
    pub fn new(requests: Arc<RequestGuard>, provider: &str) -> Self {
        Self {
            requests,
            provider_path: provider_auth_path(provider),
        }
    }
}

// Token exchange endpoint for a federated provider, e.g. `google` -> `/google-auth`.
fn provider_auth_path(provider: &str) -> String {
    format!("/{}-auth", provider.trim().to_ascii_lowercase())
}

#[async_trait]
impl IdentityService for HttpIdentityService {
    async fn login(&self, credentials: &Credentials) -> Result<Identity, NormalizedError> {
        self.requests.post(LOGIN_PATH, credentials).await
    }

    async fn register(&self, registration: &Registration) -> Result<Identity, NormalizedError> {
        self.requests.post(REGISTER_PATH, registration).await
    }

    async fn exchange_provider_token(&self, token: &str) -> Result<Identity, NormalizedError> {
        self.requests
            .post(&self.provider_path, &ProviderTokenRequest { token })
            .await
    }

    async fn profile(&self) -> Result<Identity, NormalizedError> {
        self.requests.get(PROFILE_PATH).await
    }

    async fn logout(&self) -> Result<(), NormalizedError> {
        self.requests.post_no_content(LOGOUT_PATH, &json!({})).await
    }
}
