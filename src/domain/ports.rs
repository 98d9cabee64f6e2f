use async_trait::async_trait;

use crate::domain::entities::{Credentials, Identity, Registration};
use crate::domain::errors::NormalizedError;
use crate::domain::navigation::Route;

// Port for the remote identity service. Every failure is already classified.
#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<Identity, NormalizedError>;
    async fn register(&self, registration: &Registration) -> Result<Identity, NormalizedError>;
    async fn exchange_provider_token(&self, token: &str) -> Result<Identity, NormalizedError>;
    async fn profile(&self) -> Result<Identity, NormalizedError>;
    async fn logout(&self) -> Result<(), NormalizedError>;
}

// Port for durable client-side key/value storage holding the login hint.
pub trait FlagStorage: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, String>;
    fn write(&self, key: &str, value: &str) -> Result<(), String>;
    fn remove(&self, key: &str) -> Result<(), String>;
}

// Port for the router that performs redirects.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

// Port for signing out of a third-party identity provider on this device.
pub trait ProviderSignOut: Send + Sync {
    fn sign_out(&self) -> Result<(), String>;
}
