// Login, registration, federated login and logout against the identity service.

use std::sync::Arc;

use crate::domain::{
    AuthError, Credentials, Identity, IdentityService, NormalizedError, ProviderSignOut,
    Registration,
};
use crate::use_cases::session_store::SessionStore;

/// Auth workflows with injected dependencies.
///
/// Each operation is a single round trip. Failures reset the session and are
/// returned to the caller; nothing is retried here.
pub struct AuthClient<I> {
    pub identity: I,
    pub store: Arc<SessionStore>,
    pub provider: Option<Arc<dyn ProviderSignOut>>,
}

impl<I> AuthClient<I>
where
    I: IdentityService,
{
    pub fn new(identity: I, store: Arc<SessionStore>) -> Self {
        Self {
            identity,
            store,
            provider: None,
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn ProviderSignOut>) -> Self {
        self.provider = Some(provider);
        self
    }

    #[tracing::instrument(name = "login", skip_all, fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Identity, AuthError> {
        let result = self.identity.login(credentials).await;
        self.settle(result)
    }

    #[tracing::instrument(name = "register_user", skip_all, fields(email = %registration.email))]
    pub async fn register_user(&self, registration: &Registration) -> Result<Identity, AuthError> {
        let result = self.identity.register(registration).await;
        self.settle(result)
    }

    #[tracing::instrument(name = "federated_login", skip_all)]
    pub async fn federated_login(&self, provider_token: &str) -> Result<Identity, AuthError> {
        // Rejected before any request; the session is left as it was.
        if provider_token.trim().is_empty() {
            tracing::warn!("federated login attempted without a provider token");
            return Err(AuthError::InvalidToken);
        }

        let result = self.identity.exchange_provider_token(provider_token).await;
        self.settle(result)
    }

    /// Ends the session. The local reset happens before the server call, so
    /// it holds even if this future is dropped; the returned result only
    /// reports whether the server accepted the logout.
    #[tracing::instrument(name = "logout", skip_all)]
    pub async fn logout(&self) -> Result<(), NormalizedError> {
        if let Some(provider) = &self.provider {
            if let Err(error) = provider.sign_out() {
                tracing::warn!(%error, "provider sign-out failed");
            }
        }

        // The server session rides on the cookie jar, not the store, so the
        // request below still carries it.
        self.store.mark_not_authenticated();
        let result = self.identity.logout().await;

        match &result {
            Ok(()) => tracing::info!("logged out"),
            Err(error) => {
                tracing::warn!(status = error.status, %error, "server logout failed; session reset locally")
            }
        }
        result
    }

    // Fail closed: any failure leaves the session unauthenticated.
    fn settle(&self, result: Result<Identity, NormalizedError>) -> Result<Identity, AuthError> {
        match result {
            Ok(identity) => {
                self.store.mark_authenticated(identity.clone());
                Ok(identity)
            }
            Err(error) => {
                self.store.mark_not_authenticated();
                Err(AuthError::Request(error))
            }
        }
    }
}
