// One-shot startup reconciliation of the persisted login hint with the server.

use std::sync::Arc;

use crate::domain::{IdentityService, SessionStatus};
use crate::use_cases::session_store::SessionStore;

/// Resolves the initial session state.
///
/// `run` consumes the bootstrapper, so it executes at most once. The store
/// stays `Checking` until the profile fetch resolves.
pub struct SessionBootstrapper<I> {
    pub identity: I,
    pub store: Arc<SessionStore>,
}

impl<I> SessionBootstrapper<I>
where
    I: IdentityService,
{
    pub fn new(identity: I, store: Arc<SessionStore>) -> Self {
        Self { identity, store }
    }

    #[tracing::instrument(name = "bootstrap_session", skip_all)]
    pub async fn run(self) -> SessionStatus {
        if !self.store.has_persisted_hint() {
            tracing::debug!("no persisted session hint; skipping profile fetch");
            self.store.mark_not_authenticated();
            return self.store.status();
        }

        match self.identity.profile().await {
            Ok(identity) => {
                tracing::debug!(user_id = identity.id, "profile confirmed persisted session");
                self.store.mark_authenticated(identity);
            }
            Err(error) => {
                tracing::info!(status = error.status, %error, "profile fetch failed; session discarded");
                self.store.mark_not_authenticated();
            }
        }
        self.store.status()
    }
}
