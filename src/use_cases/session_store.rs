// Process-wide session state container.

use std::sync::Arc;
use tokio::sync::watch;

use crate::domain::{FlagStorage, Identity, SessionState, SessionStatus};

/// Storage key of the "was logged in" hint.
pub const FLAG_KEY: &str = "isLogged";

/// Single-writer holder of the session state.
///
/// Readers get snapshots or subscribe to a watch receiver. Writes are
/// last-write-wins: two async operations that resolve out of order leave the
/// state of whichever wrote last.
pub struct SessionStore {
    state_tx: watch::Sender<SessionState>,
    flags: Arc<dyn FlagStorage>,
}

impl SessionStore {
    /// Creates a store in the `Checking` state.
    pub fn new(flags: Arc<dyn FlagStorage>) -> Self {
        let (state_tx, _state_rx) = watch::channel(SessionState::Checking);
        Self { state_tx, flags }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state_tx.borrow().clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.state_tx.borrow().status()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state_tx.borrow().identity().cloned()
    }

    pub fn is_admin(&self) -> bool {
        self.state_tx.borrow().is_admin()
    }

    pub fn is_employee(&self) -> bool {
        self.state_tx.borrow().is_employee()
    }

    /// Receiver notified on every state change. Dropping it unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Number of live subscriptions.
    pub fn observer_count(&self) -> usize {
        self.state_tx.receiver_count()
    }

    // Unreadable storage counts as "no hint".
    pub(crate) fn has_persisted_hint(&self) -> bool {
        match self.flags.read(FLAG_KEY) {
            Ok(value) => value.as_deref() == Some(SessionStatus::Authenticated.as_str()),
            Err(error) => {
                tracing::warn!(%error, "failed to read session flag");
                false
            }
        }
    }

    pub(crate) fn mark_authenticated(&self, identity: Identity) {
        let user_id = identity.id;
        let role = identity.role.clone();
        if self.transition(SessionState::Authenticated(identity)) {
            tracing::info!(user_id, %role, "session authenticated");
        }

        if let Err(error) = self
            .flags
            .write(FLAG_KEY, SessionStatus::Authenticated.as_str())
        {
            tracing::warn!(%error, "failed to persist session flag");
        }
    }

    pub(crate) fn mark_not_authenticated(&self) {
        if self.transition(SessionState::NotAuthenticated) {
            tracing::info!("session not authenticated");
        }

        if let Err(error) = self.flags.remove(FLAG_KEY) {
            tracing::warn!(%error, "failed to clear session flag");
        }
    }

    // Replace the held state; observers are only woken on an actual change.
    fn transition(&self, next: SessionState) -> bool {
        self.state_tx.send_if_modified(|state| {
            if *state == next {
                return false;
            }
            *state = next;
            true
        })
    }
}
