// Navigation guards gating entry to protected routes.

use std::sync::Arc;
use tokio::sync::watch;

use crate::domain::{Navigator, Route, SessionState, landing_route_for};
use crate::use_cases::session_store::SessionStore;

/// The four route predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Guard {
    RequireAuthenticated,
    RequireNotAuthenticated,
    RequireAdmin,
    RequireEmployee,
}

/// Outcome of a guard: proceed, or go to the fallback route instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Deny(Route),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

impl Guard {
    /// Pure decision over a session snapshot. `None` while still checking.
    pub fn decide(self, state: &SessionState) -> Option<GuardDecision> {
        let identity = match state {
            SessionState::Checking => return None,
            SessionState::Authenticated(identity) => Some(identity),
            SessionState::NotAuthenticated => None,
        };

        let decision = match self {
            Guard::RequireAuthenticated => match identity {
                Some(_) => GuardDecision::Allow,
                None => GuardDecision::Deny(Route::Login),
            },
            Guard::RequireNotAuthenticated => match identity {
                Some(identity) => GuardDecision::Deny(landing_route_for(Some(&identity.role))),
                None => GuardDecision::Allow,
            },
            Guard::RequireAdmin => {
                if state.is_admin() {
                    GuardDecision::Allow
                } else {
                    GuardDecision::Deny(Route::EmployeeProfile)
                }
            }
            Guard::RequireEmployee => {
                if state.is_employee() {
                    GuardDecision::Allow
                } else {
                    GuardDecision::Deny(Route::Login)
                }
            }
        };
        Some(decision)
    }
}

/// Evaluates guards against the live session.
///
/// Each evaluation subscribes, skips `Checking`, and decides on the first
/// stable state; later changes do not re-run it. There is no timeout: if the
/// bootstrap never resolves, the evaluation waits until it is dropped.
#[derive(Clone)]
pub struct GuardEvaluator {
    store: Arc<SessionStore>,
}

impl GuardEvaluator {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    pub async fn evaluate(&self, guard: Guard) -> GuardDecision {
        let stable = first_stable(self.store.subscribe()).await;

        let decision = guard
            .decide(&stable)
            .unwrap_or(GuardDecision::Deny(Route::Login));
        tracing::debug!(?guard, ?decision, status = %stable.status(), "guard evaluated");
        decision
    }

    /// Evaluates and, on deny, issues exactly one redirect to the fallback.
    pub async fn check(&self, guard: Guard, navigator: &dyn Navigator) -> bool {
        match self.evaluate(guard).await {
            GuardDecision::Allow => true,
            GuardDecision::Deny(route) => {
                navigator.navigate(route);
                false
            }
        }
    }
}

// First non-`Checking` state on the stream. A closed stream fails closed.
// `evaluate` holds the store, so only standalone receivers can hit that arm.
async fn first_stable(mut session_rx: watch::Receiver<SessionState>) -> SessionState {
    // Clone out of the watch borrow; the borrow holds a read lock.
    match session_rx
        .wait_for(|state| state.status().is_stable())
        .await
    {
        Ok(state) => state.clone(),
        Err(_) => {
            tracing::warn!("session stream closed before it settled");
            SessionState::NotAuthenticated
        }
    }
}
