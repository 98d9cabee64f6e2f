// Use cases layer: session state and the workflows that drive it.

pub mod auth_client;
pub mod bootstrap;
pub mod guards;
pub mod session_store;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth_client::AuthClient;
pub use bootstrap::SessionBootstrapper;
pub use guards::{Guard, GuardDecision, GuardEvaluator};
pub use session_store::{FLAG_KEY, SessionStore};
