use std::sync::Arc;
use thiserror::Error;

use crate::domain::{Navigator, Route, SessionStatus, landing_route_for, route_after_error};
use crate::frameworks::config::{ConfigError, SessionConfig};
use crate::frameworks::telemetry::init_tracing;
use crate::interface_adapters::{
    ChannelNavigator, FileFlagStorage, HttpIdentityService, RequestGuard,
};
use crate::use_cases::{AuthClient, GuardEvaluator, SessionBootstrapper, SessionStore};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Fully wired session core: one store shared by every component.
pub struct SessionRuntime {
    pub config: SessionConfig,
    pub store: Arc<SessionStore>,
    pub requests: Arc<RequestGuard>,
    pub auth: AuthClient<HttpIdentityService>,
    pub guards: GuardEvaluator,
    bootstrapper: Option<SessionBootstrapper<HttpIdentityService>>,
}

impl SessionRuntime {
    pub fn build(
        config: SessionConfig,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, StartupError> {
        let flags = Arc::new(FileFlagStorage::new(&config.flag_path));
        let store = Arc::new(SessionStore::new(flags));
        let requests = Arc::new(RequestGuard::new(
            &config.api_base_url,
            config.request_timeout(),
            store.clone(),
            navigator,
        )?);
        let identity = HttpIdentityService::new(requests.clone(), &config.federated_provider);

        tracing::debug!(
            api_base_url = %config.api_base_url,
            flag_path = %config.flag_path.display(),
            "session runtime wired"
        );

        Ok(Self {
            auth: AuthClient::new(identity.clone(), store.clone()),
            guards: GuardEvaluator::new(store.clone()),
            bootstrapper: Some(SessionBootstrapper::new(identity, store.clone())),
            config,
            store,
            requests,
        })
    }

    // Runs startup reconciliation the first time; later calls report the current status.
    pub async fn bootstrap(&mut self) -> SessionStatus {
        match self.bootstrapper.take() {
            Some(bootstrapper) => bootstrapper.run().await,
            None => self.store.status(),
        }
    }

    // Where the UI should go once the session is settled.
    pub fn landing_route(&self) -> Option<Route> {
        let state = self.store.snapshot();
        match state.status() {
            SessionStatus::Authenticated => {
                Some(landing_route_for(state.identity().map(|identity| &identity.role)))
            }
            status => route_after_error(status),
        }
    }
}

/// Diagnostic entry point: resolves the persisted session once and reports it.
pub async fn run() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = match SessionConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return;
        }
    };

    let (navigator, mut route_rx) = ChannelNavigator::new();
    let mut runtime = match SessionRuntime::build(config, Arc::new(navigator)) {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!(error = %e, "failed to start session runtime");
            return;
        }
    };

    let status = runtime.bootstrap().await;
    let identity = runtime.store.identity();
    tracing::info!(
        %status,
        user_id = identity.as_ref().map(|identity| identity.id),
        role = identity.as_ref().map(|identity| identity.role.as_str()),
        landing = runtime.landing_route().map(|route| route.path()),
        "session resolved"
    );

    while let Ok(route) = route_rx.try_recv() {
        tracing::info!(%route, "redirect requested");
    }
}
