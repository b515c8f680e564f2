// src/state.rs
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::services::metrics_manager::MetricsManager;
use crate::services::relay::RelayClient;
use crate::services::session_manager::SessionManager;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub sessions: SessionManager,
    pub metrics: MetricsManager,
    pub relay: RelayClient,
}

impl AppState {
    pub fn new(relay: RelayClient, session_ttl: Duration) -> Self {
        Self {
            sessions: SessionManager::new(session_ttl),
            metrics: MetricsManager::new(),
            relay,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let relay = RelayClient::new(&config.upstream_base_url, config.user_lang.clone());
        Self::new(relay, config.session_ttl)
    }
}
