//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::service::RelayService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Relay service owning the view store.
    pub relay: Arc<RelayService>,
    /// Configuration the routes were built from.
    pub config: Arc<RelayConfig>,
}

impl AppState {
    /// Builds the state for `config` with a fresh relay.
    #[must_use]
    pub fn new(config: RelayConfig) -> Self {
        Self {
            relay: Arc::new(RelayService::new(config.event_bus_capacity)),
            config: Arc::new(config),
        }
    }
}
