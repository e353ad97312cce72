//! Application state for dependency injection.

use std::sync::Arc;

use commerce_service_lib::ServiceContainer;

use crate::config::GatewayConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceContainer>,
    pub config: GatewayConfig,
}

impl AppState {
    /// Create new app state.
    pub fn new(services: Arc<dyn ServiceContainer>, config: GatewayConfig) -> Self {
        Self { services, config }
    }
}
