use std::sync::Arc;

use pokedex_core::{Config, QueryService, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    service: Arc<QueryService>,
}

impl AppState {
    pub fn new(config: Config, service: Arc<QueryService>) -> Self {
        Self { config, service }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn service(&self) -> &QueryService {
        self.service.as_ref()
    }
}
