// --- File: crates/services/expo_backend/src/app_state.rs ---
use expo_common::services::ServiceFactory;
use expo_common::{AppContext, ExpoError};
use expo_config::AppConfig;
use std::sync::Arc;

use crate::service_factory::ExpoServiceFactory;

/// Application state shared by every feature router: the loaded
/// configuration and the service handles built from it.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub service_factory: Arc<dyn ServiceFactory>,
}

impl AppState {
    /// Build the production state, with Firebase and the email endpoint.
    pub fn new(config: Arc<AppConfig>) -> Result<Self, ExpoError> {
        let service_factory = Arc::new(ExpoServiceFactory::new(&config)?);
        Ok(Self::with_services(config, service_factory))
    }

    /// State over an arbitrary service factory, e.g. the in-memory fakes.
    pub fn with_services(config: Arc<AppConfig>, service_factory: Arc<dyn ServiceFactory>) -> Self {
        Self {
            config,
            service_factory,
        }
    }

    pub fn context(&self) -> AppContext {
        AppContext::new(self.config.clone(), self.service_factory.clone())
    }
}
