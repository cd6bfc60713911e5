// --- File: crates/expo_common/src/context.rs ---
use expo_config::AppConfig;
use std::sync::Arc;

use crate::repository::Repository;
use crate::services::ServiceFactory;

const DEFAULT_EMPRESA_ID: &str = "default";

/// Configuration plus service handles, shared by every feature router.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub services: Arc<dyn ServiceFactory>,
}

impl AppContext {
    pub fn new(config: Arc<AppConfig>, services: Arc<dyn ServiceFactory>) -> Self {
        Self { config, services }
    }

    /// Tenant id under `empresas/`.
    pub fn empresa_id(&self) -> &str {
        self.config
            .firebase
            .as_ref()
            .map(|f| f.empresa_id.as_str())
            .unwrap_or(DEFAULT_EMPRESA_ID)
    }

    pub fn repository(&self) -> Repository {
        Repository::new(self.services.document_store(), self.empresa_id())
    }
}

/// Router states that can hand out the shared [`AppContext`].
pub trait ContextProvider {
    fn context(&self) -> &AppContext;
}

impl ContextProvider for AppContext {
    fn context(&self) -> &AppContext {
        self
    }
}

impl<T: ContextProvider> ContextProvider for Arc<T> {
    fn context(&self) -> &AppContext {
        self.as_ref().context()
    }
}
