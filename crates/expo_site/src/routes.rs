// --- File: crates/expo_site/src/routes.rs ---
use axum::{routing::get, Router};
use expo_config::AppConfig;
use std::sync::Arc;

use crate::handlers::{countdown_handler, galeria_handler, landing_handler, SiteState};

/// Public, unauthenticated routes backing the landing and gallery pages.
pub fn routes(config: Arc<AppConfig>) -> Router {
    let state = Arc::new(SiteState { config });

    Router::new()
        .route("/site/landing", get(landing_handler))
        .route("/site/countdown", get(countdown_handler))
        .route("/site/galeria", get(galeria_handler))
        .with_state(state)
}
