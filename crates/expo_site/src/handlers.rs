// --- File: crates/expo_site/src/handlers.rs ---
use axum::{extract::State, response::Json};
use chrono::Utc;
use expo_config::AppConfig;
use std::sync::Arc;
use tracing::debug;

use crate::countdown::CountdownView;
use crate::logic::{countdown_at, galeria, landing, GaleriaResponse, LandingResponse};

#[derive(Clone)]
pub struct SiteState {
    pub config: Arc<AppConfig>,
}

/// Everything the home page needs in one call.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/site/landing",
    responses(
        (status = 200, description = "Event info, hero carousel, raffle and countdown", body = LandingResponse)
    ),
    tag = "Site"
))]
pub async fn landing_handler(State(state): State<Arc<SiteState>>) -> Json<LandingResponse> {
    debug!("Serving landing data");
    Json(landing(&state.config, Utc::now()))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/site/countdown",
    responses(
        (status = 200, description = "Time left until the event opens", body = CountdownView)
    ),
    tag = "Site"
))]
pub async fn countdown_handler(State(state): State<Arc<SiteState>>) -> Json<CountdownView> {
    Json(countdown_at(&state.config, Utc::now()))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/site/galeria",
    responses(
        (status = 200, description = "Photo gallery of past editions", body = GaleriaResponse)
    ),
    tag = "Site"
))]
pub async fn galeria_handler(State(state): State<Arc<SiteState>>) -> Json<GaleriaResponse> {
    Json(galeria(&state.config))
}
