// --- File: crates/services/expo_backend/src/router.rs ---
use axum::{routing::get, Router};
use std::path::Path;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::app_state::AppState;

const WELCOME: &str = "Welcome to the Expo Empresarios de la Baja API!";

/// Every feature router, unprefixed. Nested under `/api` by [`app`].
pub fn api_routes(state: &AppState) -> Router {
    let context = state.context();

    Router::new()
        .route("/", get(|| async { WELCOME }))
        .merge(expo_site::routes(state.config.clone()))
        .merge(expo_registro::routes(context.clone()))
        .merge(expo_citas::routes(context.clone()))
        .merge(expo_portal::routes(context))
}

/// The full application: `/api`, Swagger UI when built with `openapi`,
/// and the single-page frontend from `site.static_dir`.
pub fn app(state: &AppState) -> Router {
    let mut app = Router::new().nest("/api", api_routes(state));

    #[cfg(feature = "openapi")]
    {
        use utoipa_swagger_ui::SwaggerUi;

        info!("Adding Swagger UI at /api/docs");
        app = app.merge(
            SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", crate::doc::openapi()),
        );
    }

    if let Some(dir) = state.config.site.static_dir.as_deref() {
        let index = Path::new(dir).join("index.html");
        if !index.exists() {
            warn!("{} does not exist; client routes will answer 404", index.display());
        }
        info!("Serving static files from {}", dir);
        // Unknown paths fall back to index.html so the client router can
        // resolve /perfil, /citas, /expositores/{id} and the rest.
        app = app.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
    }

    app.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    )
    .layer(TraceLayer::new_for_http())
}
