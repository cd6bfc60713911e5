// --- File: crates/expo_registro/src/routes.rs ---
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use expo_common::AppContext;
use std::sync::Arc;

use crate::admin::admin_auth_middleware;
use crate::handlers::{
    acompanante_handler, approve_handler, expositor_handler, invitacion_handler,
    list_solicitudes_handler, registro_handler, reject_handler, solicitud_handler, RegistroState,
};
use crate::uploads::IMAGE_BODY_LIMIT;

/// Public registration routes plus the secret-protected review routes.
pub fn routes(context: AppContext) -> Router {
    let state = Arc::new(RegistroState { context });

    let admin = Router::new()
        .route("/admin/solicitudes", get(list_solicitudes_handler))
        .route("/admin/solicitudes/{id}/aprobar", post(approve_handler))
        .route("/admin/solicitudes/{id}/rechazar", post(reject_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    Router::new()
        .route("/registro", post(registro_handler))
        .route("/registro/solicitud", post(solicitud_handler))
        .route("/registro/invitacion", get(invitacion_handler))
        .route("/registro/acompanante", post(acompanante_handler))
        .route(
            "/registro/expositor",
            post(expositor_handler).layer(DefaultBodyLimit::max(IMAGE_BODY_LIMIT)),
        )
        .merge(admin)
        .with_state(state)
}
