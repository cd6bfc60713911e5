// File: crates/expo_portal/src/routes.rs
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use expo_common::AppContext;
use expo_registro::uploads::IMAGE_BODY_LIMIT;
use std::sync::Arc;

use crate::handlers::{
    add_galeria_handler, colaborador_handler, contactos_handler, disponibilidad_handler,
    expositor_handler, expositores_handler, get_perfil_handler, login_handler, logo_handler,
    password_change_handler, password_reset_handler, perfil_publico_handler,
    remove_galeria_handler, update_perfil_handler, PortalState,
};

/// Account, profile and directory routes. Login, password reset and the
/// exhibitor listing are public; the rest require a Bearer token.
pub fn routes(context: AppContext) -> Router {
    let state = Arc::new(PortalState { context });

    Router::new()
        .route("/auth/login", post(login_handler))
        .route("/auth/password-reset", post(password_reset_handler))
        .route("/auth/password-change", post(password_change_handler))
        .route("/perfil", get(get_perfil_handler).patch(update_perfil_handler))
        .route("/perfil/disponibilidad", put(disponibilidad_handler))
        .route(
            "/perfil/logo",
            post(logo_handler).layer(DefaultBodyLimit::max(IMAGE_BODY_LIMIT)),
        )
        .route(
            "/perfil/galeria",
            post(add_galeria_handler)
                .layer(DefaultBodyLimit::max(IMAGE_BODY_LIMIT))
                .delete(remove_galeria_handler),
        )
        .route("/perfil/colaboradores", post(colaborador_handler))
        .route("/contactos", get(contactos_handler))
        .route("/contactos/{tipo}/{id}", get(perfil_publico_handler))
        .route("/expositores", get(expositores_handler))
        .route("/expositores/{id}", get(expositor_handler))
        .with_state(state)
}
