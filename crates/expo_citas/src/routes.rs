// File: crates/expo_citas/src/routes.rs
use axum::{
    routing::{get, post},
    Router,
};
use expo_common::AppContext;
use std::sync::Arc;

use crate::handlers::{
    accept_cita_handler, disponibilidad_handler, fechas_handler, list_citas_handler,
    propose_cita_handler, reject_cita_handler, reschedule_cita_handler, CitasState,
};

/// Appointment routes. Every route requires a signed-in participant.
pub fn routes(context: AppContext) -> Router {
    let state = Arc::new(CitasState { context });

    Router::new()
        .route("/citas", get(list_citas_handler).post(propose_cita_handler))
        .route("/citas/fechas", get(fechas_handler))
        .route("/citas/disponibilidad", get(disponibilidad_handler))
        .route("/citas/{id}/aceptar", post(accept_cita_handler))
        .route("/citas/{id}/rechazar", post(reject_cita_handler))
        .route("/citas/{id}/reagendar", post(reschedule_cita_handler))
        .with_state(state)
}
