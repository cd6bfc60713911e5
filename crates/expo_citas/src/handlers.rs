// File: crates/expo_citas/src/handlers.rs
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use expo_common::models::{Cita, TipoParticipante};
use expo_common::{AppContext, ContextProvider, ExpoError, Session};
use serde::Deserialize;
use std::sync::Arc;

use crate::logic::{FechasResponse, SlotsResponse};
use crate::service::{
    self, CitasResponse, ProponerCitaRequest, ReagendarCitaRequest, RechazarCitaRequest,
};

#[derive(Clone)]
pub struct CitasState {
    pub context: AppContext,
}

impl ContextProvider for CitasState {
    fn context(&self) -> &AppContext {
        &self.context
    }
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct ParticipanteQuery {
    pub tipo: TipoParticipante,
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct DisponibilidadQuery {
    pub tipo: TipoParticipante,
    pub id: String,
    /// "YYYY-MM-DD"
    pub fecha: String,
}

/// Citas of the signed-in participant, on either side.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/citas",
    responses(
        (status = 200, description = "Citas sorted by date and time", body = CitasResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "Citas"
))]
pub async fn list_citas_handler(
    State(state): State<Arc<CitasState>>,
    session: Session,
) -> Result<Json<CitasResponse>, ExpoError> {
    service::list(&state.context, &session.participante)
        .await
        .map(Json)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/citas",
    request_body = ProponerCitaRequest,
    responses(
        (status = 200, description = "Cita created as pendiente", body = Cita),
        (status = 400, description = "Malformed date or time, or not an event day"),
        (status = 404, description = "Counterpart not found"),
        (status = 409, description = "Slot no longer available")
    ),
    security(("bearer" = [])),
    tag = "Citas"
))]
pub async fn propose_cita_handler(
    State(state): State<Arc<CitasState>>,
    session: Session,
    Json(request): Json<ProponerCitaRequest>,
) -> Result<Json<Cita>, ExpoError> {
    service::propose(&state.context, &session.participante, request)
        .await
        .map(Json)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/citas/{id}/aceptar",
    params(("id" = String, Path, description = "Cita id")),
    responses(
        (status = 200, description = "Cita confirmed", body = Cita),
        (status = 403, description = "Waiting for the other participant"),
        (status = 404, description = "Cita not found"),
        (status = 409, description = "Cita already confirmed or rejected")
    ),
    security(("bearer" = [])),
    tag = "Citas"
))]
pub async fn accept_cita_handler(
    State(state): State<Arc<CitasState>>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<Cita>, ExpoError> {
    service::accept(&state.context, &session.participante, &id)
        .await
        .map(Json)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/citas/{id}/rechazar",
    params(("id" = String, Path, description = "Cita id")),
    request_body = RechazarCitaRequest,
    responses(
        (status = 200, description = "Cita rejected", body = Cita),
        (status = 403, description = "Waiting for the other participant"),
        (status = 404, description = "Cita not found"),
        (status = 409, description = "Cita already confirmed or rejected")
    ),
    security(("bearer" = [])),
    tag = "Citas"
))]
pub async fn reject_cita_handler(
    State(state): State<Arc<CitasState>>,
    session: Session,
    Path(id): Path<String>,
    Json(request): Json<RechazarCitaRequest>,
) -> Result<Json<Cita>, ExpoError> {
    service::reject(&state.context, &session.participante, &id, request)
        .await
        .map(Json)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/citas/{id}/reagendar",
    params(("id" = String, Path, description = "Cita id")),
    request_body = ReagendarCitaRequest,
    responses(
        (status = 200, description = "Cita moved and waiting for the counterpart", body = Cita),
        (status = 404, description = "Cita not found"),
        (status = 409, description = "Cita rejected or slot not available")
    ),
    security(("bearer" = [])),
    tag = "Citas"
))]
pub async fn reschedule_cita_handler(
    State(state): State<Arc<CitasState>>,
    session: Session,
    Path(id): Path<String>,
    Json(request): Json<ReagendarCitaRequest>,
) -> Result<Json<Cita>, ExpoError> {
    service::reschedule(&state.context, &session.participante, &id, request)
        .await
        .map(Json)
}

/// Event days on which the given participant has free slots.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/citas/fechas",
    params(ParticipanteQuery),
    responses(
        (status = 200, description = "Candidate dates", body = FechasResponse),
        (status = 404, description = "Participant not found")
    ),
    security(("bearer" = [])),
    tag = "Citas"
))]
pub async fn fechas_handler(
    State(state): State<Arc<CitasState>>,
    _session: Session,
    Query(query): Query<ParticipanteQuery>,
) -> Result<Json<FechasResponse>, ExpoError> {
    service::fechas(&state.context, query.tipo, &query.id)
        .await
        .map(Json)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/citas/disponibilidad",
    params(DisponibilidadQuery),
    responses(
        (status = 200, description = "Free 30-minute slots on that date", body = SlotsResponse),
        (status = 400, description = "Malformed date"),
        (status = 404, description = "Participant not found")
    ),
    security(("bearer" = [])),
    tag = "Citas"
))]
pub async fn disponibilidad_handler(
    State(state): State<Arc<CitasState>>,
    _session: Session,
    Query(query): Query<DisponibilidadQuery>,
) -> Result<Json<SlotsResponse>, ExpoError> {
    service::disponibilidad(&state.context, query.tipo, &query.id, &query.fecha)
        .await
        .map(Json)
}
