// --- File: crates/expo_registro/src/handlers.rs ---
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use expo_common::models::Solicitud;
use expo_common::{AppContext, ExpoError};
use std::sync::Arc;

use crate::form::RegistroForm;
use crate::service::{
    self, AprobacionResponse, InvitacionQuery, InvitacionView, RegistroResponse,
    SolicitudResponse, SolicitudesResponse,
};

#[derive(Clone)]
pub struct RegistroState {
    pub context: AppContext,
}

/// Self-service registration request, reviewed by the organizers.
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/registro/solicitud",
    request_body = RegistroForm,
    responses(
        (status = 200, description = "Request stored", body = SolicitudResponse),
        (status = 400, description = "Missing or invalid fields")
    ),
    tag = "Registro"
))]
pub async fn solicitud_handler(
    State(state): State<Arc<RegistroState>>,
    Json(form): Json<RegistroForm>,
) -> Result<Json<SolicitudResponse>, ExpoError> {
    service::submit_solicitud(&state.context, form)
        .await
        .map(Json)
}

/// Which form branch an invitation link opens.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/registro/invitacion",
    params(InvitacionQuery),
    responses(
        (status = 200, description = "Invited record and required fields", body = InvitacionView),
        (status = 403, description = "Invalid token"),
        (status = 404, description = "Invitation not found"),
        (status = 409, description = "Invitation already used")
    ),
    tag = "Registro"
))]
pub async fn invitacion_handler(
    State(state): State<Arc<RegistroState>>,
    Query(query): Query<InvitacionQuery>,
) -> Result<Json<InvitacionView>, ExpoError> {
    service::invitation(&state.context, &query).await.map(Json)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/registro",
    params(InvitacionQuery),
    request_body = RegistroForm,
    responses(
        (status = 200, description = "Registration confirmed", body = RegistroResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 403, description = "Invalid token"),
        (status = 409, description = "Invitation already used or email taken")
    ),
    tag = "Registro"
))]
pub async fn registro_handler(
    State(state): State<Arc<RegistroState>>,
    Query(query): Query<InvitacionQuery>,
    Json(form): Json<RegistroForm>,
) -> Result<Json<RegistroResponse>, ExpoError> {
    service::complete_invitation(&state.context, &query, form)
        .await
        .map(Json)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/registro/acompanante",
    params(InvitacionQuery),
    request_body = RegistroForm,
    responses(
        (status = 200, description = "Companion registration confirmed", body = RegistroResponse),
        (status = 400, description = "Missing fields, or not a companion invitation"),
        (status = 403, description = "Invalid token")
    ),
    tag = "Registro"
))]
pub async fn acompanante_handler(
    State(state): State<Arc<RegistroState>>,
    Query(query): Query<InvitacionQuery>,
    Json(form): Json<RegistroForm>,
) -> Result<Json<RegistroResponse>, ExpoError> {
    service::complete_acompanante(&state.context, &query, form)
        .await
        .map(Json)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/registro/expositor",
    request_body = RegistroForm,
    responses(
        (status = 200, description = "Exhibitor account created", body = RegistroResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 409, description = "Email already registered")
    ),
    tag = "Registro"
))]
pub async fn expositor_handler(
    State(state): State<Arc<RegistroState>>,
    Json(form): Json<RegistroForm>,
) -> Result<Json<RegistroResponse>, ExpoError> {
    service::register_expositor(&state.context, form)
        .await
        .map(Json)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/admin/solicitudes",
    responses(
        (status = 200, description = "All requests, newest first", body = SolicitudesResponse),
        (status = 401, description = "Missing or wrong X-Admin-Secret")
    ),
    tag = "Admin"
))]
pub async fn list_solicitudes_handler(
    State(state): State<Arc<RegistroState>>,
) -> Result<Json<SolicitudesResponse>, ExpoError> {
    service::list_solicitudes(&state.context).await.map(Json)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/admin/solicitudes/{id}/aprobar",
    params(("id" = String, Path, description = "Solicitud id")),
    responses(
        (status = 200, description = "Contacto created and invited", body = AprobacionResponse),
        (status = 401, description = "Missing or wrong X-Admin-Secret"),
        (status = 404, description = "Solicitud not found"),
        (status = 409, description = "Already processed or email taken")
    ),
    tag = "Admin"
))]
pub async fn approve_handler(
    State(state): State<Arc<RegistroState>>,
    Path(id): Path<String>,
) -> Result<Json<AprobacionResponse>, ExpoError> {
    service::approve_solicitud(&state.context, &id)
        .await
        .map(Json)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/admin/solicitudes/{id}/rechazar",
    params(("id" = String, Path, description = "Solicitud id")),
    responses(
        (status = 200, description = "Solicitud rejected", body = Solicitud),
        (status = 401, description = "Missing or wrong X-Admin-Secret"),
        (status = 409, description = "Already processed")
    ),
    tag = "Admin"
))]
pub async fn reject_handler(
    State(state): State<Arc<RegistroState>>,
    Path(id): Path<String>,
) -> Result<Json<Solicitud>, ExpoError> {
    service::reject_solicitud(&state.context, &id)
        .await
        .map(Json)
}
