// --- File: crates/expo_portal/src/handlers.rs ---
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use expo_common::models::{Disponibilidad, Participante, TipoParticipante};
use expo_common::{AppContext, ContextProvider, ExpoError, Session};
use expo_registro::form::ImagenForm;
use std::sync::Arc;

use crate::cuenta::{self, LoginRequest, LoginResponse, PasswordChangeRequest, PasswordResetRequest};
use crate::directorio::{self, DirectorioResponse, PerfilPublico};
use crate::perfil::{
    self, ColaboradorRequest, ColaboradorResponse, GaleriaDeleteRequest, GaleriaRequest,
    GaleriaResponse, LogoResponse, PerfilUpdate,
};

#[derive(Clone)]
pub struct PortalState {
    pub context: AppContext,
}

impl ContextProvider for PortalState {
    fn context(&self) -> &AppContext {
        &self.context
    }
}

// --- Account ---

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 401, description = "Wrong email or password"),
        (status = 403, description = "Account has no participant record"),
        (status = 504, description = "Auth service did not answer in time")
    ),
    tag = "Cuenta"
))]
pub async fn login_handler(
    State(state): State<Arc<PortalState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ExpoError> {
    cuenta::login(&state.context, request).await.map(Json)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/auth/password-reset",
    request_body = PasswordResetRequest,
    responses(
        (status = 204, description = "Reset email sent"),
        (status = 400, description = "Missing email")
    ),
    tag = "Cuenta"
))]
pub async fn password_reset_handler(
    State(state): State<Arc<PortalState>>,
    Json(request): Json<PasswordResetRequest>,
) -> Result<StatusCode, ExpoError> {
    cuenta::password_reset(&state.context, request).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/auth/password-change",
    request_body = PasswordChangeRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "New password rejected"),
        (status = 401, description = "Current password is wrong")
    ),
    security(("bearer" = [])),
    tag = "Cuenta"
))]
pub async fn password_change_handler(
    State(state): State<Arc<PortalState>>,
    session: Session,
    Json(request): Json<PasswordChangeRequest>,
) -> Result<StatusCode, ExpoError> {
    cuenta::password_change(&state.context, &session.email, &session.id_token, request).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Profile ---

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/perfil",
    responses(
        (status = 200, description = "The signed-in participant", body = Participante),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "Perfil"
))]
pub async fn get_perfil_handler(session: Session) -> Json<Participante> {
    Json(session.participante)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    patch,
    path = "/perfil",
    request_body = PerfilUpdate,
    responses(
        (status = 200, description = "Updated participant", body = Participante),
        (status = 400, description = "Rejected fields")
    ),
    security(("bearer" = [])),
    tag = "Perfil"
))]
pub async fn update_perfil_handler(
    State(state): State<Arc<PortalState>>,
    session: Session,
    Json(update): Json<PerfilUpdate>,
) -> Result<Json<Participante>, ExpoError> {
    perfil::update_perfil(&state.context, &session.participante, update)
        .await
        .map(Json)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    put,
    path = "/perfil/disponibilidad",
    request_body = std::collections::BTreeMap<String, expo_common::models::DiaDisponible>,
    responses(
        (status = 200, description = "Stored weekly availability", body = std::collections::BTreeMap<String, expo_common::models::DiaDisponible>),
        (status = 400, description = "Malformed or inverted times")
    ),
    security(("bearer" = [])),
    tag = "Perfil"
))]
pub async fn disponibilidad_handler(
    State(state): State<Arc<PortalState>>,
    session: Session,
    Json(disponibilidad): Json<Disponibilidad>,
) -> Result<Json<Disponibilidad>, ExpoError> {
    perfil::update_disponibilidad(&state.context, &session.participante, disponibilidad)
        .await
        .map(Json)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/perfil/logo",
    request_body = ImagenForm,
    responses(
        (status = 200, description = "New logo stored", body = LogoResponse),
        (status = 400, description = "Not an image"),
        (status = 403, description = "Not an exhibitor")
    ),
    security(("bearer" = [])),
    tag = "Perfil"
))]
pub async fn logo_handler(
    State(state): State<Arc<PortalState>>,
    session: Session,
    Json(imagen): Json<ImagenForm>,
) -> Result<Json<LogoResponse>, ExpoError> {
    perfil::upload_logo(&state.context, &session.participante, imagen)
        .await
        .map(Json)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/perfil/galeria",
    request_body = GaleriaRequest,
    responses(
        (status = 200, description = "Gallery after the upload", body = GaleriaResponse),
        (status = 400, description = "Not an image"),
        (status = 403, description = "Not an exhibitor")
    ),
    security(("bearer" = [])),
    tag = "Perfil"
))]
pub async fn add_galeria_handler(
    State(state): State<Arc<PortalState>>,
    session: Session,
    Json(request): Json<GaleriaRequest>,
) -> Result<Json<GaleriaResponse>, ExpoError> {
    perfil::add_galeria(&state.context, &session.participante, request)
        .await
        .map(Json)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/perfil/galeria",
    request_body = GaleriaDeleteRequest,
    responses(
        (status = 200, description = "Gallery after the removal", body = GaleriaResponse),
        (status = 403, description = "Not an exhibitor"),
        (status = 404, description = "URL is not in the gallery")
    ),
    security(("bearer" = [])),
    tag = "Perfil"
))]
pub async fn remove_galeria_handler(
    State(state): State<Arc<PortalState>>,
    session: Session,
    Json(request): Json<GaleriaDeleteRequest>,
) -> Result<Json<GaleriaResponse>, ExpoError> {
    perfil::remove_galeria(&state.context, &session.participante, request)
        .await
        .map(Json)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/perfil/colaboradores",
    request_body = ColaboradorRequest,
    responses(
        (status = 200, description = "Collaborator invited", body = ColaboradorResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 403, description = "Not an exhibitor"),
        (status = 409, description = "Email already registered")
    ),
    security(("bearer" = [])),
    tag = "Perfil"
))]
pub async fn colaborador_handler(
    State(state): State<Arc<PortalState>>,
    session: Session,
    Json(request): Json<ColaboradorRequest>,
) -> Result<Json<ColaboradorResponse>, ExpoError> {
    perfil::invite_colaborador(&state.context, &session.participante, request)
        .await
        .map(Json)
}

// --- Directory ---

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/contactos",
    responses(
        (status = 200, description = "Confirmed participants, caller excluded", body = DirectorioResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "Directorio"
))]
pub async fn contactos_handler(
    State(state): State<Arc<PortalState>>,
    session: Session,
) -> Result<Json<DirectorioResponse>, ExpoError> {
    directorio::contactos(&state.context, &session.participante)
        .await
        .map(Json)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/contactos/{tipo}/{id}",
    params(
        ("tipo" = TipoParticipante, Path, description = "contacto or expositor"),
        ("id" = String, Path, description = "Participant id")
    ),
    responses(
        (status = 200, description = "Public profile", body = PerfilPublico),
        (status = 404, description = "Participant not found")
    ),
    security(("bearer" = [])),
    tag = "Directorio"
))]
pub async fn perfil_publico_handler(
    State(state): State<Arc<PortalState>>,
    _session: Session,
    Path((tipo, id)): Path<(TipoParticipante, String)>,
) -> Result<Json<PerfilPublico>, ExpoError> {
    directorio::perfil_publico(&state.context, tipo, &id)
        .await
        .map(Json)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/expositores",
    responses(
        (status = 200, description = "Confirmed exhibitors", body = DirectorioResponse)
    ),
    tag = "Directorio"
))]
pub async fn expositores_handler(
    State(state): State<Arc<PortalState>>,
) -> Result<Json<DirectorioResponse>, ExpoError> {
    directorio::expositores(&state.context).await.map(Json)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/expositores/{id}",
    params(("id" = String, Path, description = "Expositor id")),
    responses(
        (status = 200, description = "Public exhibitor profile", body = PerfilPublico),
        (status = 404, description = "Exhibitor not found")
    ),
    tag = "Directorio"
))]
pub async fn expositor_handler(
    State(state): State<Arc<PortalState>>,
    Path(id): Path<String>,
) -> Result<Json<PerfilPublico>, ExpoError> {
    directorio::perfil_publico(&state.context, TipoParticipante::Expositor, &id)
        .await
        .map(Json)
}
