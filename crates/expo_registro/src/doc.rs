// --- File: crates/expo_registro/src/doc.rs ---
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::form::{AcompananteForm, ImagenForm, Rama, RegistroForm};
use crate::service::{
    AprobacionResponse, InvitacionView, RegistroResponse, SolicitudResponse, SolicitudesResponse,
};
use expo_common::models::{EstatusSolicitud, Solicitud, TipoParticipante};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::solicitud_handler,
        crate::handlers::invitacion_handler,
        crate::handlers::registro_handler,
        crate::handlers::acompanante_handler,
        crate::handlers::expositor_handler,
        crate::handlers::list_solicitudes_handler,
        crate::handlers::approve_handler,
        crate::handlers::reject_handler
    ),
    components(
        schemas(
            RegistroForm,
            AcompananteForm,
            ImagenForm,
            Rama,
            SolicitudResponse,
            RegistroResponse,
            InvitacionView,
            AprobacionResponse,
            SolicitudesResponse,
            Solicitud,
            EstatusSolicitud,
            TipoParticipante
        )
    ),
    tags(
        (name = "Registro", description = "Attendee and exhibitor registration"),
        (name = "Admin", description = "Review of registration requests (X-Admin-Secret)")
    ),
    servers(
        (url = "/api", description = "Expo API server")
    )
)]
pub struct RegistroApiDoc;
