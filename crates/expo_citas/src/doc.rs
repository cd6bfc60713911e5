// File: crates/expo_citas/src/doc.rs
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{FechasResponse, SlotsResponse};
use crate::service::{CitasResponse, ProponerCitaRequest, ReagendarCitaRequest, RechazarCitaRequest};
use expo_common::models::{Cita, EstatusCita, ParticipanteRef, TipoParticipante};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::list_citas_handler,
        crate::handlers::propose_cita_handler,
        crate::handlers::accept_cita_handler,
        crate::handlers::reject_cita_handler,
        crate::handlers::reschedule_cita_handler,
        crate::handlers::fechas_handler,
        crate::handlers::disponibilidad_handler
    ),
    components(
        schemas(
            Cita,
            EstatusCita,
            ParticipanteRef,
            TipoParticipante,
            CitasResponse,
            ProponerCitaRequest,
            RechazarCitaRequest,
            ReagendarCitaRequest,
            FechasResponse,
            SlotsResponse
        )
    ),
    tags(
        (name = "Citas", description = "Meetings between attendees and exhibitors")
    ),
    servers(
        (url = "/api", description = "Expo API server")
    )
)]
pub struct CitasApiDoc;
