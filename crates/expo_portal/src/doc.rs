// File: crates/expo_portal/src/doc.rs
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::cuenta::{LoginRequest, LoginResponse, PasswordChangeRequest, PasswordResetRequest};
use crate::directorio::{DirectorioEntry, DirectorioResponse, PerfilPublico};
use crate::perfil::{
    ColaboradorRequest, ColaboradorResponse, GaleriaDeleteRequest, GaleriaRequest,
    GaleriaResponse, LogoResponse, PerfilUpdate,
};
use expo_common::models::{
    Acompanante, Contacto, Dia, DiaDisponible, EstatusContacto, Expositor, Participante,
    TipoParticipante,
};
use expo_common::services::AuthSession;
use expo_registro::form::ImagenForm;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::login_handler,
        crate::handlers::password_reset_handler,
        crate::handlers::password_change_handler,
        crate::handlers::get_perfil_handler,
        crate::handlers::update_perfil_handler,
        crate::handlers::disponibilidad_handler,
        crate::handlers::logo_handler,
        crate::handlers::add_galeria_handler,
        crate::handlers::remove_galeria_handler,
        crate::handlers::colaborador_handler,
        crate::handlers::contactos_handler,
        crate::handlers::perfil_publico_handler,
        crate::handlers::expositores_handler,
        crate::handlers::expositor_handler
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            AuthSession,
            PasswordResetRequest,
            PasswordChangeRequest,
            Participante,
            Contacto,
            Expositor,
            Acompanante,
            EstatusContacto,
            TipoParticipante,
            Dia,
            DiaDisponible,
            PerfilUpdate,
            ImagenForm,
            LogoResponse,
            GaleriaRequest,
            GaleriaDeleteRequest,
            GaleriaResponse,
            ColaboradorRequest,
            ColaboradorResponse,
            DirectorioEntry,
            DirectorioResponse,
            PerfilPublico
        )
    ),
    tags(
        (name = "Cuenta", description = "Sign-in and password management"),
        (name = "Perfil", description = "Profile, availability and exhibitor media"),
        (name = "Directorio", description = "Participant directory and exhibitor listing")
    ),
    servers(
        (url = "/api", description = "Expo API server")
    )
)]
pub struct PortalApiDoc;
