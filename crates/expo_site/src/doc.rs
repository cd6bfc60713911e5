// File: crates/expo_site/src/doc.rs
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::countdown::CountdownView;
use crate::logic::{EventoInfo, GaleriaResponse, LandingResponse};
use expo_config::{GaleriaImagen, HeroSlide, RifaConfig};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::landing_handler,
        crate::handlers::countdown_handler,
        crate::handlers::galeria_handler
    ),
    components(
        schemas(
            LandingResponse,
            EventoInfo,
            CountdownView,
            GaleriaResponse,
            GaleriaImagen,
            HeroSlide,
            RifaConfig
        )
    ),
    tags(
        (name = "Site", description = "Public landing page data")
    ),
    servers(
        (url = "/api", description = "Expo API server")
    )
)]
pub struct SiteApiDoc;
