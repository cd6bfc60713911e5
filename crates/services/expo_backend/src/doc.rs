// File: crates/services/expo_backend/src/doc.rs
#![cfg(feature = "openapi")]
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("Firebase ID token")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Expo Empresarios de la Baja API",
        version = "0.1.0",
        description = "Landing data, registration, appointments and the participant portal"
    ),
    modifiers(&BearerAuth),
    servers((url = "/api", description = "Main API prefix"))
)]
struct ApiDoc;

/// The merged document of every feature crate.
pub fn openapi() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.merge(expo_site::openapi::SiteApiDoc::openapi());
    doc.merge(expo_registro::openapi::RegistroApiDoc::openapi());
    doc.merge(expo_citas::openapi::CitasApiDoc::openapi());
    doc.merge(expo_portal::openapi::PortalApiDoc::openapi());
    doc
}
