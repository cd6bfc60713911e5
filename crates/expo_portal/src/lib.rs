// --- File: crates/expo_portal/src/lib.rs ---
pub mod cuenta;
pub mod directorio;
#[cfg(feature = "openapi")]
pub mod doc;
pub mod handlers;
pub mod perfil;
pub mod routes;

pub use routes::routes;

#[cfg(feature = "openapi")]
pub mod openapi {
    pub use crate::doc::PortalApiDoc;
}
