// --- File: crates/expo_registro/src/lib.rs ---
pub mod admin;
#[cfg(feature = "openapi")]
pub mod doc;
pub mod error;
pub mod form;
pub mod handlers;
pub mod routes;
pub mod service;
pub mod token;
pub mod uploads;

pub use error::RegistroError;
pub use routes::routes;

#[cfg(feature = "openapi")]
pub mod openapi {
    pub use crate::doc::RegistroApiDoc;
}
