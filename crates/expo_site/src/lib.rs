// --- File: crates/expo_site/src/lib.rs ---
pub mod countdown;
#[cfg(feature = "openapi")]
pub mod doc;
pub mod handlers;
pub mod logic;
pub mod routes;

pub use routes::routes;

#[cfg(feature = "openapi")]
pub mod openapi {
    pub use crate::doc::SiteApiDoc;
}
