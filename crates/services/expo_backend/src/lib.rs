// --- File: crates/services/expo_backend/src/lib.rs ---
pub mod app_state;
#[cfg(feature = "openapi")]
pub mod doc;
pub mod router;
pub mod service_factory;

pub use app_state::AppState;
pub use router::app;
