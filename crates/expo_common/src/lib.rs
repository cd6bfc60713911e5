// --- File: crates/expo_common/src/lib.rs ---

// Declare modules within this crate
pub mod auth; // Bearer session extractor
pub mod context; // Shared router context
pub mod error; // Error handling
pub mod features; // Feature flag handling
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod models; // Domain records
pub mod repository; // Typed collection access
pub mod services; // Service abstractions

#[cfg(any(test, feature = "testing"))]
pub mod testing; // In-memory fakes

pub use auth::Session;
pub use context::{AppContext, ContextProvider};

// Re-export error types and utilities for easier access
pub use error::{
    config_error, conflict, external_service_error, forbidden, internal_error, not_found,
    validation_error, Context, ExpoError, FieldError, HttpStatusCode,
};

// Re-export HTTP utilities for easier access
pub use http::{
    client::{create_client, HTTP_CLIENT},
    handle_json_result, IntoHttpResponse,
};

// Re-export logging utilities for easier access
pub use logging::{init, init_with_config, init_with_level, log_error, log_result};

pub use features::{is_feature_enabled, is_mail_enabled};
pub use repository::Repository;
