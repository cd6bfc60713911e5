// --- File: crates/expo_registro/src/admin.rs ---

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use constant_time_eq::constant_time_eq;
use expo_common::{config_error, ExpoError};
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::handlers::RegistroState;

pub const ADMIN_SECRET_HEADER: &str = "X-Admin-Secret";

/// Guards the solicitud review routes with the shared admin secret.
pub async fn admin_auth_middleware(
    State(state): State<Arc<RegistroState>>,
    req: Request,
    next: Next,
) -> Response {
    let expected = match state
        .context
        .config
        .admin
        .as_ref()
        .and_then(|a| a.shared_secret.as_deref())
        .filter(|s| !s.is_empty())
    {
        Some(secret) => secret.to_string(),
        None => {
            error!("Admin shared secret is not configured");
            return config_error("admin secret not configured").into_response();
        }
    };

    let provided = req
        .headers()
        .get(ADMIN_SECRET_HEADER)
        .and_then(|value| value.to_str().ok());

    match provided {
        Some(provided) if constant_time_eq(provided.as_bytes(), expected.as_bytes()) => {
            debug!("Admin request authenticated");
            next.run(req).await
        }
        Some(_) => {
            warn!("Admin request with an invalid secret");
            ExpoError::AuthError("invalid admin secret".to_string()).into_response()
        }
        None => {
            warn!("Admin request without {} header", ADMIN_SECRET_HEADER);
            ExpoError::AuthError(format!("missing {} header", ADMIN_SECRET_HEADER)).into_response()
        }
    }
}
