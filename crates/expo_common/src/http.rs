// --- File: crates/expo_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{ExpoError, HttpStatusCode};

// Include the client module
pub mod client;

/// Extension trait for ExpoError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for ExpoError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status_code.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = match &self {
            ExpoError::InvalidForm(fields) => json!({
                "error": {
                    "message": self.to_string(),
                    "code": status_code.as_u16(),
                    "fields": fields,
                }
            }),
            _ => json!({
                "error": {
                    "message": self.to_string(),
                    "code": status_code.as_u16(),
                }
            }),
        };

        (status_code, Json(body)).into_response()
    }
}

/// Implement IntoResponse for ExpoError to make it easier to use in Axum handlers.
impl IntoResponse for ExpoError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

/// Converts a `Result<T, ExpoError>` into the JSON handler return shape.
pub fn handle_json_result<T>(result: Result<T, ExpoError>) -> Result<Json<T>, Response>
where
    T: serde::Serialize,
{
    result.map(Json).map_err(|err| err.into_response())
}
