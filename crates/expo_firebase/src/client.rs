//! Shared plumbing for the Firebase REST clients.

use expo_common::{ExpoError, HTTP_CLIENT};
use expo_config::FirebaseConfig;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

use crate::auth::ServiceAccountToken;

pub const FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";
pub const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";
pub const STORAGE_URL: &str = "https://firebasestorage.googleapis.com/v0";

/// Errors that can occur when talking to the Firebase REST APIs
#[derive(Error, Debug)]
pub enum FirebaseError {
    /// Error obtaining a service account token
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Error during HTTP request to Firebase API
    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Missing required configuration
    #[error("Missing configuration: {0}")]
    ConfigError(String),

    /// Error returned by the Firebase API
    #[error("Firebase API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// A response we could not make sense of
    #[error("Unexpected response: {0}")]
    DecodeError(String),
}

// Identity Toolkit reports its failures as upper-case codes in `message`,
// sometimes followed by " : detail".
const CREDENTIAL_CODES: &[&str] = &[
    "INVALID_LOGIN_CREDENTIALS",
    "INVALID_PASSWORD",
    "EMAIL_NOT_FOUND",
    "USER_DISABLED",
    "INVALID_ID_TOKEN",
    "TOKEN_EXPIRED",
    "USER_NOT_FOUND",
    "CREDENTIAL_TOO_OLD_LOGIN_AGAIN",
];

impl From<FirebaseError> for ExpoError {
    fn from(err: FirebaseError) -> Self {
        match err {
            FirebaseError::ApiError { status, message } => {
                let code = message.split(" : ").next().unwrap_or_default();
                if code == "EMAIL_EXISTS" {
                    ExpoError::ConflictError(message)
                } else if code.starts_with("WEAK_PASSWORD") || code == "INVALID_EMAIL" {
                    ExpoError::ValidationError(message)
                } else if CREDENTIAL_CODES.contains(&code) || status == 401 {
                    ExpoError::AuthError(message)
                } else if status == 404 {
                    ExpoError::NotFoundError(message)
                } else if status == 409 {
                    ExpoError::ConflictError(message)
                } else {
                    ExpoError::ExternalServiceError {
                        service_name: "firebase".to_string(),
                        message,
                    }
                }
            }
            FirebaseError::RequestError(e) => e.into(),
            FirebaseError::ConfigError(m) => ExpoError::ConfigError(m),
            FirebaseError::AuthError(m) => ExpoError::ExternalServiceError {
                service_name: "firebase-auth".to_string(),
                message: m,
            },
            FirebaseError::DecodeError(m) => ExpoError::StoreError(m),
        }
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Turn a non-success response into `FirebaseError::ApiError`.
pub(crate) async fn check(response: Response) -> Result<Response, FirebaseError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await?;
    let message = serde_json::from_str::<ApiErrorBody>(&text)
        .map(|body| body.error.message)
        .unwrap_or(text);
    warn!("Firebase API returned {}: {}", status, message);
    Err(FirebaseError::ApiError {
        status: status.as_u16(),
        message,
    })
}

/// HTTP client, configuration and token source shared by the three clients.
#[derive(Clone)]
pub struct FirebaseClient {
    pub(crate) http: Client,
    pub(crate) config: Arc<FirebaseConfig>,
    token: Arc<ServiceAccountToken>,
}

impl FirebaseClient {
    pub fn new(config: FirebaseConfig) -> Result<Self, FirebaseError> {
        if config.project_id.trim().is_empty() {
            return Err(FirebaseError::ConfigError(
                "Missing project_id in FirebaseConfig".to_string(),
            ));
        }
        Ok(Self {
            http: HTTP_CLIENT.clone(),
            token: Arc::new(ServiceAccountToken::new(&config)),
            config: Arc::new(config),
        })
    }

    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub(crate) fn firestore_base(&self) -> &str {
        self.config.firestore_url.as_deref().unwrap_or(FIRESTORE_URL)
    }

    pub(crate) fn auth_base(&self) -> &str {
        self.config.auth_url.as_deref().unwrap_or(IDENTITY_TOOLKIT_URL)
    }

    pub(crate) fn storage_base(&self) -> &str {
        self.config.storage_url.as_deref().unwrap_or(STORAGE_URL)
    }

    /// Attach the service-account bearer token, when there is one.
    pub(crate) async fn authorized(
        &self,
        request: RequestBuilder,
    ) -> Result<RequestBuilder, FirebaseError> {
        Ok(match self.token.bearer().await? {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, message: &str) -> ExpoError {
        FirebaseError::ApiError {
            status,
            message: message.to_string(),
        }
        .into()
    }

    #[test]
    fn identity_codes_map_to_error_kinds() {
        assert!(matches!(api(400, "EMAIL_EXISTS"), ExpoError::ConflictError(_)));
        assert!(matches!(
            api(400, "INVALID_LOGIN_CREDENTIALS"),
            ExpoError::AuthError(_)
        ));
        assert!(matches!(
            api(400, "WEAK_PASSWORD : Password should be at least 6 characters"),
            ExpoError::ValidationError(_)
        ));
        assert!(matches!(api(404, "NOT_FOUND"), ExpoError::NotFoundError(_)));
        assert!(matches!(
            api(500, "INTERNAL"),
            ExpoError::ExternalServiceError { .. }
        ));
    }
}
