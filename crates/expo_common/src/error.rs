// --- File: crates/expo_common/src/error.rs ---
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A single rejected form field, reported back to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    pub campo: String,
    pub mensaje: String,
}

impl FieldError {
    pub fn new(campo: impl Into<String>, mensaje: impl Into<String>) -> Self {
        Self {
            campo: campo.into(),
            mensaje: mensaje.into(),
        }
    }
}

/// The base error type for all Expo errors.
///
/// Each crate keeps its own error enum and converts into this one at the
/// handler boundary.
#[derive(Error, Debug)]
pub enum ExpoError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Missing or invalid credentials
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Authenticated, but not allowed to perform the action
    #[error("Forbidden: {0}")]
    ForbiddenError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A form submission with one or more rejected fields
    #[error("Invalid form: {} field(s) rejected", .0.len())]
    InvalidForm(Vec<FieldError>),

    /// Error reported by the hosted document database
    #[error("Document store error: {0}")]
    StoreError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a conflict (e.g., slot already taken)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Error occurred due to a timeout
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for ExpoError {
    fn status_code(&self) -> u16 {
        match self {
            ExpoError::HttpError(_) => 500,
            ExpoError::ParseError(_) => 400,
            ExpoError::ConfigError(_) => 500,
            ExpoError::AuthError(_) => 401,
            ExpoError::ForbiddenError(_) => 403,
            ExpoError::ValidationError(_) => 400,
            ExpoError::InvalidForm(_) => 400,
            ExpoError::StoreError(_) => 500,
            ExpoError::ExternalServiceError { .. } => 502,
            ExpoError::ConflictError(_) => 409,
            ExpoError::NotFoundError(_) => 404,
            ExpoError::TimeoutError(_) => 504,
            ExpoError::InternalError(_) => 500,
        }
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, ExpoError>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, ExpoError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| ExpoError::InternalError(format!("{}: {}", context, error)))
    }
}

// Common error conversions
impl From<reqwest::Error> for ExpoError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExpoError::TimeoutError(err.to_string())
        } else {
            ExpoError::HttpError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ExpoError {
    fn from(err: serde_json::Error) -> Self {
        ExpoError::ParseError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> ExpoError {
    ExpoError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> ExpoError {
    ExpoError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> ExpoError {
    ExpoError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> ExpoError {
    ExpoError::ConflictError(message.to_string())
}

pub fn forbidden<T: fmt::Display>(message: T) -> ExpoError {
    ExpoError::ForbiddenError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> ExpoError {
    ExpoError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> ExpoError {
    ExpoError::InternalError(message.to_string())
}
