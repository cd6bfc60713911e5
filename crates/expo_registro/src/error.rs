// --- File: crates/expo_registro/src/error.rs ---
use expo_common::ExpoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistroError {
    #[error("Invitation link is invalid or has been tampered with")]
    InvalidToken,

    #[error("Invitation secret is not configured")]
    MissingSecret,

    #[error("Invitation for '{0}' was already used")]
    AlreadyRegistered(String),

    #[error("This invitation is not for a companion")]
    NotACompanion,

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Request '{0}' was already processed")]
    AlreadyProcessed(String),
}

impl From<RegistroError> for ExpoError {
    fn from(err: RegistroError) -> Self {
        match err {
            RegistroError::InvalidToken => ExpoError::ForbiddenError(err.to_string()),
            RegistroError::MissingSecret => ExpoError::ConfigError(err.to_string()),
            RegistroError::AlreadyRegistered(_) | RegistroError::AlreadyProcessed(_) => {
                ExpoError::ConflictError(err.to_string())
            }
            RegistroError::NotACompanion | RegistroError::InvalidImage(_) => {
                ExpoError::ValidationError(err.to_string())
            }
        }
    }
}
