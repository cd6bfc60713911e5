// --- File: crates/expo_common/src/auth.rs ---
//! Bearer-token session extractor for the authenticated endpoints.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::{debug, warn};

use crate::context::ContextProvider;
use crate::error::{forbidden, ExpoError};
use crate::models::Participante;

/// The signed-in participant behind an `Authorization: Bearer <idToken>`
/// header.
#[derive(Debug, Clone)]
pub struct Session {
    pub uid: String,
    pub email: String,
    pub id_token: String,
    pub participante: Participante,
}

fn bearer_token(parts: &Parts) -> Result<String, ExpoError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ExpoError::AuthError("missing Authorization header".to_string()))?
        .to_str()
        .map_err(|_| ExpoError::AuthError("malformed Authorization header".to_string()))?;

    match header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(ExpoError::AuthError("expected a Bearer token".to_string())),
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: ContextProvider + Send + Sync,
{
    type Rejection = ExpoError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let id_token = bearer_token(parts)?;
        let ctx = state.context();

        let user = ctx.services.auth_provider().lookup(&id_token).await?;
        let participante = ctx
            .repository()
            .participant_by_email(&user.email)
            .await?
            .ok_or_else(|| {
                warn!("Authenticated account {} has no participant record", user.email);
                forbidden("no participant record for this account")
            })?;

        debug!(
            "Session for {} ({:?} {})",
            user.email,
            participante.tipo(),
            participante.id()
        );

        Ok(Session {
            uid: user.uid,
            email: user.email,
            id_token,
            participante,
        })
    }
}
