// --- File: crates/expo_portal/src/cuenta.rs ---
//! Sign-in and password management.

use expo_common::models::Participante;
use expo_common::services::AuthSession;
use expo_common::{forbidden, AppContext, ExpoError, FieldError};
use expo_registro::form::MIN_PASSWORD_LEN;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, instrument, warn};

pub const DEFAULT_LOGIN_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LoginResponse {
    pub sesion: AuthSession,
    pub participante: Participante,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PasswordChangeRequest {
    pub password_actual: String,
    pub password_nueva: String,
    pub confirm_password: String,
}

fn login_timeout(ctx: &AppContext) -> Duration {
    let secs = ctx
        .config
        .auth
        .as_ref()
        .and_then(|a| a.login_timeout_secs)
        .unwrap_or(DEFAULT_LOGIN_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

#[instrument(skip(ctx, request), fields(email = %request.email))]
pub async fn login(ctx: &AppContext, request: LoginRequest) -> Result<LoginResponse, ExpoError> {
    let email = request.email.trim().to_lowercase();
    if email.is_empty() || request.password.is_empty() {
        return Err(ExpoError::AuthError("email and password are required".to_string()));
    }

    let limit = login_timeout(ctx);
    let auth = ctx.services.auth_provider();
    let sesion = timeout(limit, auth.sign_in(&email, &request.password))
        .await
        .map_err(|_| {
            warn!("Sign-in for {} did not answer within {:?}", email, limit);
            ExpoError::TimeoutError(format!("sign-in timed out after {}s", limit.as_secs()))
        })??;

    let participante = ctx
        .repository()
        .participant_by_email(&sesion.email)
        .await?
        .ok_or_else(|| forbidden("no participant record for this account"))?;

    info!("{} signed in as {:?} {}", email, participante.tipo(), participante.id());
    Ok(LoginResponse {
        sesion,
        participante,
    })
}

pub async fn password_reset(
    ctx: &AppContext,
    request: PasswordResetRequest,
) -> Result<(), ExpoError> {
    let email = request.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(ExpoError::InvalidForm(vec![FieldError::new(
            "email",
            "Este campo es obligatorio",
        )]));
    }
    ctx.services
        .auth_provider()
        .send_password_reset(&email)
        .await?;
    info!("Password reset requested for {}", email);
    Ok(())
}

fn validate_new_password(request: &PasswordChangeRequest) -> Result<(), ExpoError> {
    let mut errores = Vec::new();
    if request.password_actual.is_empty() {
        errores.push(FieldError::new("passwordActual", "Este campo es obligatorio"));
    }
    if request.password_nueva.chars().count() < MIN_PASSWORD_LEN {
        errores.push(FieldError::new(
            "passwordNueva",
            format!("La contraseña debe tener al menos {} caracteres", MIN_PASSWORD_LEN),
        ));
    }
    if request.confirm_password != request.password_nueva {
        errores.push(FieldError::new("confirmPassword", "Las contraseñas no coinciden"));
    }
    if errores.is_empty() {
        Ok(())
    } else {
        Err(ExpoError::InvalidForm(errores))
    }
}

/// Re-authenticates with the current password before changing it.
#[instrument(skip(ctx, id_token, request))]
pub async fn password_change(
    ctx: &AppContext,
    email: &str,
    id_token: &str,
    request: PasswordChangeRequest,
) -> Result<(), ExpoError> {
    validate_new_password(&request)?;
    let auth = ctx.services.auth_provider();
    auth.sign_in(email, &request.password_actual).await?;
    auth.change_password(id_token, &request.password_nueva).await?;
    info!("Password changed for {}", email);
    Ok(())
}
