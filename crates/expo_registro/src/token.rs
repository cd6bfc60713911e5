// --- File: crates/expo_registro/src/token.rs ---
//! Signed invitation links.
//!
//! The token is `hex(HMAC-SHA256(secret, contacto_id))`, so a link only
//! opens the record it was issued for and needs no server-side storage.

use constant_time_eq::constant_time_eq;
use expo_config::AppConfig;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;

use crate::error::RegistroError;

type HmacSha256 = Hmac<Sha256>;

/// The configured invitation secret.
pub fn secret(config: &AppConfig) -> Result<&str, RegistroError> {
    config
        .invitaciones
        .as_ref()
        .map(|i| i.secret.as_str())
        .filter(|s| !s.is_empty())
        .ok_or(RegistroError::MissingSecret)
}

pub fn invitation_token(secret: &str, contacto_id: &str) -> Result<String, RegistroError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| RegistroError::MissingSecret)?;
    mac.update(contacto_id.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

pub fn verify_invitation(
    secret: &str,
    contacto_id: &str,
    token: &str,
) -> Result<(), RegistroError> {
    let expected = invitation_token(secret, contacto_id)?;
    if constant_time_eq(expected.as_bytes(), token.trim().to_lowercase().as_bytes()) {
        Ok(())
    } else {
        Err(RegistroError::InvalidToken)
    }
}

#[derive(Serialize)]
struct LinkQuery<'a> {
    invitacion: &'a str,
    token: &'a str,
}

/// `{public_url}/registro?invitacion={id}&token={token}`
pub fn invitation_link(config: &AppConfig, contacto_id: &str) -> Result<String, RegistroError> {
    let token = invitation_token(secret(config)?, contacto_id)?;
    let query = serde_urlencoded::to_string(LinkQuery {
        invitacion: contacto_id,
        token: &token,
    })
    .map_err(|_| RegistroError::InvalidToken)?;
    Ok(format!(
        "{}/registro?{}",
        config.site.public_url.trim_end_matches('/'),
        query
    ))
}
