//! Service-account access tokens for Firestore and Cloud Storage.
//!
//! Tokens are obtained with the key file named by `firebase.key_path` and
//! cached until they expire. Without a key path (local emulator, tests)
//! requests are sent unauthenticated.

use expo_config::FirebaseConfig;
use std::path::Path;
use tokio::sync::Mutex;
use tracing::debug;
use yup_oauth2::{read_service_account_key, AccessToken, ServiceAccountAuthenticator};

use crate::client::FirebaseError;

const SCOPES: &[&str] = &["https://www.googleapis.com/auth/cloud-platform"];

pub struct ServiceAccountToken {
    key_path: Option<String>,
    cached: Mutex<Option<AccessToken>>,
}

impl ServiceAccountToken {
    pub fn new(config: &FirebaseConfig) -> Self {
        Self {
            key_path: config.key_path.clone().filter(|p| !p.trim().is_empty()),
            cached: Mutex::new(None),
        }
    }

    /// A bearer token, or `None` when no service account is configured.
    pub async fn bearer(&self) -> Result<Option<String>, FirebaseError> {
        let Some(key_path) = self.key_path.as_deref() else {
            return Ok(None);
        };

        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| !t.is_expired()) {
            if let Some(value) = token.token() {
                return Ok(Some(value.to_string()));
            }
        }

        let token = fetch_token(key_path).await?;
        let value = token
            .token()
            .ok_or_else(|| FirebaseError::AuthError("No token available".to_string()))?
            .to_string();
        *cached = Some(token);
        Ok(Some(value))
    }
}

async fn fetch_token(key_path: &str) -> Result<AccessToken, FirebaseError> {
    debug!("Requesting service account token");
    let sa_key = read_service_account_key(Path::new(key_path))
        .await
        .map_err(|e| FirebaseError::AuthError(format!("reading {}: {}", key_path, e)))?;

    let auth = ServiceAccountAuthenticator::builder(sa_key)
        .build()
        .await
        .map_err(|e| FirebaseError::AuthError(e.to_string()))?;

    auth.token(SCOPES)
        .await
        .map_err(|e| FirebaseError::AuthError(e.to_string()))
}
