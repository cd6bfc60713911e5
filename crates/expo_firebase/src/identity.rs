//! Identity Toolkit REST v1 implementation of [`AuthProvider`].
//!
//! All calls are authenticated with the project's web API key, the same
//! way the browser SDK does it.

use expo_common::services::{AuthProvider, AuthSession, AuthUser, BoxFuture};
use expo_common::ExpoError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::client::{check, FirebaseClient, FirebaseError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    id_token: String,
    #[serde(default)]
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<String>,
}

impl TokenResponse {
    fn into_session(self, email: &str) -> AuthSession {
        AuthSession {
            uid: self.local_id,
            email: if self.email.is_empty() {
                email.to_string()
            } else {
                self.email
            },
            id_token: self.id_token,
            refresh_token: self.refresh_token,
            expires_in: self
                .expires_in
                .and_then(|s| s.parse().ok())
                .unwrap_or(3600),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Clone)]
pub struct IdentityToolkit {
    client: FirebaseClient,
}

impl IdentityToolkit {
    pub fn new(client: FirebaseClient) -> Self {
        Self { client }
    }

    async fn call<B, R>(&self, method: &str, body: &B) -> Result<R, FirebaseError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/accounts:{}", self.client.auth_base(), method);
        let response = self
            .client
            .http
            .post(&url)
            .query(&[("key", self.client.config.api_key.as_str())])
            .json(body)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn password_call(
        &self,
        method: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, FirebaseError> {
        let body = json!({ "email": email, "password": password, "returnSecureToken": true });
        let response: TokenResponse = self.call(method, &body).await?;
        Ok(response.into_session(email))
    }
}

impl AuthProvider for IdentityToolkit {
    fn sign_in<'a>(&'a self, email: &'a str, password: &'a str) -> BoxFuture<'a, AuthSession> {
        Box::pin(async move {
            let session = self
                .password_call("signInWithPassword", email, password)
                .await?;
            debug!("Signed in {}", session.email);
            Ok(session)
        })
    }

    fn sign_up<'a>(&'a self, email: &'a str, password: &'a str) -> BoxFuture<'a, AuthSession> {
        Box::pin(async move {
            let session = self.password_call("signUp", email, password).await?;
            info!("Created auth account {} for {}", session.uid, session.email);
            Ok(session)
        })
    }

    fn send_password_reset<'a>(&'a self, email: &'a str) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let body = json!({ "requestType": "PASSWORD_RESET", "email": email });
            let _: serde_json::Value = self.call("sendOobCode", &body).await?;
            Ok(())
        })
    }

    fn change_password<'a>(
        &'a self,
        id_token: &'a str,
        new_password: &'a str,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let body = json!({
                "idToken": id_token,
                "password": new_password,
                "returnSecureToken": true,
            });
            let _: serde_json::Value = self.call("update", &body).await?;
            Ok(())
        })
    }

    fn lookup<'a>(&'a self, id_token: &'a str) -> BoxFuture<'a, AuthUser> {
        Box::pin(async move {
            let response: LookupResponse = self
                .call("lookup", &json!({ "idToken": id_token }))
                .await?;
            let user = response
                .users
                .into_iter()
                .next()
                .ok_or_else(|| ExpoError::AuthError("USER_NOT_FOUND".to_string()))?;
            Ok(AuthUser {
                uid: user.local_id,
                email: user.email,
            })
        })
    }
}
