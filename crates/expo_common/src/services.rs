// --- File: crates/expo_common/src/services.rs ---
//! Service abstractions for the hosted backend.
//!
//! Persistence, authentication, file storage and email delivery all live in
//! external services. Handlers only see these traits, which keeps the
//! Firebase clients swappable for the in-memory fakes used in tests.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::ExpoError;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E = ExpoError> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A stored document: its generated id and its JSON fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Documento {
    pub id: String,
    pub data: Map<String, Value>,
}

/// Document database operations.
///
/// `collection` is a full slash-separated path such as
/// `empresas/expo-baja/contactos`.
pub trait DocumentStore: Send + Sync {
    /// Fetch one document by id. `None` when it does not exist.
    fn get<'a>(&'a self, collection: &'a str, id: &'a str) -> BoxFuture<'a, Option<Documento>>;

    /// All documents whose `field` equals `value`. `field` may be a dotted
    /// path into nested maps (`solicitante.id`).
    fn query_eq<'a>(
        &'a self,
        collection: &'a str,
        field: &'a str,
        value: &'a Value,
    ) -> BoxFuture<'a, Vec<Documento>>;

    /// Every document of a collection.
    fn list<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Vec<Documento>>;

    /// Overwrite the given top-level fields, leaving the rest untouched.
    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        fields: Map<String, Value>,
    ) -> BoxFuture<'a, ()>;

    /// Insert a document under a generated id and return that id.
    fn add<'a>(&'a self, collection: &'a str, data: Map<String, Value>) -> BoxFuture<'a, String>;
}

/// A signed-in account as returned by the auth service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AuthSession {
    pub uid: String,
    pub email: String,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
}

/// The account behind an ID token.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
}

/// Email/password authentication.
pub trait AuthProvider: Send + Sync {
    fn sign_in<'a>(&'a self, email: &'a str, password: &'a str) -> BoxFuture<'a, AuthSession>;

    fn sign_up<'a>(&'a self, email: &'a str, password: &'a str) -> BoxFuture<'a, AuthSession>;

    fn send_password_reset<'a>(&'a self, email: &'a str) -> BoxFuture<'a, ()>;

    fn change_password<'a>(&'a self, id_token: &'a str, new_password: &'a str)
        -> BoxFuture<'a, ()>;

    /// Resolve an ID token to its account; an invalid or expired token is
    /// an `AuthError`.
    fn lookup<'a>(&'a self, id_token: &'a str) -> BoxFuture<'a, AuthUser>;
}

/// An uploaded object and its public download URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StoredObject {
    pub path: String,
    pub url: String,
}

/// Object storage for logos and gallery images.
pub trait ObjectStorage: Send + Sync {
    fn upload<'a>(
        &'a self,
        path: &'a str,
        content_type: &'a str,
        bytes: Vec<u8>,
    ) -> BoxFuture<'a, StoredObject>;

    /// Delete an object given the download URL `upload` returned for it.
    fn delete_by_url<'a>(&'a self, url: &'a str) -> BoxFuture<'a, ()>;
}

/// Outgoing email, as posted to the email endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// The email endpoint's reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailReceipt {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub trait EmailSender: Send + Sync {
    fn send<'a>(&'a self, message: &'a EmailMessage) -> BoxFuture<'a, EmailReceipt>;
}

/// A factory for the service instances the handlers need.
///
/// The backend builds one from configuration at startup and shares it
/// through the router state.
pub trait ServiceFactory: Send + Sync {
    fn document_store(&self) -> Arc<dyn DocumentStore>;

    fn auth_provider(&self) -> Arc<dyn AuthProvider>;

    fn object_storage(&self) -> Arc<dyn ObjectStorage>;

    /// `None` when email is disabled at runtime.
    fn email_sender(&self) -> Option<Arc<dyn EmailSender>>;
}
