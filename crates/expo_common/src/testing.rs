// --- File: crates/expo_common/src/testing.rs ---
//! In-memory implementations of the service traits.
//!
//! Enabled for this crate's own tests and, through the `testing` feature,
//! for the handler tests of the other crates.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::error::ExpoError;
use crate::services::{
    AuthProvider, AuthSession, AuthUser, BoxFuture, DocumentStore, Documento, EmailMessage,
    EmailReceipt, EmailSender, ObjectStorage, ServiceFactory, StoredObject,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // a panicking test must not poison the fakes for the rest of the suite
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn lookup_path<'v>(data: &'v Map<String, Value>, field: &str) -> Option<&'v Value> {
    let mut parts = field.split('.');
    let mut current = data.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

// --- Documents ---

#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: Mutex<HashMap<String, BTreeMap<String, Map<String, Value>>>>,
    next_id: AtomicU64,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document under a fixed id.
    pub fn insert(&self, collection: &str, id: &str, data: Value) {
        let data = match data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        lock(&self.collections)
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
    }

    /// Snapshot of one stored document.
    pub fn document(&self, collection: &str, id: &str) -> Option<Value> {
        lock(&self.collections)
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| Value::Object(data.clone()))
    }

    pub fn count(&self, collection: &str) -> usize {
        lock(&self.collections)
            .get(collection)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }

    fn snapshot(&self, collection: &str) -> Vec<Documento> {
        lock(&self.collections)
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| Documento {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn get<'a>(&'a self, collection: &'a str, id: &'a str) -> BoxFuture<'a, Option<Documento>> {
        Box::pin(async move {
            Ok(lock(&self.collections)
                .get(collection)
                .and_then(|docs| docs.get(id))
                .map(|data| Documento {
                    id: id.to_string(),
                    data: data.clone(),
                }))
        })
    }

    fn query_eq<'a>(
        &'a self,
        collection: &'a str,
        field: &'a str,
        value: &'a Value,
    ) -> BoxFuture<'a, Vec<Documento>> {
        Box::pin(async move {
            Ok(self
                .snapshot(collection)
                .into_iter()
                .filter(|doc| lookup_path(&doc.data, field) == Some(value))
                .collect())
        })
    }

    fn list<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Vec<Documento>> {
        Box::pin(async move { Ok(self.snapshot(collection)) })
    }

    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        fields: Map<String, Value>,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let mut collections = lock(&self.collections);
            let doc = collections
                .get_mut(collection)
                .and_then(|docs| docs.get_mut(id))
                .ok_or_else(|| ExpoError::StoreError(format!("no document {}/{}", collection, id)))?;
            doc.extend(fields);
            Ok(())
        })
    }

    fn add<'a>(&'a self, collection: &'a str, data: Map<String, Value>) -> BoxFuture<'a, String> {
        Box::pin(async move {
            let id = format!("doc{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
            lock(&self.collections)
                .entry(collection.to_string())
                .or_default()
                .insert(id.clone(), data);
            Ok(id)
        })
    }
}

// --- Auth ---

#[derive(Debug, Clone)]
struct Account {
    uid: String,
    password: String,
}

#[derive(Default)]
pub struct MemoryAuth {
    accounts: Mutex<HashMap<String, Account>>,
    tokens: Mutex<HashMap<String, String>>,
    resets: Mutex<Vec<String>>,
    sign_in_delay: Option<Duration>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `sign_in` hang for `delay` before answering.
    pub fn with_sign_in_delay(delay: Duration) -> Self {
        Self {
            sign_in_delay: Some(delay),
            ..Self::default()
        }
    }

    /// Create an account and return a valid ID token for it.
    pub fn register(&self, email: &str, password: &str) -> String {
        let uid = format!("uid-{}", email);
        lock(&self.accounts).insert(
            email.to_string(),
            Account {
                uid,
                password: password.to_string(),
            },
        );
        self.issue_token(email)
    }

    pub fn has_account(&self, email: &str) -> bool {
        lock(&self.accounts).contains_key(email)
    }

    pub fn password_of(&self, email: &str) -> Option<String> {
        lock(&self.accounts).get(email).map(|a| a.password.clone())
    }

    pub fn reset_requests(&self) -> Vec<String> {
        lock(&self.resets).clone()
    }

    fn issue_token(&self, email: &str) -> String {
        let token = format!("token-{}-{}", email, uuid::Uuid::new_v4().simple());
        lock(&self.tokens).insert(token.clone(), email.to_string());
        token
    }

    fn session(&self, email: &str) -> Result<AuthSession, ExpoError> {
        let uid = lock(&self.accounts)
            .get(email)
            .map(|a| a.uid.clone())
            .ok_or_else(|| ExpoError::AuthError("EMAIL_NOT_FOUND".to_string()))?;
        Ok(AuthSession {
            uid,
            email: email.to_string(),
            id_token: self.issue_token(email),
            refresh_token: "refresh".to_string(),
            expires_in: 3600,
        })
    }
}

impl AuthProvider for MemoryAuth {
    fn sign_in<'a>(&'a self, email: &'a str, password: &'a str) -> BoxFuture<'a, AuthSession> {
        Box::pin(async move {
            if let Some(delay) = self.sign_in_delay {
                tokio::time::sleep(delay).await;
            }
            let matches = lock(&self.accounts)
                .get(email)
                .map(|a| a.password == password)
                .unwrap_or(false);
            if !matches {
                return Err(ExpoError::AuthError("INVALID_LOGIN_CREDENTIALS".to_string()));
            }
            self.session(email)
        })
    }

    fn sign_up<'a>(&'a self, email: &'a str, password: &'a str) -> BoxFuture<'a, AuthSession> {
        Box::pin(async move {
            if self.has_account(email) {
                return Err(ExpoError::ConflictError("EMAIL_EXISTS".to_string()));
            }
            self.register(email, password);
            self.session(email)
        })
    }

    fn send_password_reset<'a>(&'a self, email: &'a str) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            lock(&self.resets).push(email.to_string());
            Ok(())
        })
    }

    fn change_password<'a>(
        &'a self,
        id_token: &'a str,
        new_password: &'a str,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let email = lock(&self.tokens)
                .get(id_token)
                .cloned()
                .ok_or_else(|| ExpoError::AuthError("INVALID_ID_TOKEN".to_string()))?;
            if let Some(account) = lock(&self.accounts).get_mut(&email) {
                account.password = new_password.to_string();
            }
            Ok(())
        })
    }

    fn lookup<'a>(&'a self, id_token: &'a str) -> BoxFuture<'a, AuthUser> {
        Box::pin(async move {
            let email = lock(&self.tokens)
                .get(id_token)
                .cloned()
                .ok_or_else(|| ExpoError::AuthError("INVALID_ID_TOKEN".to_string()))?;
            let uid = lock(&self.accounts)
                .get(&email)
                .map(|a| a.uid.clone())
                .ok_or_else(|| ExpoError::AuthError("USER_NOT_FOUND".to_string()))?;
            Ok(AuthUser { uid, email })
        })
    }
}

// --- Storage ---

const MEMORY_URL_PREFIX: &str = "memory://";

#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, (String, Vec<u8>)>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &str) -> bool {
        lock(&self.objects).contains_key(path)
    }

    pub fn len(&self) -> usize {
        lock(&self.objects).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObjectStorage for MemoryStorage {
    fn upload<'a>(
        &'a self,
        path: &'a str,
        content_type: &'a str,
        bytes: Vec<u8>,
    ) -> BoxFuture<'a, StoredObject> {
        Box::pin(async move {
            lock(&self.objects).insert(path.to_string(), (content_type.to_string(), bytes));
            Ok(StoredObject {
                path: path.to_string(),
                url: format!("{}{}", MEMORY_URL_PREFIX, path),
            })
        })
    }

    fn delete_by_url<'a>(&'a self, url: &'a str) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let path = url
                .strip_prefix(MEMORY_URL_PREFIX)
                .ok_or_else(|| ExpoError::ValidationError(format!("not a storage URL: {}", url)))?;
            lock(&self.objects)
                .remove(path)
                .map(|_| ())
                .ok_or_else(|| ExpoError::NotFoundError(path.to_string()))
        })
    }
}

// --- Email ---

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose endpoint always errors.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        lock(&self.sent).clone()
    }
}

impl EmailSender for RecordingMailer {
    fn send<'a>(&'a self, message: &'a EmailMessage) -> BoxFuture<'a, EmailReceipt> {
        Box::pin(async move {
            if self.fail {
                return Err(ExpoError::ExternalServiceError {
                    service_name: "mail".to_string(),
                    message: "endpoint unavailable".to_string(),
                });
            }
            lock(&self.sent).push(message.clone());
            Ok(EmailReceipt {
                success: true,
                message: None,
            })
        })
    }
}

// --- Factory ---

#[derive(Clone)]
pub struct MemoryServiceFactory {
    pub store: Arc<MemoryDocumentStore>,
    pub auth: Arc<MemoryAuth>,
    pub storage: Arc<MemoryStorage>,
    pub mailer: Option<Arc<RecordingMailer>>,
}

impl Default for MemoryServiceFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryServiceFactory {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryDocumentStore::new()),
            auth: Arc::new(MemoryAuth::new()),
            storage: Arc::new(MemoryStorage::new()),
            mailer: Some(Arc::new(RecordingMailer::new())),
        }
    }

    pub fn with_auth(mut self, auth: MemoryAuth) -> Self {
        self.auth = Arc::new(auth);
        self
    }

    pub fn with_mailer(mut self, mailer: Option<RecordingMailer>) -> Self {
        self.mailer = mailer.map(Arc::new);
        self
    }

    /// Messages sent so far; empty when mail is disabled.
    pub fn sent_mail(&self) -> Vec<EmailMessage> {
        self.mailer.as_ref().map(|m| m.sent()).unwrap_or_default()
    }
}

impl ServiceFactory for MemoryServiceFactory {
    fn document_store(&self) -> Arc<dyn DocumentStore> {
        self.store.clone()
    }

    fn auth_provider(&self) -> Arc<dyn AuthProvider> {
        self.auth.clone()
    }

    fn object_storage(&self) -> Arc<dyn ObjectStorage> {
        self.storage.clone()
    }

    fn email_sender(&self) -> Option<Arc<dyn EmailSender>> {
        self.mailer
            .as_ref()
            .map(|m| m.clone() as Arc<dyn EmailSender>)
    }
}
