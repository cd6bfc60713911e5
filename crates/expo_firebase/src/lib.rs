//! Firebase REST integration for the Expo service.
//!
//! Implements the data-access traits of `expo-common` against:
//!
//! - Firestore REST v1 ([`FirestoreStore`], a `DocumentStore`)
//! - Identity Toolkit REST v1 ([`IdentityToolkit`], an `AuthProvider`)
//! - Firebase Storage REST v0 ([`FirebaseStorage`], an `ObjectStorage`)
//!
//! Firestore and Storage calls carry a service-account token when
//! `firebase.key_path` is configured; Identity Toolkit calls use the web
//! API key. Base URLs can be overridden to point at the emulator suite.
//!
//! # Example
//!
//! ```rust,no_run
//! use expo_config::AppConfig;
//! use expo_firebase::FirebaseServices;
//!
//! fn build(config: &AppConfig) {
//!     if let Some(firebase) = config.firebase.clone() {
//!         let services = FirebaseServices::new(firebase).expect("valid firebase config");
//!         let _store = services.firestore;
//!     }
//! }
//! ```

pub mod auth;
pub mod client;
pub mod firestore;
pub mod identity;
pub mod storage;
pub mod value;

pub use client::{FirebaseClient, FirebaseError};
pub use firestore::FirestoreStore;
pub use identity::IdentityToolkit;
pub use storage::FirebaseStorage;

use expo_config::FirebaseConfig;
use std::sync::Arc;

/// The three Firebase clients, sharing one HTTP client and token cache.
#[derive(Clone)]
pub struct FirebaseServices {
    pub firestore: Arc<FirestoreStore>,
    pub identity: Arc<IdentityToolkit>,
    pub storage: Arc<FirebaseStorage>,
}

impl FirebaseServices {
    pub fn new(config: FirebaseConfig) -> Result<Self, FirebaseError> {
        Ok(Self::from_client(FirebaseClient::new(config)?))
    }

    pub fn from_client(client: FirebaseClient) -> Self {
        Self {
            firestore: Arc::new(FirestoreStore::new(client.clone())),
            identity: Arc::new(IdentityToolkit::new(client.clone())),
            storage: Arc::new(FirebaseStorage::new(client)),
        }
    }
}
