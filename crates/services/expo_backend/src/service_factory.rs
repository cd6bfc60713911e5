// --- File: crates/services/expo_backend/src/service_factory.rs ---
//! Service factory implementation.
//!
//! Wires the Firebase clients and, when enabled, the HTTP email sender
//! behind the `ServiceFactory` trait the feature crates depend on.
use expo_common::services::{
    AuthProvider, DocumentStore, EmailSender, ObjectStorage, ServiceFactory,
};
use expo_common::{config_error, is_mail_enabled, ExpoError};
use expo_config::AppConfig;
use expo_firebase::FirebaseServices;
use expo_mail::HttpEmailSender;
use std::sync::Arc;
use tracing::info;

pub struct ExpoServiceFactory {
    firebase: FirebaseServices,
    email_sender: Option<Arc<HttpEmailSender>>,
}

impl ExpoServiceFactory {
    /// Build the factory from configuration. The `[firebase]` section is
    /// required; email is optional and controlled by `use_mail`.
    pub fn new(config: &AppConfig) -> Result<Self, ExpoError> {
        let firebase_config = config
            .firebase
            .clone()
            .ok_or_else(|| config_error("the [firebase] section is required"))?;
        info!(
            "Initializing Firebase services for project {} (tenant {})",
            firebase_config.project_id, firebase_config.empresa_id
        );
        let firebase = FirebaseServices::new(firebase_config)?;

        let email_sender = match config.mail.as_ref() {
            Some(mail) if is_mail_enabled(config) => {
                info!("Email delivery enabled via {}", mail.endpoint_url);
                Some(Arc::new(HttpEmailSender::new(mail)))
            }
            _ => {
                info!("Email delivery disabled; notifications will be skipped");
                None
            }
        };

        Ok(Self {
            firebase,
            email_sender,
        })
    }
}

impl ServiceFactory for ExpoServiceFactory {
    fn document_store(&self) -> Arc<dyn DocumentStore> {
        self.firebase.firestore.clone()
    }

    fn auth_provider(&self) -> Arc<dyn AuthProvider> {
        self.firebase.identity.clone()
    }

    fn object_storage(&self) -> Arc<dyn ObjectStorage> {
        self.firebase.storage.clone()
    }

    fn email_sender(&self) -> Option<Arc<dyn EmailSender>> {
        self.email_sender
            .as_ref()
            .map(|sender| sender.clone() as Arc<dyn EmailSender>)
    }
}
