//! Client for the hosted email-sending endpoint.
//!
//! The endpoint takes `POST {to, subject, html}` and answers
//! `{success: bool, message?: string}`.

use expo_common::services::{BoxFuture, EmailMessage, EmailReceipt, EmailSender};
use expo_common::{create_client, ExpoError, HTTP_CLIENT};
use expo_config::MailConfig;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Email endpoint connection error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Email endpoint failed with status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The endpoint answered `success: false`.
    #[error("Email rejected: {0}")]
    Rejected(String),
}

impl From<MailError> for ExpoError {
    fn from(err: MailError) -> Self {
        match err {
            MailError::RequestError(e) => e.into(),
            other => ExpoError::ExternalServiceError {
                service_name: "mail".to_string(),
                message: other.to_string(),
            },
        }
    }
}

pub struct HttpEmailSender {
    client: Client,
    endpoint_url: String,
}

impl HttpEmailSender {
    pub fn new(config: &MailConfig) -> Self {
        let client = config
            .timeout_secs
            .and_then(|secs| create_client(secs).ok())
            .unwrap_or_else(|| HTTP_CLIENT.clone());
        Self {
            client,
            endpoint_url: config.endpoint_url.clone(),
        }
    }

    async fn post(&self, message: &EmailMessage) -> Result<EmailReceipt, MailError> {
        let res = self
            .client
            .post(&self.endpoint_url)
            .json(message)
            .send()
            .await
            .map_err(|e| {
                error!("Email endpoint connection error: {}", e);
                MailError::from(e)
            })?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            error!("Email endpoint failed. Status: {}, Body: {}", status, body);
            return Err(MailError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let receipt: EmailReceipt = res.json().await?;
        if !receipt.success {
            return Err(MailError::Rejected(
                receipt.message.unwrap_or_else(|| "no reason given".to_string()),
            ));
        }
        debug!("Email '{}' accepted for {}", message.subject, message.to);
        Ok(receipt)
    }
}

impl EmailSender for HttpEmailSender {
    fn send<'a>(&'a self, message: &'a EmailMessage) -> BoxFuture<'a, EmailReceipt> {
        Box::pin(async move { self.post(message).await.map_err(ExpoError::from) })
    }
}
