use expo_common::services::{EmailMessage, EmailSender};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Send an email as a side effect of a completed action.
///
/// Failures are logged and swallowed: the action that triggered the email
/// has already been stored and still reports success. Returns whether the
/// endpoint accepted the message.
pub async fn notify(sender: Option<&Arc<dyn EmailSender>>, message: EmailMessage) -> bool {
    let Some(sender) = sender else {
        debug!("Mail disabled, not sending '{}' to {}", message.subject, message.to);
        return false;
    };

    match sender.send(&message).await {
        Ok(receipt) if receipt.success => {
            info!("Sent '{}' to {}", message.subject, message.to);
            true
        }
        Ok(receipt) => {
            warn!(
                "Email '{}' to {} was not accepted: {}",
                message.subject,
                message.to,
                receipt.message.unwrap_or_default()
            );
            false
        }
        Err(e) => {
            warn!("Failed to send '{}' to {}: {}", message.subject, message.to, e);
            false
        }
    }
}
