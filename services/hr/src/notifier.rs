//! Outbound notification channel
//!
//! Delivery is best effort: a notification is handed off to a background
//! task and failures are logged, never surfaced to the caller. A state
//! transition that already committed must not be rolled back because the
//! notification channel is slow or down.

use serde_json::json;
use tracing::{error, info};

/// One outbound message
#[derive(Debug, Clone)]
pub struct Notification {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Notification channel
#[derive(Clone)]
pub enum Notifier {
    /// POST each notification as JSON to a webhook
    Webhook { client: reqwest::Client, url: String },
    /// Discard notifications; used when no channel is configured and in tests
    Noop,
}

impl Notifier {
    /// Build the notifier from `NOTIFY_WEBHOOK_URL`; without it
    /// notifications are logged and dropped
    pub fn from_env() -> Self {
        match std::env::var("NOTIFY_WEBHOOK_URL") {
            Ok(url) if !url.is_empty() => Notifier::Webhook {
                client: reqwest::Client::new(),
                url,
            },
            _ => {
                info!("NOTIFY_WEBHOOK_URL not set; notifications are disabled");
                Notifier::Noop
            }
        }
    }

    /// Queue a notification for background delivery and return immediately
    pub fn send_detached(&self, notification: Notification) {
        match self {
            Notifier::Noop => {
                info!(
                    "notification dropped (no channel): {} -> {}",
                    notification.subject, notification.recipient
                );
            }
            Notifier::Webhook { client, url } => {
                let client = client.clone();
                let url = url.clone();
                tokio::spawn(async move {
                    let payload = json!({
                        "recipient": notification.recipient,
                        "subject": notification.subject,
                        "body": notification.body,
                    });
                    match client.post(&url).json(&payload).send().await {
                        Ok(response) if response.status().is_success() => {
                            info!(
                                "notification delivered: {} -> {}",
                                notification.subject, notification.recipient
                            );
                        }
                        Ok(response) => {
                            error!(
                                "notification channel returned {}: {} -> {}",
                                response.status(),
                                notification.subject,
                                notification.recipient
                            );
                        }
                        Err(e) => {
                            error!("failed to deliver notification: {}", e);
                        }
                    }
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_from_env_without_url_is_noop() {
        unsafe {
            std::env::remove_var("NOTIFY_WEBHOOK_URL");
        }
        assert!(matches!(Notifier::from_env(), Notifier::Noop));
    }

    #[test]
    #[serial]
    fn test_from_env_with_url_is_webhook() {
        unsafe {
            std::env::set_var("NOTIFY_WEBHOOK_URL", "http://localhost:9000/notify");
        }
        match Notifier::from_env() {
            Notifier::Webhook { url, .. } => assert_eq!(url, "http://localhost:9000/notify"),
            Notifier::Noop => panic!("expected a webhook notifier"),
        }
        unsafe {
            std::env::remove_var("NOTIFY_WEBHOOK_URL");
        }
    }
}
