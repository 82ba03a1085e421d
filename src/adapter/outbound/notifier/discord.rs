//! Discord webhook notifier.
//!
//! Same shape as the Telegram notifier: `notify` enqueues, a background
//! worker posts `{"content": ...}` to the webhook.

use reqwest::Client;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::port::{Event, Notifier};

use super::format::{Alert, AlertFilter, DISCORD_MAX_CHARS};

/// Configuration for the Discord notifier.
#[derive(Debug, Clone)]
pub struct DiscordConfig {
    pub webhook_url: String,
    pub filter: AlertFilter,
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

/// Posts alerts to a Discord webhook.
pub struct DiscordNotifier {
    sender: mpsc::UnboundedSender<Event>,
}

impl DiscordNotifier {
    /// Create a notifier and spawn its delivery worker.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn new(config: DiscordConfig) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(discord_worker(config, receiver));
        Self { sender }
    }
}

impl Notifier for DiscordNotifier {
    fn notify(&self, event: Event) {
        if self.sender.send(event).is_err() {
            warn!("Discord notifier channel closed");
        }
    }
}

async fn discord_worker(config: DiscordConfig, mut receiver: mpsc::UnboundedReceiver<Event>) {
    let client = Client::new();
    info!("Discord notifier started");

    while let Some(event) = receiver.recv().await {
        let Some(alert) = Alert::from_event(&event, config.filter) else {
            continue;
        };
        let content = alert.to_plain(DISCORD_MAX_CHARS);

        let result = client
            .post(&config.webhook_url)
            .json(&WebhookPayload { content: &content })
            .send()
            .await
            .and_then(reqwest::Response::error_for_status);

        if let Err(e) = result {
            error!(error = %e, "Failed to send Discord message");
        }
    }

    warn!("Discord notifier worker shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_is_a_content_object() {
        let json = serde_json::to_string(&WebhookPayload { content: "hi" }).unwrap();
        assert_eq!(json, r#"{"content":"hi"}"#);
    }

    #[tokio::test]
    async fn notify_does_not_block_on_delivery() {
        let notifier = DiscordNotifier::new(DiscordConfig {
            webhook_url: "http://127.0.0.1:9/hook".into(),
            filter: AlertFilter::default(),
        });

        notifier.notify(Event::CycleFailed {
            reason: "both venues unavailable".into(),
        });
    }
}
