//! Alert channel configuration.

use serde::Deserialize;

/// Telegram and Discord alert settings.
///
/// Channel credentials come from `TELEGRAM_TOKEN`, `TELEGRAM_CHAT_ID` and
/// `DISCORD_WEBHOOK`; a channel is active when its credentials are present.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlertsConfig {
    /// Also alert on every detected opportunity (can be noisy).
    pub notify_opportunities: bool,
    /// Alert on completed executions.
    pub notify_executions: bool,
    #[serde(skip)]
    pub telegram_token: Option<String>,
    #[serde(skip)]
    pub telegram_chat_id: Option<i64>,
    #[serde(skip)]
    pub discord_webhook: Option<String>,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            notify_opportunities: false,
            notify_executions: true,
            telegram_token: None,
            telegram_chat_id: None,
            discord_webhook: None,
        }
    }
}
