//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; credentials and a few operational
//! overrides come from the environment.
//!
//! | Variable            | Effect                                   |
//! |---------------------|------------------------------------------|
//! | `POLY_PRIVATE_KEY`  | Polymarket signing key                   |
//! | `KALSHI_API_KEY`    | Kalshi API key id                        |
//! | `KALSHI_API_SECRET` | Kalshi RSA key, PEM text or a file path  |
//! | `KALSHI_BASE_URL`   | Overrides `kalshi.api_url`               |
//! | `OPENAI_API_KEY`    | Enables the LLM validator                |
//! | `TELEGRAM_TOKEN`    | Telegram bot token                       |
//! | `TELEGRAM_CHAT_ID`  | Telegram chat receiving alerts           |
//! | `DISCORD_WEBHOOK`   | Discord webhook URL                      |
//! | `MODE`              | Overrides `mode` (`sim` or `live`)       |
//! | `CAPITAL_USD`       | Overrides `capital.max_capital_usd`      |
//!
//! # Example
//!
//! ```no_run
//! use crossarb::infrastructure::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.logging.init();
//!     Ok(())
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::alerts::AlertsConfig;
use super::dashboard::DashboardConfig;
use super::llm::LlmConfig;
use super::logging::LoggingConfig;
use super::venue::{KalshiConfig, PolymarketConfig};
use crate::application::{ExecutionMode, ScannerConfig};
use crate::domain::{FeeSchedule, Usd};
use crate::error::{ConfigError, Result};

/// Capital limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CapitalConfig {
    /// Hard ceiling on capital committed across all positions.
    pub max_capital_usd: Usd,
    /// Largest fraction of `max_capital_usd` one position may take.
    pub max_position_pct: Decimal,
}

impl Default for CapitalConfig {
    fn default() -> Self {
        Self {
            max_capital_usd: Decimal::from(5000),
            max_position_pct: Decimal::new(2, 1),
        }
    }
}

/// Loop cadence and I/O bounds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Seconds between scan cycles.
    pub interval_secs: u64,
    /// Bound on each venue listing fetch.
    pub fetch_timeout_secs: u64,
    /// Bound on each order placement.
    pub order_timeout_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: 5,
            fetch_timeout_secs: 20,
            order_timeout_secs: 10,
        }
    }
}

impl ScheduleConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    #[must_use]
    pub fn order_timeout(&self) -> Duration {
        Duration::from_secs(self.order_timeout_secs)
    }
}

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`]. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Whether orders reach the venues. Defaults to simulation.
    pub mode: ExecutionMode,
    pub capital: CapitalConfig,
    pub scanner: ScannerConfig,
    /// Per-venue fee rates applied to quoted asks.
    pub fees: FeeSchedule,
    pub schedule: ScheduleConfig,
    pub polymarket: PolymarketConfig,
    pub kalshi: KalshiConfig,
    pub llm: LlmConfig,
    pub alerts: AlertsConfig,
    pub dashboard: DashboardConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from TOML content, reading secrets and overrides
    /// from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed, an override cannot be
    /// parsed, or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_with(content, |key| std::env::var(key).ok())
    }

    /// Parse configuration from TOML content, resolving environment values
    /// through `env`.
    ///
    /// # Errors
    ///
    /// Same as [`Config::parse_toml`].
    #[allow(clippy::result_large_err)]
    pub fn parse_with<F>(content: &str, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, or for any reason listed
    /// on [`Config::parse_toml`].
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    #[allow(clippy::result_large_err)]
    fn apply_env<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        // Secrets are only ever read from the environment.
        self.polymarket.private_key = var("POLY_PRIVATE_KEY");
        self.kalshi.api_key = var("KALSHI_API_KEY");
        self.kalshi.api_secret = var("KALSHI_API_SECRET");
        self.llm.api_key = var("OPENAI_API_KEY");
        self.alerts.telegram_token = var("TELEGRAM_TOKEN");
        self.alerts.discord_webhook = var("DISCORD_WEBHOOK");

        if let Some(chat_id) = var("TELEGRAM_CHAT_ID") {
            let chat_id = chat_id
                .trim()
                .parse::<i64>()
                .map_err(|e| ConfigError::InvalidValue {
                    field: "TELEGRAM_CHAT_ID",
                    reason: e.to_string(),
                })?;
            self.alerts.telegram_chat_id = Some(chat_id);
        }

        if let Some(url) = var("KALSHI_BASE_URL") {
            self.kalshi.api_url = url.trim().to_string();
        }

        if let Some(mode) = var("MODE") {
            self.mode = mode
                .parse()
                .map_err(|reason| ConfigError::InvalidValue {
                    field: "MODE",
                    reason,
                })?;
        }

        if let Some(capital) = var("CAPITAL_USD") {
            self.capital.max_capital_usd =
                capital
                    .trim()
                    .parse::<Decimal>()
                    .map_err(|e| ConfigError::InvalidValue {
                        field: "CAPITAL_USD",
                        reason: e.to_string(),
                    })?;
        }

        Ok(())
    }

    /// Validate configuration values.
    ///
    /// Also called by the binary after command-line overrides are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] or [`ConfigError::MissingField`]
    /// naming the first offending setting.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.capital.max_capital_usd <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "max_capital_usd",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        let pct = self.capital.max_position_pct;
        if pct <= Decimal::ZERO || pct > Decimal::ONE {
            return Err(ConfigError::InvalidValue {
                field: "max_position_pct",
                reason: "must be in (0, 1]".to_string(),
            }
            .into());
        }
        if self.scanner.min_profit_pct < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "min_profit_pct",
                reason: "must be 0 or greater".to_string(),
            }
            .into());
        }
        if self.scanner.nominal_size_usd <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "nominal_size_usd",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if !(0.0..=1.0).contains(&self.scanner.similarity_threshold) {
            return Err(ConfigError::InvalidValue {
                field: "similarity_threshold",
                reason: "must be between 0 and 1".to_string(),
            }
            .into());
        }
        if self.scanner.market_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "market_limit",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.fees.polymarket < Decimal::ZERO || self.fees.kalshi < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "fees",
                reason: "fee rates must be 0 or greater".to_string(),
            }
            .into());
        }
        if self.schedule.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "interval_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.schedule.fetch_timeout_secs == 0 || self.schedule.order_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "schedule",
                reason: "timeouts must be greater than 0".to_string(),
            }
            .into());
        }
        if self.polymarket.gamma_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "polymarket.gamma_url",
            }
            .into());
        }
        if self.kalshi.api_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "kalshi.api_url",
            }
            .into());
        }
        if self.dashboard.enabled && self.dashboard.host.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "dashboard.host",
            }
            .into());
        }
        if self.alerts.telegram_token.is_some() != self.alerts.telegram_chat_id.is_some() {
            return Err(ConfigError::InvalidValue {
                field: "telegram",
                reason: "TELEGRAM_TOKEN and TELEGRAM_CHAT_ID must be set together".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
