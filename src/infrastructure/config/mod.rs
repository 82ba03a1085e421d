//! Configuration loading and validation.
//!
//! Non-secret settings come from a TOML file; credentials come only from the
//! environment (optionally via `.env`, loaded by the binary).

pub mod alerts;
pub mod dashboard;
pub mod llm;
pub mod logging;
pub mod settings;
pub mod venue;

pub use alerts::AlertsConfig;
pub use dashboard::DashboardConfig;
pub use llm::LlmConfig;
pub use logging::LoggingConfig;
pub use settings::{CapitalConfig, Config, ScheduleConfig};
pub use venue::{KalshiConfig, PolymarketConfig};
