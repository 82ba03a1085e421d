//! Status dashboard configuration.

use serde::Deserialize;

/// Where the read-only status page listens.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Serve the dashboard while the scan loop runs. `--no-dashboard` turns
    /// it off for one run.
    pub enabled: bool,
    pub host: String,
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}
