//! Canonical test configurations.
//!
//! Configs built here never read the process environment, so tests stay
//! independent of whatever `.env` the developer has loaded.

use std::collections::HashMap;

use crate::infrastructure::config::Config;

/// Parse `toml` with the given environment variables and nothing else.
///
/// # Panics
///
/// Panics if the configuration is invalid.
pub fn with_env(toml: &str, vars: &[(&str, &str)]) -> Config {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    Config::parse_with(toml, |key| vars.get(key).cloned()).expect("valid test config")
}

/// All defaults: simulation mode, $5000 capital, no credentials.
pub fn sim() -> Config {
    with_env("", &[])
}

/// Live mode with no venue credentials.
pub fn live_without_credentials() -> Config {
    with_env("mode = \"live\"", &[])
}
