//! Venue endpoint and credential configuration.
//!
//! Credentials are never read from the config file. They are filled in from
//! `POLY_PRIVATE_KEY`, `KALSHI_API_KEY` and `KALSHI_API_SECRET`.

use serde::Deserialize;

/// Polymarket endpoints and signing key.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolymarketConfig {
    /// Gamma REST API for market listings.
    pub gamma_url: String,
    /// CLOB REST API for order submission.
    pub clob_url: String,
    /// Chain id used for order signing (137 = Polygon mainnet).
    pub chain_id: u64,
    /// Wallet private key, from `POLY_PRIVATE_KEY`.
    #[serde(skip)]
    pub private_key: Option<String>,
}

impl Default for PolymarketConfig {
    fn default() -> Self {
        Self {
            gamma_url: "https://gamma-api.polymarket.com".into(),
            clob_url: "https://clob.polymarket.com".into(),
            chain_id: 137,
            private_key: None,
        }
    }
}

impl PolymarketConfig {
    /// Whether order placement can be enabled.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.private_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

/// Kalshi endpoint and API credentials.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KalshiConfig {
    /// Trade API base URL, including the `/trade-api/v2` prefix.
    pub api_url: String,
    /// API key id, from `KALSHI_API_KEY`.
    #[serde(skip)]
    pub api_key: Option<String>,
    /// RSA private key PEM (or a path to one), from `KALSHI_API_SECRET`.
    #[serde(skip)]
    pub api_secret: Option<String>,
}

impl Default for KalshiConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.elections.kalshi.com/trade-api/v2".into(),
            api_key: None,
            api_secret: None,
        }
    }
}

impl KalshiConfig {
    /// Whether order placement can be enabled.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.api_key) && present(&self.api_secret)
    }
}
