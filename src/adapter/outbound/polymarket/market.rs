//! Gamma API market source.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::{debug, info, warn};

use super::dto::GammaMarket;
use crate::domain::{Market, Venue};
use crate::error::Result;
use crate::infrastructure::config::PolymarketConfig;
use crate::port::MarketSource;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client for Polymarket market discovery.
pub struct GammaClient {
    http: HttpClient,
    gamma_url: String,
}

impl GammaClient {
    #[must_use]
    pub fn new(gamma_url: impl Into<String>) -> Self {
        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            gamma_url: gamma_url.into().trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn from_config(config: &PolymarketConfig) -> Self {
        Self::new(config.gamma_url.clone())
    }

    fn markets_url(&self, limit: usize) -> String {
        format!(
            "{}/markets?limit={}&active=true&closed=false",
            self.gamma_url, limit
        )
    }

    /// Fetch active markets from the Gamma API.
    pub async fn get_gamma_markets(&self, limit: usize) -> Result<Vec<GammaMarket>> {
        let url = self.markets_url(limit);
        info!(url = %url, "Fetching active markets (Gamma)");

        let markets: Vec<GammaMarket> = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(count = markets.len(), "Fetched markets from Gamma");

        Ok(markets)
    }
}

/// Convert a Gamma listing, skipping and logging unusable records.
#[must_use]
pub fn convert_listing(markets: &[GammaMarket]) -> Vec<Market> {
    markets
        .iter()
        .filter_map(|m| match m.to_market() {
            Ok(market) => Some(market),
            Err(reason) => {
                debug!(condition_id = %m.condition_id, reason, "Skipping Gamma market");
                None
            }
        })
        .collect()
}

#[async_trait]
impl MarketSource for GammaClient {
    fn venue(&self) -> Venue {
        Venue::Polymarket
    }

    async fn fetch_markets(&self, limit: usize) -> Result<Vec<Market>> {
        let raw = self.get_gamma_markets(limit).await?;
        let markets = convert_listing(&raw);
        debug!(
            listed = raw.len(),
            usable = markets.len(),
            "Polymarket markets converted"
        );
        Ok(markets)
    }
}
