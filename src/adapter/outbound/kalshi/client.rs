//! Kalshi REST client.
//!
//! Listing is `GET /markets?limit=N&status=open` followed by one orderbook
//! request per market, run with bounded concurrency. Orders go to
//! `POST /portfolio/orders` as limit buys priced in cents.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use reqwest::{Client as HttpClient, Url};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::auth::KalshiAuth;
use super::dto::{
    BalanceResponse, CreateOrderRequest, CreateOrderResponse, KalshiMarket, MarketsResponse, OrderbookResponse,
    Quote,
};
use crate::domain::money::HUNDRED;
use crate::domain::{Market, OrderId, Side, Usd, Venue};
use crate::error::{ConfigError, ExecutionError, Result};
use crate::infrastructure::config::KalshiConfig;
use crate::port::{MarketSource, OrderPlacer, OrderRequest};

/// Orderbook requests in flight at once during a listing.
const ORDERBOOK_CONCURRENCY: usize = 8;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client for the Kalshi trade API.
pub struct KalshiClient {
    http: HttpClient,
    /// Base URL including the API prefix, without a trailing slash.
    base_url: String,
    /// Path component of `base_url`; signatures cover the full path.
    base_path: String,
    auth: Option<KalshiAuth>,
}

impl KalshiClient {
    /// Create a client for `config.api_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the URL does not parse.
    pub fn new(config: &KalshiConfig, auth: Option<KalshiAuth>) -> Result<Self> {
        let base_url = config.api_url.trim_end_matches('/').to_string();
        let base_path = Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidValue {
                field: "kalshi.api_url",
                reason: e.to_string(),
            })?
            .path()
            .trim_end_matches('/')
            .to_string();

        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Ok(Self {
            http,
            base_url,
            base_path,
            auth,
        })
    }

    /// Whether requests are signed and orders can be placed.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn signed_path(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_path, endpoint)
    }

    async fn get<T>(&self, endpoint: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut request = self.http.get(self.url(endpoint)).query(query);
        if let Some(auth) = &self.auth {
            request = request.headers(auth.headers("GET", &self.signed_path(endpoint))?);
        }
        Ok(request.send().await?.error_for_status()?.json::<T>().await?)
    }

    /// Fetch open markets, one page of at most `limit`.
    pub async fn get_markets(&self, limit: usize) -> Result<Vec<KalshiMarket>> {
        let query = [("limit", limit.to_string()), ("status", "open".to_string())];
        info!(limit, "Fetching open markets (Kalshi)");

        let response: MarketsResponse = self.get("/markets", &query).await?;
        debug!(count = response.markets.len(), "Fetched markets from Kalshi");
        Ok(response.markets)
    }

    /// Fetch the orderbook for one ticker and derive its quote.
    pub async fn get_quote(&self, ticker: &str) -> Result<Option<Quote>> {
        let endpoint = format!("/markets/{ticker}/orderbook");
        let response: OrderbookResponse = self.get(&endpoint, &[]).await?;
        Ok(response.orderbook.quote())
    }

    /// Fetch the available portfolio balance.
    ///
    /// # Errors
    ///
    /// Fails without credentials or when the request fails.
    pub async fn get_balance(&self) -> Result<Usd> {
        if self.auth.is_none() {
            return Err(ExecutionError::AuthFailed("Kalshi credentials missing".into()).into());
        }
        let response: BalanceResponse = self.get("/portfolio/balance", &[]).await?;
        Ok(response.usd())
    }

    async fn to_market(&self, market: KalshiMarket) -> Option<Market> {
        if !market.is_open() || market.ticker.is_empty() {
            return None;
        }

        let quote = match self.get_quote(&market.ticker).await {
            Ok(Some(quote)) => Some(quote),
            Ok(None) => market.last_price_quote(),
            Err(e) => {
                debug!(ticker = %market.ticker, error = %e, "Orderbook unavailable, using last price");
                market.last_price_quote()
            }
        }?;

        Some(Market::new(
            Venue::Kalshi,
            market.ticker.as_str(),
            market.title.as_str(),
            quote.yes_bid,
            quote.yes_ask,
            quote.no_bid,
            quote.no_ask,
            Decimal::from(market.volume.unwrap_or(0).max(0)),
        ))
    }

    /// Build the order body for one leg.
    fn order_body(request: &OrderRequest) -> Result<CreateOrderRequest> {
        let price_cents = (request.price * HUNDRED)
            .round()
            .to_i64()
            .filter(|c| (1..=99).contains(c))
            .ok_or_else(|| {
                ExecutionError::OrderBuildFailed(format!(
                    "price {} is outside 1-99 cents",
                    request.price
                ))
            })?;
        let count = request
            .quantity
            .floor()
            .to_i64()
            .filter(|c| *c >= 1)
            .ok_or_else(|| {
                ExecutionError::OrderBuildFailed(format!("invalid count {}", request.quantity))
            })?;

        let (side, yes_price, no_price) = match request.side {
            Side::Yes => ("yes", Some(price_cents), None),
            Side::No => ("no", None, Some(price_cents)),
        };

        Ok(CreateOrderRequest {
            ticker: request.order_ref.clone(),
            client_order_id: Uuid::new_v4().to_string(),
            side,
            action: "buy",
            count,
            order_type: "limit",
            yes_price,
            no_price,
        })
    }
}

#[async_trait]
impl MarketSource for KalshiClient {
    fn venue(&self) -> Venue {
        Venue::Kalshi
    }

    async fn fetch_markets(&self, limit: usize) -> Result<Vec<Market>> {
        let listing = self.get_markets(limit).await?;
        let total = listing.len();

        let markets: Vec<Market> = stream::iter(listing)
            .map(|market| self.to_market(market))
            .buffered(ORDERBOOK_CONCURRENCY)
            .filter_map(|market| async move { market })
            .collect()
            .await;

        debug!(
            listed = total,
            quoted = markets.len(),
            "Kalshi markets quoted"
        );
        Ok(markets)
    }
}

#[async_trait]
impl OrderPlacer for KalshiClient {
    fn venue(&self) -> Venue {
        Venue::Kalshi
    }

    async fn place_order(&self, request: &OrderRequest) -> Result<OrderId> {
        let auth = self
            .auth
            .as_ref()
            .ok_or_else(|| ExecutionError::AuthFailed("Kalshi credentials missing".into()))?;

        let body = Self::order_body(request)?;
        let endpoint = "/portfolio/orders";

        info!(
            ticker = %body.ticker,
            side = body.side,
            count = body.count,
            price_cents = ?body.yes_price.or(body.no_price),
            "Submitting Kalshi order"
        );

        let response = self
            .http
            .post(self.url(endpoint))
            .headers(auth.headers("POST", &self.signed_path(endpoint))?)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ExecutionError::OrderRejected(format!("HTTP {status}: {text}")).into());
        }

        let created: CreateOrderResponse = response.json().await?;
        info!(
            order_id = %created.order.order_id,
            status = ?created.order.status,
            "Kalshi order accepted"
        );
        Ok(OrderId::new(created.order.order_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MarketRef;
    use rust_decimal_macros::dec;

    fn request(side: Side, price: Decimal, quantity: Decimal) -> OrderRequest {
        OrderRequest {
            market_ref: MarketRef::from("FED-24JUN-CUT"),
            order_ref: "FED-24JUN-CUT".into(),
            side,
            price,
            quantity,
        }
    }

    #[test]
    fn signed_path_includes_api_prefix() {
        let client = KalshiClient::new(&KalshiConfig::default(), None).unwrap();
        assert_eq!(
            client.signed_path("/portfolio/orders"),
            "/trade-api/v2/portfolio/orders"
        );
        assert_eq!(
            client.url("/markets"),
            "https://api.elections.kalshi.com/trade-api/v2/markets"
        );
        assert!(!client.is_authenticated());
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        let config = KalshiConfig {
            api_url: "not a url".into(),
            ..KalshiConfig::default()
        };
        assert!(KalshiClient::new(&config, None).is_err());
    }

    #[test]
    fn order_body_prices_no_leg_in_cents() {
        let body = KalshiClient::order_body(&request(Side::No, dec!(0.52), dec!(1000.7))).unwrap();
        assert_eq!(body.side, "no");
        assert_eq!(body.no_price, Some(52));
        assert_eq!(body.yes_price, None);
        assert_eq!(body.count, 1000);
        assert_eq!(body.action, "buy");
        assert_eq!(body.order_type, "limit");
    }

    #[test]
    fn order_body_rejects_out_of_range_values() {
        assert!(KalshiClient::order_body(&request(Side::Yes, dec!(1.0), dec!(5))).is_err());
        assert!(KalshiClient::order_body(&request(Side::Yes, dec!(0.001), dec!(5))).is_err());
        assert!(KalshiClient::order_body(&request(Side::Yes, dec!(0.5), dec!(0.5))).is_err());
    }

    #[tokio::test]
    async fn balance_requires_credentials() {
        let client = KalshiClient::new(&KalshiConfig::default(), None).unwrap();
        assert!(client.get_balance().await.is_err());
    }

    #[tokio::test]
    async fn placing_without_credentials_fails() {
        let client = KalshiClient::new(&KalshiConfig::default(), None).unwrap();
        let result = client
            .place_order(&request(Side::No, dec!(0.52), dec!(10)))
            .await;
        assert!(result.is_err());
    }
}
