//! Kalshi REST payloads and quote derivation.
//!
//! Kalshi quotes in integer cents. Orderbooks list resting bids only, one
//! ladder per side, sorted by price ascending; an ask on one side is the
//! complement of the best bid on the other.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::money::HUNDRED;
use crate::domain::{Price, Usd};

/// Spread applied around `last_price` when no orderbook is available.
pub const LAST_PRICE_SPREAD_CENTS: i64 = 2;

/// `GET /markets` response.
#[derive(Debug, Deserialize)]
pub struct MarketsResponse {
    #[serde(default)]
    pub markets: Vec<KalshiMarket>,
    #[serde(default)]
    pub cursor: Option<String>,
}

/// One market in a listing.
#[derive(Debug, Clone, Deserialize)]
pub struct KalshiMarket {
    pub ticker: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: Option<String>,
    /// Last trade price in cents.
    #[serde(default)]
    pub last_price: Option<i64>,
    #[serde(default)]
    pub volume: Option<i64>,
}

/// `GET /markets/{ticker}/orderbook` response.
#[derive(Debug, Deserialize)]
pub struct OrderbookResponse {
    pub orderbook: Orderbook,
}

/// Bid ladders as `[price_cents, quantity]`, ascending by price.
///
/// Either side is `null` when it has no resting orders.
#[derive(Debug, Default, Deserialize)]
pub struct Orderbook {
    #[serde(default)]
    pub yes: Option<Vec<[i64; 2]>>,
    #[serde(default)]
    pub no: Option<Vec<[i64; 2]>>,
}

/// Top-of-book for both sides, in dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub yes_bid: Price,
    pub yes_ask: Price,
    pub no_bid: Price,
    pub no_ask: Price,
}

impl Orderbook {
    /// Derive a quote from the best bid on each side.
    ///
    /// Returns `None` unless both ladders have at least one level.
    #[must_use]
    pub fn quote(&self) -> Option<Quote> {
        let best = |ladder: &Option<Vec<[i64; 2]>>| {
            ladder
                .as_ref()
                .and_then(|levels| levels.last())
                .map(|[price, _]| cents(*price))
        };
        let yes_bid = best(&self.yes)?;
        let no_bid = best(&self.no)?;

        Some(Quote {
            yes_bid,
            yes_ask: Decimal::ONE - no_bid,
            no_bid,
            no_ask: Decimal::ONE - yes_bid,
        })
    }
}

impl KalshiMarket {
    /// Quote synthesized from the last trade, `last_price ± 2¢` on YES.
    ///
    /// Returns `None` when there is no positive last price.
    #[must_use]
    pub fn last_price_quote(&self) -> Option<Quote> {
        let last = self.last_price.filter(|p| *p > 0)?;
        let yes_bid = cents((last - LAST_PRICE_SPREAD_CENTS).max(0));
        let yes_ask = cents((last + LAST_PRICE_SPREAD_CENTS).min(100));

        Some(Quote {
            yes_bid,
            yes_ask,
            no_bid: Decimal::ONE - yes_ask,
            no_ask: Decimal::ONE - yes_bid,
        })
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status
            .as_deref()
            .map_or(true, |s| matches!(s, "open" | "active"))
    }
}

/// `POST /portfolio/orders` body.
#[derive(Debug, Serialize)]
pub struct CreateOrderRequest {
    pub ticker: String,
    pub client_order_id: String,
    /// `yes` or `no`.
    pub side: &'static str,
    pub action: &'static str,
    pub count: i64,
    #[serde(rename = "type")]
    pub order_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yes_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_price: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderResponse {
    pub order: CreatedOrder,
}

#[derive(Debug, Deserialize)]
pub struct CreatedOrder {
    pub order_id: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// `GET /portfolio/balance` response.
#[derive(Debug, Deserialize)]
pub struct BalanceResponse {
    /// Available balance in cents.
    pub balance: i64,
}

impl BalanceResponse {
    #[must_use]
    pub fn usd(&self) -> Usd {
        cents(self.balance)
    }
}

fn cents(value: i64) -> Price {
    Decimal::from(value) / HUNDRED
}
