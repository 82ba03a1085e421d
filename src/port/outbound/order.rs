//! Order placement port.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{MarketRef, OrderId, Price, Side, Venue};
use crate::error::Result;

/// A single limit buy on one venue.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    /// Venue-side market reference.
    pub market_ref: MarketRef,
    /// Order target: CLOB token id on Polymarket, ticker on Kalshi.
    pub order_ref: String,
    /// Outcome to buy.
    pub side: Side,
    /// Limit price in `[0, 1]`.
    pub price: Price,
    /// Whole number of contracts.
    pub quantity: Decimal,
}

/// Places orders on one venue.
///
/// One call places one order. A returned `OrderId` means the venue
/// acknowledged the order; no fill tracking happens beyond that.
#[async_trait]
pub trait OrderPlacer: Send + Sync {
    /// The venue orders are routed to.
    fn venue(&self) -> Venue;

    /// Submit a limit buy.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is rejected, cannot be signed, or the
    /// request fails.
    async fn place_order(&self, order: &OrderRequest) -> Result<OrderId>;
}
