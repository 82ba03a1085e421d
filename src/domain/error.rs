//! Domain validation errors for core domain types.
//!
//! Returned when a market record or opportunity violates one of the
//! invariants the rest of the system relies on.

use rust_decimal::Decimal;
use thiserror::Error;

use super::venue::Side;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A quoted price lies outside the `[0, 1]` probability range.
    #[error("{side} {quote} price {price} is outside [0, 1]")]
    PriceOutOfRange {
        side: Side,
        quote: &'static str,
        price: Decimal,
    },

    /// The ask is below the bid on one side of the book.
    #[error("{side} ask {ask} is below bid {bid}")]
    CrossedQuote { side: Side, bid: Decimal, ask: Decimal },

    /// The market has no external reference to trade against.
    #[error("market reference is empty")]
    EmptyMarketRef,

    /// Volume cannot be negative.
    #[error("volume must be non-negative, got {volume}")]
    NegativeVolume { volume: Decimal },

    /// The safe position size has already been applied to this opportunity.
    #[error("opportunity size was already set to {size}")]
    AlreadySized { size: Decimal },

    /// Sizes must be non-negative.
    #[error("size must be non-negative, got {size}")]
    NegativeSize { size: Decimal },
}
