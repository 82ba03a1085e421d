//! Venue market listing port.

use async_trait::async_trait;

use crate::domain::{Market, Venue};
use crate::error::Result;

/// Fetches the current set of open binary markets from one venue.
///
/// Implementations skip individual records that fail to parse and log them;
/// an `Err` means the listing as a whole could not be obtained.
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// The venue this source lists.
    fn venue(&self) -> Venue;

    /// Fetch up to `limit` open markets with top-of-book quotes.
    async fn fetch_markets(&self, limit: usize) -> Result<Vec<Market>>;
}
