//! Mock [`MarketSource`] for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{Market, Venue};
use crate::error::{Error, Result};
use crate::port::MarketSource;

/// A market source that returns a fixed listing.
///
/// Scripted failures are consumed first, one per call; once exhausted every
/// call returns the listing, truncated to the requested limit.
pub struct StaticMarketSource {
    venue: Venue,
    markets: Vec<Market>,
    failures: Mutex<VecDeque<String>>,
    delay: Option<Duration>,
    calls: Arc<AtomicU32>,
}

impl StaticMarketSource {
    pub fn new(venue: Venue, markets: Vec<Market>) -> Self {
        Self {
            venue,
            markets,
            failures: Mutex::new(VecDeque::new()),
            delay: None,
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    /// A source whose listing is empty.
    pub fn empty(venue: Venue) -> Self {
        Self::new(venue, Vec::new())
    }

    /// Fail the next `n` calls with the given message.
    pub fn failing_times(self, n: usize, message: &str) -> Self {
        self.failures
            .lock()
            .extend(std::iter::repeat(message.to_string()).take(n));
        self
    }

    /// Sleep before answering, to exercise fetch timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketSource for StaticMarketSource {
    fn venue(&self) -> Venue {
        self.venue
    }

    async fn fetch_markets(&self, limit: usize) -> Result<Vec<Market>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = self.failures.lock().pop_front() {
            return Err(Error::Connection(message));
        }
        Ok(self.markets.iter().take(limit).cloned().collect())
    }
}
