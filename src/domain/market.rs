//! Venue-agnostic binary market snapshot.
//!
//! A [`Market`] is re-fetched every scan cycle and never persisted. Prices
//! are top-of-book only.

use rust_decimal::Decimal;

use super::error::DomainError;
use super::id::MarketRef;
use super::money::Price;
use super::venue::{Side, Venue};

/// One tradable YES/NO market on one venue, as seen in one poll.
#[derive(Debug, Clone, PartialEq)]
pub struct Market {
    venue: Venue,
    external_ref: MarketRef,
    title: String,
    yes_bid: Price,
    yes_ask: Price,
    no_bid: Price,
    no_ask: Price,
    volume: Decimal,
    yes_token: String,
    no_token: String,
}

impl Market {
    /// Create a market from explicit quotes on both sides.
    ///
    /// Order targets default to the external reference; use
    /// [`with_tokens`](Self::with_tokens) on venues that trade per-outcome tokens.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        venue: Venue,
        external_ref: impl Into<MarketRef>,
        title: impl Into<String>,
        yes_bid: Price,
        yes_ask: Price,
        no_bid: Price,
        no_ask: Price,
        volume: Decimal,
    ) -> Self {
        let external_ref = external_ref.into();
        let target = external_ref.as_str().to_string();
        Self {
            venue,
            external_ref,
            title: title.into(),
            yes_bid,
            yes_ask,
            no_bid,
            no_ask,
            volume,
            yes_token: target.clone(),
            no_token: target,
        }
    }

    /// Create a market from YES quotes, deriving the complementary NO side
    /// (`no_ask = 1 - yes_bid`, `no_bid = 1 - yes_ask`).
    #[must_use]
    pub fn from_yes_quotes(
        venue: Venue,
        external_ref: impl Into<MarketRef>,
        title: impl Into<String>,
        yes_bid: Price,
        yes_ask: Price,
        volume: Decimal,
    ) -> Self {
        Self::new(
            venue,
            external_ref,
            title,
            yes_bid,
            yes_ask,
            Decimal::ONE - yes_ask,
            Decimal::ONE - yes_bid,
            volume,
        )
    }

    /// Set the per-outcome order targets (Polymarket CLOB token ids).
    #[must_use]
    pub fn with_tokens(mut self, yes_token: impl Into<String>, no_token: impl Into<String>) -> Self {
        self.yes_token = yes_token.into();
        self.no_token = no_token.into();
        self
    }

    /// Check the record against the price invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant: empty reference, a price outside
    /// `[0, 1]`, a crossed quote, or negative volume.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.external_ref.is_empty() {
            return Err(DomainError::EmptyMarketRef);
        }

        let quotes = [
            (Side::Yes, "bid", self.yes_bid),
            (Side::Yes, "ask", self.yes_ask),
            (Side::No, "bid", self.no_bid),
            (Side::No, "ask", self.no_ask),
        ];
        for (side, quote, price) in quotes {
            if price < Decimal::ZERO || price > Decimal::ONE {
                return Err(DomainError::PriceOutOfRange { side, quote, price });
            }
        }

        if self.yes_ask < self.yes_bid {
            return Err(DomainError::CrossedQuote {
                side: Side::Yes,
                bid: self.yes_bid,
                ask: self.yes_ask,
            });
        }
        if self.no_ask < self.no_bid {
            return Err(DomainError::CrossedQuote {
                side: Side::No,
                bid: self.no_bid,
                ask: self.no_ask,
            });
        }

        if self.volume < Decimal::ZERO {
            return Err(DomainError::NegativeVolume {
                volume: self.volume,
            });
        }

        Ok(())
    }

    #[must_use]
    pub fn venue(&self) -> Venue {
        self.venue
    }

    #[must_use]
    pub fn external_ref(&self) -> &MarketRef {
        &self.external_ref
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn yes_bid(&self) -> Price {
        self.yes_bid
    }

    #[must_use]
    pub fn yes_ask(&self) -> Price {
        self.yes_ask
    }

    #[must_use]
    pub fn no_bid(&self) -> Price {
        self.no_bid
    }

    #[must_use]
    pub fn no_ask(&self) -> Price {
        self.no_ask
    }

    #[must_use]
    pub fn volume(&self) -> Decimal {
        self.volume
    }

    /// Best ask for the given side.
    #[must_use]
    pub fn ask(&self, side: Side) -> Price {
        match side {
            Side::Yes => self.yes_ask,
            Side::No => self.no_ask,
        }
    }

    /// Order target for the given side.
    #[must_use]
    pub fn token(&self, side: Side) -> &str {
        match side {
            Side::Yes => &self.yes_token,
            Side::No => &self.no_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn from_yes_quotes_derives_complement() {
        let market = Market::from_yes_quotes(
            Venue::Kalshi,
            "KX-1",
            "Will it rain?",
            dec!(0.44),
            dec!(0.46),
            dec!(100),
        );

        assert_eq!(market.no_bid(), dec!(0.54));
        assert_eq!(market.no_ask(), dec!(0.56));
        assert!(market.validate().is_ok());
    }

    #[test]
    fn tokens_default_to_external_ref() {
        let market =
            Market::from_yes_quotes(Venue::Kalshi, "KX-1", "Q", dec!(0.4), dec!(0.5), dec!(0));
        assert_eq!(market.token(Side::Yes), "KX-1");
        assert_eq!(market.token(Side::No), "KX-1");

        let market = market.with_tokens("111", "222");
        assert_eq!(market.token(Side::Yes), "111");
        assert_eq!(market.token(Side::No), "222");
    }

    #[test]
    fn validate_rejects_price_out_of_range() {
        let market = Market::new(
            Venue::Polymarket,
            "0xabc",
            "Q",
            dec!(0.4),
            dec!(1.2),
            dec!(0.5),
            dec!(0.6),
            dec!(0),
        );
        assert!(matches!(
            market.validate(),
            Err(DomainError::PriceOutOfRange {
                side: Side::Yes,
                quote: "ask",
                ..
            })
        ));
    }

    #[test]
    fn validate_rejects_crossed_quote() {
        let market = Market::new(
            Venue::Polymarket,
            "0xabc",
            "Q",
            dec!(0.5),
            dec!(0.4),
            dec!(0.5),
            dec!(0.6),
            dec!(0),
        );
        assert!(matches!(
            market.validate(),
            Err(DomainError::CrossedQuote { side: Side::Yes, .. })
        ));
    }

    #[test]
    fn validate_rejects_empty_ref() {
        let market =
            Market::from_yes_quotes(Venue::Kalshi, "", "Q", dec!(0.4), dec!(0.5), dec!(0));
        assert_eq!(market.validate(), Err(DomainError::EmptyMarketRef));
    }

    #[test]
    fn validate_rejects_negative_volume() {
        let market =
            Market::from_yes_quotes(Venue::Kalshi, "KX", "Q", dec!(0.4), dec!(0.5), dec!(-1));
        assert!(matches!(
            market.validate(),
            Err(DomainError::NegativeVolume { .. })
        ));
    }
}
