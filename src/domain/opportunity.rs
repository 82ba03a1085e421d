//! Detected arbitrage opportunities.
//!
//! An [`Opportunity`] is produced by the scanner, optionally re-sized once by
//! the capital guard, and consumed by the executor. The executor reads its
//! venue identifiers from [`OpportunityDetails`], a typed record keyed by
//! [`OpportunityKind`].

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use super::error::DomainError;
use super::id::MarketRef;
use super::money::{Price, Usd};
use super::venue::{Side, Venue};

/// The arbitrage strategy an opportunity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityKind {
    /// Buy YES on one venue and NO on the other for the same event.
    CrossVenueYesNo,
}

impl fmt::Display for OpportunityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CrossVenueYesNo => f.write_str("cross_venue_yes_no"),
        }
    }
}

/// One side of a trade as detected: what to buy, where, and at what ask.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpportunityLeg {
    pub venue: Venue,
    pub side: Side,
    pub price: Price,
    pub external_ref: MarketRef,
}

/// Everything the executor needs to place one leg.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegTarget {
    pub venue: Venue,
    pub market_ref: MarketRef,
    /// Venue order target: a CLOB token id on Polymarket, the ticker on Kalshi.
    pub order_ref: String,
    pub title: String,
}

/// Identifiers for a YES-on-one-venue, NO-on-the-other pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossVenuePair {
    pub yes_leg: LegTarget,
    pub no_leg: LegTarget,
    /// Fee-inclusive cost of one YES + NO contract pair.
    pub total_cost: Price,
    /// Title similarity score that paired the two markets.
    pub similarity: f64,
}

/// Strategy-specific details, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OpportunityDetails {
    CrossVenue(CrossVenuePair),
}

/// A candidate trade with its expected edge and nominal size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Opportunity {
    kind: OpportunityKind,
    gross_profit_pct: Price,
    net_profit_pct: Price,
    size_usd: Usd,
    legs: [OpportunityLeg; 2],
    details: OpportunityDetails,
    #[serde(skip)]
    sized: bool,
}

impl Opportunity {
    /// Create a cross-venue YES/NO opportunity.
    ///
    /// The legs are derived from the pair: YES on `pair.yes_leg`, NO on
    /// `pair.no_leg`, in that order.
    #[must_use]
    pub fn cross_venue(
        pair: CrossVenuePair,
        yes_price: Price,
        no_price: Price,
        gross_profit_pct: Price,
        net_profit_pct: Price,
        size_usd: Usd,
    ) -> Self {
        let legs = [
            OpportunityLeg {
                venue: pair.yes_leg.venue,
                side: Side::Yes,
                price: yes_price,
                external_ref: pair.yes_leg.market_ref.clone(),
            },
            OpportunityLeg {
                venue: pair.no_leg.venue,
                side: Side::No,
                price: no_price,
                external_ref: pair.no_leg.market_ref.clone(),
            },
        ];

        Self {
            kind: OpportunityKind::CrossVenueYesNo,
            gross_profit_pct,
            net_profit_pct,
            size_usd,
            legs,
            details: OpportunityDetails::CrossVenue(pair),
            sized: false,
        }
    }

    #[must_use]
    pub fn kind(&self) -> OpportunityKind {
        self.kind
    }

    /// Profit percentage before fees.
    #[must_use]
    pub fn gross_profit_pct(&self) -> Price {
        self.gross_profit_pct
    }

    /// Profit percentage after fees.
    #[must_use]
    pub fn net_profit_pct(&self) -> Price {
        self.net_profit_pct
    }

    /// Dollar size: nominal until [`apply_safe_size`](Self::apply_safe_size) runs.
    #[must_use]
    pub fn size_usd(&self) -> Usd {
        self.size_usd
    }

    /// The two legs, in execution order.
    #[must_use]
    pub fn legs(&self) -> &[OpportunityLeg; 2] {
        &self.legs
    }

    #[must_use]
    pub fn details(&self) -> &OpportunityDetails {
        &self.details
    }

    /// Title of the first leg's market, for logs and alerts.
    #[must_use]
    pub fn title(&self) -> &str {
        match &self.details {
            OpportunityDetails::CrossVenue(pair) => &pair.yes_leg.title,
        }
    }

    /// Whether the capital guard has already sized this opportunity.
    #[must_use]
    pub fn is_sized(&self) -> bool {
        self.sized
    }

    /// Replace the nominal size with the guard-approved size.
    ///
    /// # Errors
    ///
    /// Fails if the size is negative or was already applied.
    pub fn apply_safe_size(&mut self, size: Usd) -> Result<(), DomainError> {
        if self.sized {
            return Err(DomainError::AlreadySized {
                size: self.size_usd,
            });
        }
        if size < Decimal::ZERO {
            return Err(DomainError::NegativeSize { size });
        }
        self.size_usd = size;
        self.sized = true;
        Ok(())
    }
}

impl fmt::Display for Opportunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [yes, no] = &self.legs;
        write!(
            f,
            "{} YES@{} + {} NO@{} net {:.2}% ${}",
            yes.venue, yes.price, no.venue, no.price, self.net_profit_pct, self.size_usd
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn pair() -> CrossVenuePair {
        CrossVenuePair {
            yes_leg: LegTarget {
                venue: Venue::Polymarket,
                market_ref: MarketRef::from("0xabc"),
                order_ref: "1111".into(),
                title: "Fed cuts rates in June".into(),
            },
            no_leg: LegTarget {
                venue: Venue::Kalshi,
                market_ref: MarketRef::from("FED-25JUN"),
                order_ref: "FED-25JUN".into(),
                title: "Will the Fed cut rates in June?".into(),
            },
            total_cost: dec!(0.97381),
            similarity: 0.75,
        }
    }

    fn opportunity() -> Opportunity {
        Opportunity::cross_venue(
            pair(),
            dec!(0.45),
            dec!(0.52),
            dec!(3.09),
            dec!(2.69),
            dec!(1000),
        )
    }

    #[test]
    fn legs_follow_pair_order() {
        let opp = opportunity();
        let [yes, no] = opp.legs();

        assert_eq!(opp.kind(), OpportunityKind::CrossVenueYesNo);
        assert_eq!(yes.venue, Venue::Polymarket);
        assert_eq!(yes.side, Side::Yes);
        assert_eq!(yes.price, dec!(0.45));
        assert_eq!(no.venue, Venue::Kalshi);
        assert_eq!(no.side, Side::No);
        assert_eq!(no.external_ref.as_str(), "FED-25JUN");
        assert_eq!(opp.title(), "Fed cuts rates in June");
    }

    #[test]
    fn apply_safe_size_once() {
        let mut opp = opportunity();
        assert!(!opp.is_sized());

        opp.apply_safe_size(dec!(250)).unwrap();
        assert_eq!(opp.size_usd(), dec!(250));
        assert!(opp.is_sized());

        let err = opp.apply_safe_size(dec!(100)).unwrap_err();
        assert_eq!(err, DomainError::AlreadySized { size: dec!(250) });
        assert_eq!(opp.size_usd(), dec!(250));
    }

    #[test]
    fn apply_safe_size_rejects_negative() {
        let mut opp = opportunity();
        assert!(matches!(
            opp.apply_safe_size(dec!(-1)),
            Err(DomainError::NegativeSize { .. })
        ));
        assert!(!opp.is_sized());
    }

    #[test]
    fn apply_safe_size_accepts_zero() {
        let mut opp = opportunity();
        opp.apply_safe_size(dec!(0)).unwrap();
        assert_eq!(opp.size_usd(), dec!(0));
    }

    #[test]
    fn details_serialize_with_kind_tag() {
        let json = serde_json::to_value(opportunity().details()).unwrap();
        assert_eq!(json["kind"], "cross_venue");
        assert_eq!(json["yes_leg"]["venue"], "polymarket");
        assert_eq!(json["no_leg"]["order_ref"], "FED-25JUN");
    }
}
