//! Per-venue taker fee model.

use rust_decimal::Decimal;
use serde::Deserialize;

use super::money::Price;
use super::venue::Venue;

/// Proportional taker fee rates applied on top of the ask price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    /// Polymarket taker rate (0.005 = 0.5%).
    pub polymarket: Decimal,
    /// Kalshi taker rate (0.003 = 0.3%).
    pub kalshi: Decimal,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            polymarket: Decimal::new(5, 3),
            kalshi: Decimal::new(3, 3),
        }
    }
}

impl FeeSchedule {
    /// A schedule with no fees, mostly useful in tests.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            polymarket: Decimal::ZERO,
            kalshi: Decimal::ZERO,
        }
    }

    /// Fee rate for a venue.
    #[must_use]
    pub fn rate(&self, venue: Venue) -> Decimal {
        match venue {
            Venue::Polymarket => self.polymarket,
            Venue::Kalshi => self.kalshi,
        }
    }

    /// Fee-inclusive cost of buying one contract at `price` on `venue`.
    #[must_use]
    pub fn cost(&self, venue: Venue, price: Price) -> Price {
        price * (Decimal::ONE + self.rate(venue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn default_rates() {
        let fees = FeeSchedule::default();
        assert_eq!(fees.rate(Venue::Polymarket), dec!(0.005));
        assert_eq!(fees.rate(Venue::Kalshi), dec!(0.003));
    }

    #[test]
    fn cost_applies_rate() {
        let fees = FeeSchedule::default();
        assert_eq!(fees.cost(Venue::Polymarket, dec!(0.45)), dec!(0.45225));
        assert_eq!(fees.cost(Venue::Kalshi, dec!(0.52)), dec!(0.52156));
    }

    #[test]
    fn zero_schedule_is_identity() {
        assert_eq!(FeeSchedule::zero().cost(Venue::Kalshi, dec!(0.6)), dec!(0.6));
    }
}
