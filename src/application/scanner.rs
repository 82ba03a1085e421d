//! Cross-venue opportunity scanner.
//!
//! Pairs markets from two venues by title similarity and prices buying YES on
//! the first venue plus NO on the second. A pair is an opportunity when the
//! fee-inclusive cost of one contract of each is strictly below $1 and the
//! resulting net profit percentage clears the configured minimum.
//!
//! Matching is all-pairs, so a scan costs `O(|A| × |B|)` title comparisons.
//! That is the practical ceiling on listing size per cycle.

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::money::HUNDRED;
use crate::domain::similarity::DEFAULT_SIMILARITY_THRESHOLD;
use crate::domain::{
    CrossVenuePair, FeeSchedule, LegTarget, Market, Opportunity, Side, SimilarityMatcher, Usd,
};

/// Scanner configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Minimum fee-adjusted profit, in percent, to emit an opportunity.
    pub min_profit_pct: Decimal,
    /// Nominal dollar size attached to each opportunity before sizing.
    pub nominal_size_usd: Usd,
    /// Jaccard threshold for pairing titles.
    pub similarity_threshold: f64,
    /// Maximum markets requested from each venue per cycle.
    pub market_limit: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            min_profit_pct: Decimal::new(5, 1),
            nominal_size_usd: Decimal::from(1000),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            market_limit: 100,
        }
    }
}

/// Pure, stateless cross-venue scanner.
#[derive(Debug, Clone)]
pub struct Scanner {
    config: ScannerConfig,
    fees: FeeSchedule,
    matcher: SimilarityMatcher,
}

impl Scanner {
    #[must_use]
    pub fn new(config: ScannerConfig, fees: FeeSchedule) -> Self {
        let matcher = SimilarityMatcher::new(config.similarity_threshold);
        Self {
            config,
            fees,
            matcher,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    #[must_use]
    pub fn fees(&self) -> &FeeSchedule {
        &self.fees
    }

    /// Find YES-on-A / NO-on-B opportunities across the two listings.
    ///
    /// Invalid market records are skipped and logged. Returns an empty list
    /// if either side is empty.
    #[must_use]
    pub fn scan(&self, markets_a: &[Market], markets_b: &[Market]) -> Vec<Opportunity> {
        let valid_a = Self::valid_markets(markets_a);
        let valid_b = Self::valid_markets(markets_b);

        let mut opportunities = Vec::new();
        for a in &valid_a {
            for b in &valid_b {
                if !self.matcher.is_same_event(a.title(), b.title()) {
                    continue;
                }
                if let Some(opportunity) = self.price_pair(a, b) {
                    opportunities.push(opportunity);
                }
            }
        }

        debug!(
            markets_a = valid_a.len(),
            markets_b = valid_b.len(),
            opportunities = opportunities.len(),
            "Scan complete"
        );
        opportunities
    }

    /// Price a matched pair, returning an opportunity if it clears the bar.
    fn price_pair(&self, a: &Market, b: &Market) -> Option<Opportunity> {
        let yes_price = a.yes_ask();
        let no_price = b.no_ask();

        let raw_total = yes_price + no_price;
        let total_cost =
            self.fees.cost(a.venue(), yes_price) + self.fees.cost(b.venue(), no_price);

        if total_cost >= Decimal::ONE || raw_total <= Decimal::ZERO {
            return None;
        }

        let net_profit_pct = (Decimal::ONE - total_cost) / total_cost * HUNDRED;
        if net_profit_pct < self.config.min_profit_pct {
            return None;
        }
        let gross_profit_pct = (Decimal::ONE - raw_total) / raw_total * HUNDRED;

        let pair = CrossVenuePair {
            yes_leg: LegTarget {
                venue: a.venue(),
                market_ref: a.external_ref().clone(),
                order_ref: a.token(Side::Yes).to_string(),
                title: a.title().to_string(),
            },
            no_leg: LegTarget {
                venue: b.venue(),
                market_ref: b.external_ref().clone(),
                order_ref: b.token(Side::No).to_string(),
                title: b.title().to_string(),
            },
            total_cost,
            similarity: self.matcher.similarity(a.title(), b.title()),
        };

        debug!(
            yes_market = %a.external_ref(),
            no_market = %b.external_ref(),
            total_cost = %total_cost,
            net_profit_pct = %net_profit_pct.round_dp(4),
            "Opportunity found"
        );

        Some(Opportunity::cross_venue(
            pair,
            yes_price,
            no_price,
            gross_profit_pct,
            net_profit_pct,
            self.config.nominal_size_usd,
        ))
    }

    fn valid_markets(markets: &[Market]) -> Vec<&Market> {
        markets
            .iter()
            .filter(|market| match market.validate() {
                Ok(()) => true,
                Err(e) => {
                    warn!(
                        venue = %market.venue(),
                        market = %market.external_ref(),
                        error = %e,
                        "Skipping invalid market"
                    );
                    false
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OpportunityDetails, Venue};
    use rust_decimal_macros::dec;

    fn poly(title: &str, yes_ask: Decimal) -> Market {
        Market::from_yes_quotes(
            Venue::Polymarket,
            "0xpoly",
            title,
            yes_ask - dec!(0.01),
            yes_ask,
            dec!(1000),
        )
        .with_tokens("yes-token", "no-token")
    }

    fn kalshi(title: &str, no_ask: Decimal) -> Market {
        // no_ask = 1 - yes_bid
        let yes_bid = Decimal::ONE - no_ask;
        Market::from_yes_quotes(
            Venue::Kalshi,
            "KX-TEST",
            title,
            yes_bid,
            yes_bid + dec!(0.01),
            dec!(500),
        )
    }

    fn scanner(min_profit_pct: Decimal, fees: FeeSchedule) -> Scanner {
        Scanner::new(
            ScannerConfig {
                min_profit_pct,
                ..ScannerConfig::default()
            },
            fees,
        )
    }

    const TITLE_A: &str = "Will the Fed cut rates in June 2025?";
    const TITLE_B: &str = "Fed cuts rates June 2025";

    #[test]
    fn detects_fee_adjusted_opportunity() {
        let scanner = scanner(dec!(2.68), FeeSchedule::default());
        let opps = scanner.scan(&[poly(TITLE_A, dec!(0.45))], &[kalshi(TITLE_B, dec!(0.52))]);

        assert_eq!(opps.len(), 1);
        let opp = &opps[0];
        assert!((opp.net_profit_pct() - dec!(2.6894)).abs() < dec!(0.0001));
        assert!(opp.gross_profit_pct() > opp.net_profit_pct());
        assert_eq!(opp.size_usd(), dec!(1000));

        let OpportunityDetails::CrossVenue(pair) = opp.details();
        assert_eq!(pair.total_cost, dec!(0.97381));
        assert_eq!(pair.yes_leg.order_ref, "yes-token");
        assert_eq!(pair.no_leg.order_ref, "KX-TEST");
    }

    #[test]
    fn below_min_profit_is_not_emitted() {
        let scanner = scanner(dec!(2.70), FeeSchedule::default());
        let opps = scanner.scan(&[poly(TITLE_A, dec!(0.45))], &[kalshi(TITLE_B, dec!(0.52))]);
        assert!(opps.is_empty());
    }

    #[test]
    fn total_cost_of_exactly_one_is_not_an_opportunity() {
        let scanner = scanner(dec!(0), FeeSchedule::zero());
        let opps = scanner.scan(&[poly(TITLE_A, dec!(0.40))], &[kalshi(TITLE_B, dec!(0.60))]);
        assert!(opps.is_empty());
    }

    #[test]
    fn unmatched_titles_are_ignored() {
        let scanner = scanner(dec!(0), FeeSchedule::zero());
        let opps = scanner.scan(
            &[poly(TITLE_A, dec!(0.30))],
            &[kalshi("Lakers win NBA championship", dec!(0.30))],
        );
        assert!(opps.is_empty());
    }

    #[test]
    fn invalid_markets_are_skipped() {
        let scanner = scanner(dec!(0), FeeSchedule::zero());
        let broken = Market::from_yes_quotes(
            Venue::Polymarket,
            "",
            TITLE_A,
            dec!(0.3),
            dec!(0.31),
            dec!(0),
        );
        let opps = scanner.scan(&[broken], &[kalshi(TITLE_B, dec!(0.30))]);
        assert!(opps.is_empty());
    }

    #[test]
    fn empty_side_yields_nothing() {
        let scanner = scanner(dec!(0), FeeSchedule::default());
        assert!(scanner.scan(&[], &[kalshi(TITLE_B, dec!(0.3))]).is_empty());
        assert!(scanner.scan(&[poly(TITLE_A, dec!(0.3))], &[]).is_empty());
    }

    #[test]
    fn every_matching_pair_is_priced() {
        let scanner = scanner(dec!(0), FeeSchedule::zero());
        let a = [poly(TITLE_A, dec!(0.40)), poly(TITLE_A, dec!(0.45))];
        let b = [kalshi(TITLE_B, dec!(0.50))];

        let opps = scanner.scan(&a, &b);
        assert_eq!(opps.len(), 2);
    }
}
