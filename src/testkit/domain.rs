//! Builders for domain primitives used across tests.
//!
//! Keeps tests focused on assertions rather than construction boilerplate.

use rust_decimal::Decimal;

use crate::domain::{
    CrossVenuePair, LegTarget, Market, MarketRef, Opportunity, Side, Venue,
};

/// A Polymarket market with the given YES ask and a one cent spread.
///
/// CLOB token ids are `<id>-yes` / `<id>-no`.
pub fn poly_market(id: &str, title: &str, yes_ask: Decimal) -> Market {
    Market::from_yes_quotes(
        Venue::Polymarket,
        id,
        title,
        yes_ask - Decimal::new(1, 2),
        yes_ask,
        Decimal::from(10_000),
    )
    .with_tokens(format!("{id}-yes"), format!("{id}-no"))
}

/// A Kalshi market quoted so that its NO ask equals `no_ask`.
pub fn kalshi_market(ticker: &str, title: &str, no_ask: Decimal) -> Market {
    let yes_bid = Decimal::ONE - no_ask;
    Market::from_yes_quotes(
        Venue::Kalshi,
        ticker,
        title,
        yes_bid,
        yes_bid + Decimal::new(1, 2),
        Decimal::from(5_000),
    )
}

/// An opportunity pairing YES on `yes` with NO on `no` at their current asks.
pub fn opportunity_between(
    yes: &Market,
    no: &Market,
    net_profit_pct: Decimal,
    size_usd: Decimal,
) -> Opportunity {
    let pair = CrossVenuePair {
        yes_leg: leg(yes, Side::Yes),
        no_leg: leg(no, Side::No),
        total_cost: yes.yes_ask() + no.no_ask(),
        similarity: 1.0,
    };
    Opportunity::cross_venue(
        pair,
        yes.yes_ask(),
        no.no_ask(),
        net_profit_pct,
        net_profit_pct,
        size_usd,
    )
}

/// A Polymarket-YES / Kalshi-NO opportunity with canned identifiers.
pub fn opportunity(net_profit_pct: Decimal, size_usd: Decimal) -> Opportunity {
    let yes = poly_market("0xfed", "Fed cuts rates in June", Decimal::new(45, 2));
    let no = kalshi_market("FED-25JUN", "Will the Fed cut rates in June?", Decimal::new(52, 2));
    opportunity_between(&yes, &no, net_profit_pct, size_usd)
}

fn leg(market: &Market, side: Side) -> LegTarget {
    LegTarget {
        venue: market.venue(),
        market_ref: MarketRef::new(market.external_ref().as_str()),
        order_ref: market.token(side).to_string(),
        title: market.title().to_string(),
    }
}
