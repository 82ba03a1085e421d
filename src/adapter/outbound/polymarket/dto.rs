//! Gamma API response types.
//!
//! Response format: flat JSON array of markets. Several fields are
//! JSON-encoded strings inside the JSON (`outcomes`, `outcomePrices`,
//! `clobTokenIds`), and numbers arrive as either JSON numbers or strings.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::{Market, Price, Venue};

/// Spread applied around the outcome price when no top-of-book is given.
pub const OUTCOME_PRICE_SPREAD: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Market data from the Gamma API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GammaMarket {
    /// Condition ID (same as CLOB's `condition_id`).
    #[serde(default)]
    pub condition_id: String,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub closed: bool,
    /// JSON-encoded outcome names (e.g., `["Yes", "No"]`).
    #[serde(default)]
    pub outcomes: Option<String>,
    /// JSON-encoded outcome prices (e.g., `["0.65", "0.35"]`).
    #[serde(default)]
    pub outcome_prices: Option<String>,
    /// JSON-encoded CLOB token IDs, in outcome order.
    #[serde(default)]
    pub clob_token_ids: Option<String>,
    #[serde(default)]
    pub best_bid: Option<Value>,
    #[serde(default)]
    pub best_ask: Option<Value>,
    #[serde(default)]
    pub volume_num: Option<Value>,
    #[serde(default)]
    pub volume: Option<Value>,
}

impl GammaMarket {
    /// Parse the JSON-encoded CLOB token IDs.
    #[must_use]
    pub fn token_ids(&self) -> Vec<String> {
        self.decode_list(self.clob_token_ids.as_deref(), "clobTokenIds")
    }

    /// Parse the JSON-encoded outcome names.
    #[must_use]
    pub fn outcome_names(&self) -> Vec<String> {
        self.decode_list(self.outcomes.as_deref(), "outcomes")
    }

    /// Parse the JSON-encoded outcome prices.
    #[must_use]
    pub fn outcome_prices(&self) -> Vec<Decimal> {
        self.decode_list(self.outcome_prices.as_deref(), "outcomePrices")
            .iter()
            .filter_map(|p| p.parse::<Decimal>().ok())
            .collect()
    }

    fn decode_list(&self, raw: Option<&str>, field: &'static str) -> Vec<String> {
        raw.and_then(|s| {
            serde_json::from_str::<Vec<String>>(s)
                .map_err(|e| {
                    debug!(
                        error = %e,
                        raw = %s,
                        condition_id = %self.condition_id,
                        field,
                        "Failed to parse JSON-encoded field"
                    );
                })
                .ok()
        })
        .unwrap_or_default()
    }

    /// Whether the outcomes are exactly YES then NO.
    #[must_use]
    pub fn is_binary(&self) -> bool {
        let names = self.outcome_names();
        names.len() == 2
            && names[0].eq_ignore_ascii_case("yes")
            && names[1].eq_ignore_ascii_case("no")
    }

    /// YES bid and ask: top of book when present, otherwise the outcome
    /// price ± 1¢, clamped to `[0, 1]`.
    #[must_use]
    pub fn yes_quote(&self) -> Option<(Price, Price)> {
        let best_bid = self.best_bid.as_ref().and_then(decimal);
        let best_ask = self.best_ask.as_ref().and_then(decimal);
        if let (Some(bid), Some(ask)) = (best_bid, best_ask) {
            if ask > Decimal::ZERO {
                return Some((bid, ask));
            }
        }

        let mid = *self.outcome_prices().first()?;
        let bid = (mid - OUTCOME_PRICE_SPREAD).max(Decimal::ZERO);
        let ask = (mid + OUTCOME_PRICE_SPREAD).min(Decimal::ONE);
        Some((bid, ask))
    }

    #[must_use]
    pub fn volume(&self) -> Decimal {
        self.volume_num
            .as_ref()
            .or(self.volume.as_ref())
            .and_then(decimal)
            .unwrap_or_default()
    }

    /// Convert to a domain market, or explain why the record is skipped.
    ///
    /// # Errors
    ///
    /// Returns the skip reason for closed, non-binary, untradable or
    /// unpriced markets.
    pub fn to_market(&self) -> Result<Market, &'static str> {
        if self.closed {
            return Err("closed");
        }
        if self.condition_id.is_empty() {
            return Err("missing condition id");
        }
        if !self.is_binary() {
            return Err("not a YES/NO market");
        }
        let tokens = self.token_ids();
        if tokens.len() < 2 {
            return Err("fewer than two CLOB tokens");
        }
        let (yes_bid, yes_ask) = self.yes_quote().ok_or("no price")?;

        Ok(Market::from_yes_quotes(
            Venue::Polymarket,
            self.condition_id.as_str(),
            self.question.clone().unwrap_or_default(),
            yes_bid,
            yes_ask,
            self.volume(),
        )
        .with_tokens(tokens[0].clone(), tokens[1].clone()))
    }
}

/// Read a decimal from a JSON number or numeric string.
fn decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n.to_string().parse().ok(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Side;
    use rust_decimal_macros::dec;

    fn market(json: &str) -> GammaMarket {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn gamma_market_deserializes_from_api_response() {
        let m = market(
            r#"{
            "conditionId": "0xabc123",
            "question": "Will the Fed cut rates in June?",
            "active": true,
            "closed": false,
            "outcomes": "[\"Yes\", \"No\"]",
            "outcomePrices": "[\"0.65\", \"0.35\"]",
            "clobTokenIds": "[\"token-yes\", \"token-no\"]",
            "bestBid": 0.44,
            "bestAsk": 0.45,
            "volumeNum": 1081783.60,
            "volume": "1081783.6"
        }"#,
        );

        let converted = m.to_market().unwrap();
        assert_eq!(converted.venue(), Venue::Polymarket);
        assert_eq!(converted.external_ref().as_str(), "0xabc123");
        assert_eq!(converted.yes_bid(), dec!(0.44));
        assert_eq!(converted.yes_ask(), dec!(0.45));
        assert_eq!(converted.no_bid(), dec!(0.55));
        assert_eq!(converted.no_ask(), dec!(0.56));
        assert_eq!(converted.volume(), dec!(1081783.60));
        assert_eq!(converted.token(Side::Yes), "token-yes");
        assert_eq!(converted.token(Side::No), "token-no");
    }

    #[test]
    fn falls_back_to_outcome_price_spread() {
        let m = market(
            r#"{
            "conditionId": "0x1",
            "question": "q",
            "outcomes": "[\"Yes\", \"No\"]",
            "outcomePrices": "[\"0.995\", \"0.005\"]",
            "clobTokenIds": "[\"a\", \"b\"]"
        }"#,
        );

        let (bid, ask) = m.yes_quote().unwrap();
        assert_eq!(bid, dec!(0.985));
        assert_eq!(ask, dec!(1));
        assert!(m.to_market().unwrap().validate().is_ok());
    }

    #[test]
    fn skips_unusable_records() {
        let closed = market(
            r#"{"conditionId": "0x1", "closed": true,
                "outcomes": "[\"Yes\", \"No\"]", "outcomePrices": "[\"0.5\", \"0.5\"]",
                "clobTokenIds": "[\"a\", \"b\"]"}"#,
        );
        assert_eq!(closed.to_market().unwrap_err(), "closed");

        let categorical = market(
            r#"{"conditionId": "0x2",
                "outcomes": "[\"Trump\", \"Harris\"]", "outcomePrices": "[\"0.5\", \"0.5\"]",
                "clobTokenIds": "[\"a\", \"b\"]"}"#,
        );
        assert_eq!(categorical.to_market().unwrap_err(), "not a YES/NO market");

        let one_token = market(
            r#"{"conditionId": "0x3",
                "outcomes": "[\"Yes\", \"No\"]", "outcomePrices": "[\"0.5\", \"0.5\"]",
                "clobTokenIds": "[\"a\"]"}"#,
        );
        assert_eq!(one_token.to_market().unwrap_err(), "fewer than two CLOB tokens");

        let unpriced = market(
            r#"{"conditionId": "0x4", "outcomes": "[\"Yes\", \"No\"]",
                "clobTokenIds": "[\"a\", \"b\"]"}"#,
        );
        assert_eq!(unpriced.to_market().unwrap_err(), "no price");
    }

    #[test]
    fn malformed_encoded_fields_are_empty() {
        let m = market(r#"{"conditionId": "0x5", "outcomes": "not json", "clobTokenIds": "[1, 2]"}"#);
        assert!(m.outcome_names().is_empty());
        assert!(m.token_ids().is_empty());
        assert_eq!(m.volume(), Decimal::ZERO);
    }
}
