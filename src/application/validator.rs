//! Opportunity validators.
//!
//! Two implementations of [`OpportunityValidator`]: a profit-threshold rule,
//! and an LLM check that both markets describe the same event with the same
//! resolution source. The LLM validator falls back to the rule whenever the
//! model cannot give an answer.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::domain::{Opportunity, OpportunityDetails};
use crate::port::{Llm, OpportunityValidator};

/// Default bound on one LLM round-trip.
pub const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(15);

/// Accepts opportunities whose net profit meets a threshold.
#[derive(Debug, Clone)]
pub struct RuleBasedValidator {
    min_profit_pct: Decimal,
}

impl RuleBasedValidator {
    #[must_use]
    pub const fn new(min_profit_pct: Decimal) -> Self {
        Self { min_profit_pct }
    }

    fn accepts(&self, opportunity: &Opportunity) -> bool {
        opportunity.net_profit_pct() >= self.min_profit_pct
    }
}

#[async_trait]
impl OpportunityValidator for RuleBasedValidator {
    fn name(&self) -> &'static str {
        "rule"
    }

    async fn validate(&self, opportunity: &Opportunity) -> bool {
        self.accepts(opportunity)
    }
}

/// Asks an LLM whether the paired markets are the same event.
pub struct LlmValidator {
    llm: Arc<dyn Llm>,
    fallback: RuleBasedValidator,
    timeout: Duration,
}

impl LlmValidator {
    #[must_use]
    pub fn new(llm: Arc<dyn Llm>, fallback: RuleBasedValidator) -> Self {
        Self {
            llm,
            fallback,
            timeout: DEFAULT_LLM_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn prompt(opportunity: &Opportunity) -> String {
        let OpportunityDetails::CrossVenue(pair) = opportunity.details();
        format!(
            "Validate this arbitrage opportunity:\n\
             Type: {kind}\n\
             Net profit %: {pct:.2}\n\
             Market A ({yes_venue}, buy YES): {yes_title}\n\
             Market B ({no_venue}, buy NO): {no_title}\n\
             For prediction markets: is this the EXACT same event with identical resolution source?\n\
             Reply with ONLY 'YES' or 'NO'.",
            kind = opportunity.kind(),
            pct = opportunity.net_profit_pct(),
            yes_venue = pair.yes_leg.venue,
            yes_title = pair.yes_leg.title,
            no_venue = pair.no_leg.venue,
            no_title = pair.no_leg.title,
        )
    }
}

#[async_trait]
impl OpportunityValidator for LlmValidator {
    fn name(&self) -> &'static str {
        "llm"
    }

    async fn validate(&self, opportunity: &Opportunity) -> bool {
        let prompt = Self::prompt(opportunity);

        match tokio::time::timeout(self.timeout, self.llm.complete(&prompt)).await {
            Ok(Ok(reply)) => {
                let accepted = reply.trim().to_uppercase().contains("YES");
                debug!(
                    provider = self.llm.name(),
                    reply = %reply.trim(),
                    accepted,
                    "LLM validation"
                );
                accepted
            }
            Ok(Err(e)) => {
                warn!(provider = self.llm.name(), error = %e, "LLM validation failed, using rule");
                self.fallback.accepts(opportunity)
            }
            Err(_) => {
                warn!(
                    provider = self.llm.name(),
                    timeout = ?self.timeout,
                    "LLM validation timed out, using rule"
                );
                self.fallback.accepts(opportunity)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CrossVenuePair, LegTarget, MarketRef, Venue};
    use crate::testkit::llm::ScriptedLlm;
    use rust_decimal_macros::dec;

    fn opportunity(net_pct: Decimal) -> Opportunity {
        let pair = CrossVenuePair {
            yes_leg: LegTarget {
                venue: Venue::Polymarket,
                market_ref: MarketRef::from("0xabc"),
                order_ref: "1".into(),
                title: "Fed cuts rates in June".into(),
            },
            no_leg: LegTarget {
                venue: Venue::Kalshi,
                market_ref: MarketRef::from("FED"),
                order_ref: "FED".into(),
                title: "Will the Fed cut rates in June?".into(),
            },
            total_cost: dec!(0.98),
            similarity: 0.6,
        };
        Opportunity::cross_venue(pair, dec!(0.45), dec!(0.52), net_pct, net_pct, dec!(1000))
    }

    #[tokio::test]
    async fn rule_validator_uses_threshold() {
        let validator = RuleBasedValidator::new(dec!(0.5));
        assert!(validator.validate(&opportunity(dec!(0.5))).await);
        assert!(!validator.validate(&opportunity(dec!(0.49))).await);
    }

    #[tokio::test]
    async fn llm_yes_accepts() {
        let llm = Arc::new(ScriptedLlm::replying("yes."));
        let validator = LlmValidator::new(llm.clone(), RuleBasedValidator::new(dec!(99)));

        assert!(validator.validate(&opportunity(dec!(1))).await);
        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Fed cuts rates in June"));
        assert!(prompts[0].contains("Will the Fed cut rates in June?"));
    }

    #[tokio::test]
    async fn llm_no_rejects_even_above_threshold() {
        let llm = Arc::new(ScriptedLlm::replying("NO"));
        let validator = LlmValidator::new(llm, RuleBasedValidator::new(dec!(0)));
        assert!(!validator.validate(&opportunity(dec!(5))).await);
    }

    #[tokio::test]
    async fn llm_error_falls_back_to_rule() {
        let llm = Arc::new(ScriptedLlm::failing("rate limited"));
        let validator = LlmValidator::new(llm, RuleBasedValidator::new(dec!(0.5)));

        assert!(validator.validate(&opportunity(dec!(1))).await);
        assert!(!validator.validate(&opportunity(dec!(0.1))).await);
    }

    #[tokio::test]
    async fn llm_timeout_falls_back_to_rule() {
        let llm = Arc::new(ScriptedLlm::replying("YES").with_delay(Duration::from_millis(200)));
        let validator = LlmValidator::new(llm, RuleBasedValidator::new(dec!(5)))
            .with_timeout(Duration::from_millis(10));

        assert!(!validator.validate(&opportunity(dec!(1))).await);
    }
}
