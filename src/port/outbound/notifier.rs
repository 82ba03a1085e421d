//! Notifier port for event notifications.
//!
//! Defines the trait for sending notifications about detected opportunities,
//! executions, partial fills, and cycle failures.

use rust_decimal::Decimal;

use crate::domain::{Opportunity, OrderId, Venue};

/// Events that can trigger notifications.
#[derive(Debug, Clone)]
pub enum Event {
    /// Cross-venue opportunity detected.
    OpportunityDetected(OpportunityEvent),
    /// Validator rejected an opportunity.
    OpportunityRejected {
        title: String,
        validator: &'static str,
    },
    /// Execution finished, successfully or not.
    ExecutionCompleted(ExecutionEvent),
    /// One leg filled and the other did not. Open directional exposure.
    PartialFill {
        title: String,
        filled: Venue,
        failed: Venue,
        order_id: OrderId,
        reason: String,
    },
    /// A scan cycle could not complete.
    CycleFailed { reason: String },
}

impl Event {
    /// Whether the event needs operator attention.
    #[must_use]
    pub fn is_alert(&self) -> bool {
        matches!(self, Self::PartialFill { .. } | Self::CycleFailed { .. })
    }
}

/// Opportunity detection event.
#[derive(Debug, Clone)]
pub struct OpportunityEvent {
    pub title: String,
    pub yes_venue: Venue,
    pub yes_price: Decimal,
    pub no_venue: Venue,
    pub no_price: Decimal,
    pub net_profit_pct: Decimal,
    pub size_usd: Decimal,
}

impl From<&Opportunity> for OpportunityEvent {
    fn from(opp: &Opportunity) -> Self {
        let [yes, no] = opp.legs();
        Self {
            title: opp.title().to_string(),
            yes_venue: yes.venue,
            yes_price: yes.price,
            no_venue: no.venue,
            no_price: no.price,
            net_profit_pct: opp.net_profit_pct(),
            size_usd: opp.size_usd(),
        }
    }
}

/// Execution result event.
#[derive(Debug, Clone)]
pub struct ExecutionEvent {
    pub title: String,
    pub success: bool,
    pub size_usd: Decimal,
    pub details: String,
}

/// Handler for system events.
///
/// Notifications are fire-and-forget. Implementations must be thread-safe
/// and must not block: slow I/O belongs on a spawned task or worker.
pub trait Notifier: Send + Sync {
    /// Handle an event.
    fn notify(&self, event: Event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alerts_are_partial_fills_and_cycle_failures() {
        assert!(Event::CycleFailed {
            reason: "x".into()
        }
        .is_alert());
        assert!(Event::PartialFill {
            title: "t".into(),
            filled: Venue::Polymarket,
            failed: Venue::Kalshi,
            order_id: OrderId::from("o-1"),
            reason: "rejected".into(),
        }
        .is_alert());
        assert!(!Event::OpportunityRejected {
            title: "t".into(),
            validator: "rule",
        }
        .is_alert());
    }
}
