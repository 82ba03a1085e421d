//! Notification adapters.
//!
//! Implements the `port::Notifier` trait for various notification backends.
//! [`NotifierRegistry`] fans one event out to every registered backend.

pub mod discord;
pub mod format;
#[cfg(feature = "telegram")]
pub mod telegram;

use tracing::{debug, error, info, warn};

use crate::port::{Event, Notifier};

/// Fans events out to every registered notifier.
#[derive(Default)]
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Deliver `event` to every notifier, in registration order.
    pub fn notify_all(&self, event: Event) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Notifier for NotifierRegistry {
    fn notify(&self, event: Event) {
        self.notify_all(event);
    }
}

/// Writes every event to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        match &event {
            Event::OpportunityDetected(e) => info!(
                title = %e.title,
                yes = %format_args!("{}@{}", e.yes_venue, e.yes_price),
                no = %format_args!("{}@{}", e.no_venue, e.no_price),
                net_profit_pct = %e.net_profit_pct.round_dp(2),
                size = %e.size_usd,
                "Opportunity detected"
            ),
            Event::OpportunityRejected { title, validator } => {
                debug!(title = %title, validator, "Opportunity rejected");
            }
            Event::ExecutionCompleted(e) => info!(
                title = %e.title,
                success = e.success,
                size = %e.size_usd,
                details = %e.details,
                "Execution completed"
            ),
            Event::PartialFill {
                title,
                filled,
                failed,
                order_id,
                reason,
            } => error!(
                title = %title,
                filled = %filled,
                failed = %failed,
                order_id = %order_id,
                reason = %reason,
                "Partial fill needs manual attention"
            ),
            Event::CycleFailed { reason } => warn!(reason = %reason, "Cycle failed"),
        }
    }
}
