//! The scan-validate-size-execute cycle.
//!
//! [`AppContext`] owns every collaborator explicitly; nothing in the cycle
//! reaches for global state. One call to [`AppContext::run_cycle`] fetches
//! both venues, scans, and pushes each opportunity through the validator,
//! the capital guard, the executor and the portfolio.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tracing::{error, info, warn};

use crate::application::capital::CapitalGuard;
use crate::application::executor::{ExecutionResult, Executor};
use crate::application::portfolio::PortfolioTracker;
use crate::application::scanner::Scanner;
use crate::domain::{Market, Opportunity, PnlSnapshot, Venue};
use crate::error::ExecutionFailure;
use crate::port::{
    Event, ExecutionEvent, MarketSource, Notifier, OpportunityEvent, OpportunityValidator,
};

/// Default bound on one venue listing fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Per-cycle tunables that are not owned by a single service.
#[derive(Debug, Clone)]
pub struct CycleSettings {
    /// Largest share of total capital a single position may take.
    pub max_position_pct: Decimal,
    /// Bound on each venue listing fetch.
    pub fetch_timeout: Duration,
}

impl Default for CycleSettings {
    fn default() -> Self {
        Self {
            max_position_pct: Decimal::new(2, 1),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

/// What one cycle saw and did.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub markets_a: usize,
    pub markets_b: usize,
    pub fetch_failures: Vec<Venue>,
    pub opportunities: usize,
    pub rejected: usize,
    pub skipped_unsized: usize,
    pub executed: usize,
    pub failed: usize,
    pub partial_fills: usize,
    pub pnl: PnlSnapshot,
}

/// Explicitly wired application services.
pub struct AppContext {
    source_a: Arc<dyn MarketSource>,
    source_b: Arc<dyn MarketSource>,
    scanner: Scanner,
    validator: Arc<dyn OpportunityValidator>,
    guard: Arc<CapitalGuard>,
    executor: Executor,
    portfolio: Arc<PortfolioTracker>,
    notifier: Arc<dyn Notifier>,
    settings: CycleSettings,
}

impl AppContext {
    /// Wire a context. `source_a` supplies the YES leg, `source_b` the NO leg.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        source_a: Arc<dyn MarketSource>,
        source_b: Arc<dyn MarketSource>,
        scanner: Scanner,
        validator: Arc<dyn OpportunityValidator>,
        guard: Arc<CapitalGuard>,
        executor: Executor,
        portfolio: Arc<PortfolioTracker>,
        notifier: Arc<dyn Notifier>,
        settings: CycleSettings,
    ) -> Self {
        Self {
            source_a,
            source_b,
            scanner,
            validator,
            guard,
            executor,
            portfolio,
            notifier,
            settings,
        }
    }

    #[must_use]
    pub fn guard(&self) -> &Arc<CapitalGuard> {
        &self.guard
    }

    #[must_use]
    pub fn portfolio(&self) -> &Arc<PortfolioTracker> {
        &self.portfolio
    }

    #[must_use]
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    #[must_use]
    pub fn validator_name(&self) -> &'static str {
        self.validator.name()
    }

    /// Run one full cycle. Never fails: venue outages yield empty listings.
    pub async fn run_cycle(&self) -> CycleReport {
        let limit = self.scanner.config().market_limit;
        let (markets_a, markets_b) = tokio::join!(
            self.fetch(self.source_a.as_ref(), limit),
            self.fetch(self.source_b.as_ref(), limit),
        );

        let mut fetch_failures = Vec::new();
        let markets_a = markets_a.unwrap_or_else(|| {
            fetch_failures.push(self.source_a.venue());
            Vec::new()
        });
        let markets_b = markets_b.unwrap_or_else(|| {
            fetch_failures.push(self.source_b.venue());
            Vec::new()
        });

        if fetch_failures.len() == 2 {
            self.notifier.notify(Event::CycleFailed {
                reason: "no venue listings available".to_string(),
            });
        }

        let opportunities = self.scanner.scan(&markets_a, &markets_b);
        let mut report = CycleReport {
            markets_a: markets_a.len(),
            markets_b: markets_b.len(),
            fetch_failures,
            opportunities: opportunities.len(),
            rejected: 0,
            skipped_unsized: 0,
            executed: 0,
            failed: 0,
            partial_fills: 0,
            pnl: self.portfolio.snapshot(),
        };

        for opportunity in opportunities {
            self.process(opportunity, &mut report).await;
        }

        report.pnl = self.portfolio.snapshot();
        info!(
            markets_a = report.markets_a,
            markets_b = report.markets_b,
            opportunities = report.opportunities,
            executed = report.executed,
            rejected = report.rejected,
            failed = report.failed,
            used = %self.guard.used(),
            free = %self.guard.free_capital(),
            total_pnl = %report.pnl.total_pnl.round_dp(2),
            "Cycle complete"
        );
        report
    }

    async fn process(&self, mut opportunity: Opportunity, report: &mut CycleReport) {
        self.notifier
            .notify(Event::OpportunityDetected(OpportunityEvent::from(&opportunity)));

        if !self.validator.validate(&opportunity).await {
            info!(
                title = %opportunity.title(),
                validator = self.validator.name(),
                "Opportunity rejected"
            );
            report.rejected += 1;
            self.notifier.notify(Event::OpportunityRejected {
                title: opportunity.title().to_string(),
                validator: self.validator.name(),
            });
            return;
        }

        let size = self
            .guard
            .safe_position_size(opportunity.size_usd(), self.settings.max_position_pct);
        if size.is_zero() {
            info!(title = %opportunity.title(), "No free capital for opportunity");
            report.skipped_unsized += 1;
            return;
        }
        if let Err(e) = opportunity.apply_safe_size(size) {
            warn!(title = %opportunity.title(), error = %e, "Could not size opportunity");
            report.skipped_unsized += 1;
            return;
        }

        let result = self.executor.execute(&opportunity).await;
        self.record(&opportunity, &result, report);
    }

    fn record(&self, opportunity: &Opportunity, result: &ExecutionResult, report: &mut CycleReport) {
        if result.success {
            self.portfolio.add_position(opportunity, result);
            report.executed += 1;
        } else {
            report.failed += 1;
        }

        if let Some(ExecutionFailure::PartialFill {
            filled,
            failed,
            reason,
        }) = &result.failure
        {
            report.partial_fills += 1;
            if let Some(order_id) = result.order_ids.first() {
                self.notifier.notify(Event::PartialFill {
                    title: opportunity.title().to_string(),
                    filled: *filled,
                    failed: *failed,
                    order_id: order_id.clone(),
                    reason: reason.clone(),
                });
            }
        }

        self.notifier.notify(Event::ExecutionCompleted(ExecutionEvent {
            title: opportunity.title().to_string(),
            success: result.success,
            size_usd: result.size_usd,
            details: result.message.clone(),
        }));
    }

    async fn fetch(&self, source: &dyn MarketSource, limit: usize) -> Option<Vec<Market>> {
        let venue = source.venue();
        match tokio::time::timeout(self.settings.fetch_timeout, source.fetch_markets(limit)).await
        {
            Ok(Ok(markets)) => {
                info!(venue = %venue, count = markets.len(), "Fetched markets");
                Some(markets)
            }
            Ok(Err(e)) => {
                error!(venue = %venue, error = %e, "Market fetch failed");
                None
            }
            Err(_) => {
                error!(
                    venue = %venue,
                    timeout = ?self.settings.fetch_timeout,
                    "Market fetch timed out"
                );
                None
            }
        }
    }
}
