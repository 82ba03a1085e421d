//! Periodic scan loop.
//!
//! Runs [`AppContext::run_cycle`] on a fixed interval until a shutdown
//! future resolves. Cycles never overlap: a slow cycle delays the next tick
//! and missed ticks are skipped rather than burst.

use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::application::{AppContext, CycleReport};

/// Drives the scan-validate-size-execute cycle.
pub struct Orchestrator {
    context: AppContext,
    interval: Duration,
}

impl Orchestrator {
    #[must_use]
    pub fn new(context: AppContext, interval: Duration) -> Self {
        Self { context, interval }
    }

    #[must_use]
    pub fn context(&self) -> &AppContext {
        &self.context
    }

    /// Run exactly one cycle.
    pub async fn run_once(&self) -> CycleReport {
        let report = self.context.run_cycle().await;
        self.log_summary(1);
        report
    }

    /// Run cycles until `shutdown` resolves. Returns the number of cycles run.
    ///
    /// A cycle in progress when shutdown fires is allowed to finish, so no
    /// order is abandoned between its two legs.
    pub async fn run_until<F>(&self, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(interval = ?self.interval, "Scan loop started");
        let mut cycles = 0u64;

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("Shutdown signal received");
                    break;
                }
                _ = ticker.tick() => {
                    self.context.run_cycle().await;
                    cycles += 1;
                }
            }
        }

        self.log_summary(cycles);
        cycles
    }

    fn log_summary(&self, cycles: u64) {
        let pnl = self.context.portfolio().snapshot();
        let guard = self.context.guard();
        info!(
            cycles,
            open_positions = pnl.open_positions,
            used = %guard.used(),
            free = %guard.free_capital(),
            realized_pnl = %pnl.realized_pnl.round_dp(2),
            unrealized_pnl = %pnl.unrealized_pnl.round_dp(2),
            total_pnl = %pnl.total_pnl.round_dp(2),
            "Session summary"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use rust_decimal_macros::dec;

    use crate::application::{
        CapitalGuard, CycleSettings, ExecutionMode, Executor, PortfolioTracker,
        RuleBasedValidator, Scanner, ScannerConfig,
    };
    use crate::domain::{FeeSchedule, Venue};
    use crate::testkit::notifier::RecordingNotifier;
    use crate::testkit::source::StaticMarketSource;

    fn orchestrator(source_a: Arc<StaticMarketSource>, interval: Duration) -> Orchestrator {
        let guard = Arc::new(CapitalGuard::new(dec!(5000)));
        let context = AppContext::new(
            source_a,
            Arc::new(StaticMarketSource::empty(Venue::Kalshi)),
            Scanner::new(ScannerConfig::default(), FeeSchedule::default()),
            Arc::new(RuleBasedValidator::new(dec!(0.5))),
            Arc::clone(&guard),
            Executor::new(Arc::clone(&guard), ExecutionMode::Sim),
            Arc::new(PortfolioTracker::new(Arc::clone(&guard))),
            Arc::new(RecordingNotifier::new()),
            CycleSettings::default(),
        );
        Orchestrator::new(context, interval)
    }

    #[tokio::test]
    async fn run_once_runs_a_single_cycle() {
        let source = Arc::new(StaticMarketSource::empty(Venue::Polymarket));
        let orchestrator = orchestrator(Arc::clone(&source), Duration::from_secs(60));

        let report = orchestrator.run_once().await;
        assert_eq!(report.opportunities, 0);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn stops_when_shutdown_resolves() {
        let source = Arc::new(StaticMarketSource::empty(Venue::Polymarket));
        let orchestrator = orchestrator(Arc::clone(&source), Duration::from_millis(10));

        let cycles = orchestrator
            .run_until(tokio::time::sleep(Duration::from_millis(55)))
            .await;

        assert!(cycles >= 2);
        assert_eq!(u64::from(source.calls()), cycles);
    }
}
