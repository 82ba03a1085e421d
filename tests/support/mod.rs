#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use crossarb::application::{
    AppContext, CapitalGuard, CycleSettings, ExecutionMode, Executor, PortfolioTracker,
    RuleBasedValidator, Scanner, ScannerConfig,
};
use crossarb::domain::{FeeSchedule, Market, Venue};
use crossarb::port::{MarketSource, OpportunityValidator, OrderPlacer};
use crossarb::testkit::notifier::RecordingNotifier;
use crossarb::testkit::source::StaticMarketSource;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Everything a cycle test needs to inspect after running.
pub struct Harness {
    pub context: AppContext,
    pub guard: Arc<CapitalGuard>,
    pub notifier: RecordingNotifier,
    pub polymarket: Arc<StaticMarketSource>,
    pub kalshi: Arc<StaticMarketSource>,
}

/// Builder for an [`AppContext`] wired to in-memory collaborators.
pub struct HarnessBuilder {
    polymarket: StaticMarketSource,
    kalshi: StaticMarketSource,
    max_capital: Decimal,
    max_position_pct: Decimal,
    mode: ExecutionMode,
    placers: Vec<Arc<dyn OrderPlacer>>,
    validator: Option<Arc<dyn OpportunityValidator>>,
    fetch_timeout: Duration,
    order_timeout: Option<Duration>,
}

impl HarnessBuilder {
    pub fn new() -> Self {
        Self {
            polymarket: StaticMarketSource::empty(Venue::Polymarket),
            kalshi: StaticMarketSource::empty(Venue::Kalshi),
            max_capital: dec!(5000),
            max_position_pct: dec!(0.2),
            mode: ExecutionMode::Sim,
            placers: Vec::new(),
            validator: None,
            fetch_timeout: Duration::from_secs(5),
            order_timeout: None,
        }
    }

    pub fn polymarket(mut self, markets: Vec<Market>) -> Self {
        self.polymarket = StaticMarketSource::new(Venue::Polymarket, markets);
        self
    }

    pub fn polymarket_source(mut self, source: StaticMarketSource) -> Self {
        self.polymarket = source;
        self
    }

    pub fn kalshi(mut self, markets: Vec<Market>) -> Self {
        self.kalshi = StaticMarketSource::new(Venue::Kalshi, markets);
        self
    }

    pub fn kalshi_source(mut self, source: StaticMarketSource) -> Self {
        self.kalshi = source;
        self
    }

    pub fn capital(mut self, max_capital: Decimal, max_position_pct: Decimal) -> Self {
        self.max_capital = max_capital;
        self.max_position_pct = max_position_pct;
        self
    }

    pub fn live(mut self, placers: Vec<Arc<dyn OrderPlacer>>) -> Self {
        self.mode = ExecutionMode::Live;
        self.placers = placers;
        self
    }

    pub fn validator(mut self, validator: Arc<dyn OpportunityValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn order_timeout(mut self, timeout: Duration) -> Self {
        self.order_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Harness {
        let guard = Arc::new(CapitalGuard::new(self.max_capital));
        let notifier = RecordingNotifier::new();
        let polymarket = Arc::new(self.polymarket);
        let kalshi = Arc::new(self.kalshi);

        let mut executor = Executor::new(Arc::clone(&guard), self.mode);
        if let Some(timeout) = self.order_timeout {
            executor = executor.with_order_timeout(timeout);
        }
        for placer in self.placers {
            executor = executor.with_placer(placer);
        }

        let scanner = Scanner::new(ScannerConfig::default(), FeeSchedule::default());
        let validator = self.validator.unwrap_or_else(|| {
            Arc::new(RuleBasedValidator::new(scanner.config().min_profit_pct))
        });

        let context = AppContext::new(
            Arc::clone(&polymarket) as Arc<dyn MarketSource>,
            Arc::clone(&kalshi) as Arc<dyn MarketSource>,
            scanner,
            validator,
            Arc::clone(&guard),
            executor,
            Arc::new(PortfolioTracker::new(Arc::clone(&guard))),
            Arc::new(notifier.clone()),
            CycleSettings {
                max_position_pct: self.max_position_pct,
                fetch_timeout: self.fetch_timeout,
            },
        );

        Harness {
            context,
            guard,
            notifier,
            polymarket,
            kalshi,
        }
    }
}

impl Default for HarnessBuilder {
    fn default() -> Self {
        Self::new()
    }
}
