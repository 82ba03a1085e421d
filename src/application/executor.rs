//! Two-leg order execution.
//!
//! The [`Executor`] turns a sized opportunity into two venue orders, placed
//! sequentially: the YES leg first, then the NO leg. Capital is committed to
//! the guard only after both venues acknowledge. A failed second leg is
//! reported as a partial fill carrying the first leg's order id; nothing is
//! unwound automatically.
//!
//! Live executions hold a settlement lock from admission until the capital
//! is committed, so the admission check and the allocation see the same
//! ledger.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::application::capital::CapitalGuard;
use crate::domain::{
    CrossVenuePair, LegTarget, Opportunity, OpportunityDetails, OrderId, Side, Usd, Venue,
};
use crate::error::ExecutionFailure;
use crate::port::{OrderPlacer, OrderRequest};

/// Default bound on a single order round-trip.
pub const DEFAULT_ORDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Whether orders reach the venues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Synthesize order ids, no network calls.
    #[default]
    #[serde(alias = "simulation")]
    Sim,
    /// Place real orders.
    Live,
}

impl ExecutionMode {
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Live)
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sim => f.write_str("sim"),
            Self::Live => f.write_str("live"),
        }
    }
}

impl std::str::FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sim" | "simulation" => Ok(Self::Sim),
            "live" => Ok(Self::Live),
            other => Err(format!("unknown mode '{other}', expected 'sim' or 'live'")),
        }
    }
}

/// Outcome of one execution attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    pub success: bool,
    pub size_usd: Usd,
    pub message: String,
    /// Acknowledged order ids, in leg order.
    pub order_ids: Vec<OrderId>,
    pub failure: Option<ExecutionFailure>,
}

impl ExecutionResult {
    fn filled(size_usd: Usd, order_ids: Vec<OrderId>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            size_usd,
            message: message.into(),
            order_ids,
            failure: None,
        }
    }

    fn failed(size_usd: Usd, failure: ExecutionFailure, order_ids: Vec<OrderId>) -> Self {
        Self {
            success: false,
            size_usd,
            message: failure.to_string(),
            order_ids,
            failure: Some(failure),
        }
    }

    #[must_use]
    pub fn is_partial_fill(&self) -> bool {
        matches!(self.failure, Some(ExecutionFailure::PartialFill { .. }))
    }
}

/// Places both legs of an opportunity and commits capital on success.
pub struct Executor {
    guard: Arc<CapitalGuard>,
    mode: ExecutionMode,
    placers: HashMap<Venue, Arc<dyn OrderPlacer>>,
    order_timeout: Duration,
    settlement: Mutex<()>,
}

impl Executor {
    #[must_use]
    pub fn new(guard: Arc<CapitalGuard>, mode: ExecutionMode) -> Self {
        Self {
            guard,
            mode,
            placers: HashMap::new(),
            order_timeout: DEFAULT_ORDER_TIMEOUT,
            settlement: Mutex::new(()),
        }
    }

    /// Register the order placer for its venue, replacing any previous one.
    #[must_use]
    pub fn with_placer(mut self, placer: Arc<dyn OrderPlacer>) -> Self {
        self.placers.insert(placer.venue(), placer);
        self
    }

    #[must_use]
    pub fn with_order_timeout(mut self, timeout: Duration) -> Self {
        self.order_timeout = timeout;
        self
    }

    #[must_use]
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Whether an order placer is registered for `venue`.
    #[must_use]
    pub fn has_placer(&self, venue: Venue) -> bool {
        self.placers.contains_key(&venue)
    }

    /// Execute an opportunity at its current `size_usd`.
    ///
    /// Never returns an error: every outcome is an [`ExecutionResult`].
    /// Capital is allocated only when the result is successful.
    pub async fn execute(&self, opportunity: &Opportunity) -> ExecutionResult {
        let size = opportunity.size_usd();

        if !self.mode.is_live() {
            if !self.guard.can_allocate(size).await {
                return self.refuse(opportunity, size);
            }
            return self.simulate(opportunity, size);
        }

        let _settlement = self.settlement.lock().await;
        if !self.guard.can_allocate(size).await {
            return self.refuse(opportunity, size);
        }
        self.execute_live(opportunity, size).await
    }

    fn refuse(&self, opportunity: &Opportunity, size: Usd) -> ExecutionResult {
        let failure = ExecutionFailure::InsufficientCapital {
            requested: size,
            free: self.guard.free_capital(),
        };
        warn!(title = %opportunity.title(), error = %failure, "Execution refused");
        ExecutionResult::failed(size, failure, Vec::new())
    }

    async fn execute_live(&self, opportunity: &Opportunity, size: Usd) -> ExecutionResult {
        let OpportunityDetails::CrossVenue(pair) = opportunity.details();
        if let Err(failure) = self.check_pair(pair) {
            warn!(title = %opportunity.title(), error = %failure, "Execution refused");
            return ExecutionResult::failed(size, failure, Vec::new());
        }

        let quantity = size.floor();
        if quantity < Decimal::ONE {
            let failure = ExecutionFailure::BelowMinimumSize { size };
            warn!(title = %opportunity.title(), error = %failure, "Execution refused");
            return ExecutionResult::failed(size, failure, Vec::new());
        }

        let [yes, no] = opportunity.legs();

        info!(
            title = %opportunity.title(),
            yes_venue = %yes.venue,
            no_venue = %no.venue,
            quantity = %quantity,
            "Placing legs"
        );

        let first = match self
            .place_leg(&pair.yes_leg, Side::Yes, yes.price, quantity)
            .await
        {
            Ok(order_id) => order_id,
            Err(reason) => {
                let failure = ExecutionFailure::LegFailed {
                    venue: pair.yes_leg.venue,
                    reason,
                };
                warn!(title = %opportunity.title(), error = %failure, "First leg failed");
                return ExecutionResult::failed(size, failure, Vec::new());
            }
        };

        let second = match self
            .place_leg(&pair.no_leg, Side::No, no.price, quantity)
            .await
        {
            Ok(order_id) => order_id,
            Err(reason) => {
                let failure = ExecutionFailure::PartialFill {
                    filled: pair.yes_leg.venue,
                    failed: pair.no_leg.venue,
                    reason,
                };
                error!(
                    title = %opportunity.title(),
                    filled_order = %first,
                    error = %failure,
                    "Partial fill: first leg is open without its hedge"
                );
                return ExecutionResult::failed(size, failure, vec![first]);
            }
        };

        let order_ids = vec![first, second];
        if !self.guard.allocate(size) {
            let failure = ExecutionFailure::CapitalNotRecorded {
                size,
                free: self.guard.free_capital(),
            };
            error!(
                title = %opportunity.title(),
                orders = ?order_ids,
                error = %failure,
                "Both legs filled but capital could not be recorded"
            );
            return ExecutionResult::failed(size, failure, order_ids);
        }

        info!(
            title = %opportunity.title(),
            yes_order = %order_ids[0],
            no_order = %order_ids[1],
            size = %size,
            "Both legs confirmed"
        );
        ExecutionResult::filled(size, order_ids, "both legs confirmed")
    }

    fn simulate(&self, opportunity: &Opportunity, size: Usd) -> ExecutionResult {
        if !self.guard.allocate(size) {
            let failure = ExecutionFailure::InsufficientCapital {
                requested: size,
                free: self.guard.free_capital(),
            };
            return ExecutionResult::failed(size, failure, Vec::new());
        }

        let order_ids = opportunity
            .legs()
            .iter()
            .map(|leg| OrderId::new(format!("sim-{}-{}", leg.venue, Uuid::new_v4())))
            .collect();

        info!(
            title = %opportunity.title(),
            size = %size,
            net_profit_pct = %opportunity.net_profit_pct().round_dp(2),
            "Simulated execution"
        );
        ExecutionResult::filled(size, order_ids, "simulated")
    }

    fn check_pair(&self, pair: &CrossVenuePair) -> Result<(), ExecutionFailure> {
        let fields = [
            ("yes_leg.market_ref", pair.yes_leg.market_ref.is_empty()),
            ("yes_leg.order_ref", pair.yes_leg.order_ref.trim().is_empty()),
            ("no_leg.market_ref", pair.no_leg.market_ref.is_empty()),
            ("no_leg.order_ref", pair.no_leg.order_ref.trim().is_empty()),
        ];
        if let Some((field, _)) = fields.into_iter().find(|(_, missing)| *missing) {
            return Err(ExecutionFailure::MissingVenueIdentifier { field });
        }

        for venue in [pair.yes_leg.venue, pair.no_leg.venue] {
            if !self.has_placer(venue) {
                return Err(ExecutionFailure::CredentialsMissing { venue });
            }
        }
        Ok(())
    }

    /// Place one leg under the order timeout. Errors are flattened to a reason.
    async fn place_leg(
        &self,
        target: &LegTarget,
        side: Side,
        price: Decimal,
        quantity: Decimal,
    ) -> Result<OrderId, String> {
        let placer = self
            .placers
            .get(&target.venue)
            .ok_or_else(|| format!("no order placer for {}", target.venue))?;

        let request = OrderRequest {
            market_ref: target.market_ref.clone(),
            order_ref: target.order_ref.clone(),
            side,
            price,
            quantity,
        };

        match tokio::time::timeout(self.order_timeout, placer.place_order(&request)).await {
            Ok(Ok(order_id)) => Ok(order_id),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!("order timed out after {:?}", self.order_timeout)),
        }
    }

}
