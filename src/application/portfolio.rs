//! Position bookkeeping coupled to the capital ledger.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::application::capital::CapitalGuard;
use crate::application::executor::ExecutionResult;
use crate::domain::{Opportunity, PnlSnapshot, Position, PositionId, Usd};

/// Records positions opened by successful executions and releases their
/// capital when they close.
///
/// Opening a position does not touch the guard: the executor has already
/// allocated its size. Closing releases exactly `size_usd`, once.
pub struct PortfolioTracker {
    guard: Arc<CapitalGuard>,
    positions: RwLock<Vec<Position>>,
}

impl PortfolioTracker {
    #[must_use]
    pub fn new(guard: Arc<CapitalGuard>) -> Self {
        Self {
            guard,
            positions: RwLock::new(Vec::new()),
        }
    }

    /// Record a new open position for a successful execution.
    pub fn add_position(&self, opportunity: &Opportunity, result: &ExecutionResult) -> Position {
        let position = Position::open(
            PositionId::from_orders(&result.order_ids),
            opportunity.kind(),
            result.size_usd,
            opportunity.net_profit_pct(),
            Utc::now(),
        );

        info!(
            position = %position.id(),
            size = %position.size_usd(),
            expected_profit_pct = %position.expected_profit_pct().round_dp(2),
            "Position opened"
        );
        self.positions.write().push(position.clone());
        position
    }

    /// Close an open position and release its capital.
    ///
    /// Returns `None` for unknown or already closed ids; nothing changes in
    /// that case.
    pub fn close_position(&self, id: &PositionId, realized_pnl: Usd, fees: Usd) -> Option<Position> {
        let closed = {
            let mut positions = self.positions.write();
            let position = positions.iter_mut().find(|p| p.id() == id)?;
            if !position.close(realized_pnl, fees, Utc::now()) {
                debug!(position = %id, "Position already closed");
                return None;
            }
            position.clone()
        };

        self.guard.release(closed.size_usd());
        info!(
            position = %id,
            realized_pnl = %realized_pnl,
            fees = %fees,
            "Position closed"
        );
        Some(closed)
    }

    /// PnL aggregated over every position ever recorded.
    #[must_use]
    pub fn snapshot(&self) -> PnlSnapshot {
        PnlSnapshot::from_positions(self.positions.read().iter(), Utc::now())
    }

    #[must_use]
    pub fn get(&self, id: &PositionId) -> Option<Position> {
        self.positions.read().iter().find(|p| p.id() == id).cloned()
    }

    #[must_use]
    pub fn open_positions(&self) -> Vec<Position> {
        self.positions
            .read()
            .iter()
            .filter(|p| p.is_open())
            .cloned()
            .collect()
    }

    /// All positions, open and closed, in insertion order.
    #[must_use]
    pub fn positions(&self) -> Vec<Position> {
        self.positions.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CrossVenuePair, LegTarget, MarketRef, OrderId, Venue};
    use rust_decimal_macros::dec;

    fn opportunity() -> Opportunity {
        let pair = CrossVenuePair {
            yes_leg: LegTarget {
                venue: Venue::Polymarket,
                market_ref: MarketRef::from("0xabc"),
                order_ref: "1".into(),
                title: "Fed cuts rates".into(),
            },
            no_leg: LegTarget {
                venue: Venue::Kalshi,
                market_ref: MarketRef::from("FED"),
                order_ref: "FED".into(),
                title: "Fed cuts rates".into(),
            },
            total_cost: dec!(0.97),
            similarity: 1.0,
        };
        Opportunity::cross_venue(pair, dec!(0.45), dec!(0.52), dec!(3), dec!(2.5), dec!(1000))
    }

    fn result(size: Usd) -> ExecutionResult {
        ExecutionResult {
            success: true,
            size_usd: size,
            message: "ok".into(),
            order_ids: vec![OrderId::from("a"), OrderId::from("b")],
            failure: None,
        }
    }

    #[test]
    fn add_position_does_not_touch_capital() {
        let guard = Arc::new(CapitalGuard::new(dec!(5000)));
        guard.allocate(dec!(1000));
        let tracker = PortfolioTracker::new(Arc::clone(&guard));

        let position = tracker.add_position(&opportunity(), &result(dec!(1000)));

        assert_eq!(position.id().as_str(), "a+b");
        assert_eq!(guard.used(), dec!(1000));
        assert_eq!(tracker.open_positions().len(), 1);
    }

    #[test]
    fn close_releases_capital_once() {
        let guard = Arc::new(CapitalGuard::new(dec!(5000)));
        guard.allocate(dec!(1000));
        let tracker = PortfolioTracker::new(Arc::clone(&guard));
        let position = tracker.add_position(&opportunity(), &result(dec!(1000)));

        let closed = tracker.close_position(position.id(), dec!(25), dec!(3));
        assert!(closed.is_some());
        assert_eq!(guard.used(), dec!(0));

        assert!(tracker.close_position(position.id(), dec!(25), dec!(3)).is_none());
        assert_eq!(guard.used(), dec!(0));
        assert_eq!(tracker.positions().len(), 1);
    }

    #[test]
    fn close_unknown_id_is_noop() {
        let guard = Arc::new(CapitalGuard::new(dec!(5000)));
        guard.allocate(dec!(500));
        let tracker = PortfolioTracker::new(Arc::clone(&guard));

        assert!(tracker
            .close_position(&PositionId::from("missing"), dec!(0), dec!(0))
            .is_none());
        assert_eq!(guard.used(), dec!(500));
    }

    #[test]
    fn snapshot_reflects_open_and_closed() {
        let guard = Arc::new(CapitalGuard::new(dec!(5000)));
        let tracker = PortfolioTracker::new(Arc::clone(&guard));
        guard.allocate(dec!(1000));
        let first = tracker.add_position(&opportunity(), &result(dec!(1000)));
        guard.allocate(dec!(400));
        let mut second = result(dec!(400));
        second.order_ids = vec![OrderId::from("c"), OrderId::from("d")];
        tracker.add_position(&opportunity(), &second);

        tracker.close_position(first.id(), dec!(30), dec!(5));
        let snapshot = tracker.snapshot();

        assert_eq!(snapshot.realized_pnl, dec!(30));
        assert_eq!(snapshot.unrealized_pnl, dec!(10));
        assert_eq!(snapshot.fees_paid, dec!(5));
        assert_eq!(snapshot.total_pnl, dec!(35));
        assert_eq!(snapshot.open_positions, 1);
        assert_eq!(guard.used(), dec!(400));
    }
}
