//! Position lifecycle and PnL aggregation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::id::PositionId;
use super::money::{Usd, HUNDRED};
use super::opportunity::OpportunityKind;

/// Lifecycle state of a position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PositionStatus {
    /// Both legs filled and capital is committed.
    Open,
    /// Settled or exited; capital has been released.
    Closed {
        realized_pnl: Usd,
        fees: Usd,
        closed_at: DateTime<Utc>,
    },
}

impl PositionStatus {
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed { .. })
    }
}

/// A confirmed two-leg execution holding capital.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    id: PositionId,
    kind: OpportunityKind,
    size_usd: Usd,
    entry_time: DateTime<Utc>,
    expected_profit_pct: Decimal,
    status: PositionStatus,
}

impl Position {
    /// Create an open position.
    #[must_use]
    pub fn open(
        id: PositionId,
        kind: OpportunityKind,
        size_usd: Usd,
        expected_profit_pct: Decimal,
        entry_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind,
            size_usd,
            entry_time,
            expected_profit_pct,
            status: PositionStatus::Open,
        }
    }

    #[must_use]
    pub fn id(&self) -> &PositionId {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> OpportunityKind {
        self.kind
    }

    #[must_use]
    pub fn size_usd(&self) -> Usd {
        self.size_usd
    }

    #[must_use]
    pub fn entry_time(&self) -> DateTime<Utc> {
        self.entry_time
    }

    #[must_use]
    pub fn expected_profit_pct(&self) -> Decimal {
        self.expected_profit_pct
    }

    #[must_use]
    pub fn status(&self) -> &PositionStatus {
        &self.status
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    /// Expected dollar profit while the position is open.
    #[must_use]
    pub fn unrealized_pnl(&self) -> Usd {
        if self.is_open() {
            self.size_usd * self.expected_profit_pct / HUNDRED
        } else {
            Decimal::ZERO
        }
    }

    /// Transition to closed. Returns `false` if already closed.
    pub fn close(&mut self, realized_pnl: Usd, fees: Usd, closed_at: DateTime<Utc>) -> bool {
        if !self.is_open() {
            return false;
        }
        self.status = PositionStatus::Closed {
            realized_pnl,
            fees,
            closed_at,
        };
        true
    }
}

/// Point-in-time profit and loss across all positions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PnlSnapshot {
    pub realized_pnl: Usd,
    pub unrealized_pnl: Usd,
    pub fees_paid: Usd,
    pub total_pnl: Usd,
    pub open_positions: usize,
    pub taken_at: DateTime<Utc>,
}

impl PnlSnapshot {
    /// Aggregate a snapshot over a set of positions.
    pub fn from_positions<'a>(
        positions: impl IntoIterator<Item = &'a Position>,
        taken_at: DateTime<Utc>,
    ) -> Self {
        let mut realized_pnl = Decimal::ZERO;
        let mut unrealized_pnl = Decimal::ZERO;
        let mut fees_paid = Decimal::ZERO;
        let mut open_positions = 0;

        for position in positions {
            match position.status() {
                PositionStatus::Open => {
                    unrealized_pnl += position.unrealized_pnl();
                    open_positions += 1;
                }
                PositionStatus::Closed {
                    realized_pnl: pnl,
                    fees,
                    ..
                } => {
                    realized_pnl += *pnl;
                    fees_paid += *fees;
                }
            }
        }

        Self {
            realized_pnl,
            unrealized_pnl,
            fees_paid,
            total_pnl: realized_pnl + unrealized_pnl - fees_paid,
            open_positions,
            taken_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn open(id: &str, size: Decimal, pct: Decimal) -> Position {
        Position::open(
            PositionId::from(id),
            OpportunityKind::CrossVenueYesNo,
            size,
            pct,
            Utc::now(),
        )
    }

    #[test]
    fn open_position_has_unrealized_pnl() {
        let position = open("p1", dec!(1000), dec!(2.5));
        assert!(position.is_open());
        assert_eq!(position.unrealized_pnl(), dec!(25));
    }

    #[test]
    fn close_is_one_way() {
        let mut position = open("p1", dec!(1000), dec!(2.5));
        let now = Utc::now();

        assert!(position.close(dec!(30), dec!(4), now));
        assert!(position.status().is_closed());
        assert_eq!(position.unrealized_pnl(), dec!(0));

        assert!(!position.close(dec!(99), dec!(1), now));
        assert_eq!(
            position.status(),
            &PositionStatus::Closed {
                realized_pnl: dec!(30),
                fees: dec!(4),
                closed_at: now,
            }
        );
    }

    #[test]
    fn snapshot_totals() {
        let mut closed = open("p1", dec!(500), dec!(3));
        closed.close(dec!(20), dec!(2), Utc::now());
        let positions = vec![closed, open("p2", dec!(1000), dec!(2)), open("p3", dec!(200), dec!(5))];

        let snapshot = PnlSnapshot::from_positions(&positions, Utc::now());

        assert_eq!(snapshot.realized_pnl, dec!(20));
        assert_eq!(snapshot.unrealized_pnl, dec!(30));
        assert_eq!(snapshot.fees_paid, dec!(2));
        assert_eq!(snapshot.total_pnl, dec!(48));
        assert_eq!(snapshot.open_positions, 2);
    }

    #[test]
    fn empty_snapshot_is_zero() {
        let snapshot = PnlSnapshot::from_positions(std::iter::empty(), Utc::now());
        assert_eq!(snapshot.total_pnl, dec!(0));
        assert_eq!(snapshot.open_positions, 0);
    }
}
