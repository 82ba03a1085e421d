//! Capital allocation accounting.
//!
//! The [`CapitalGuard`] is the single owner of the capital ledger. Every
//! mutation is serialized through one lock, and `0 <= used <= max_capital`
//! holds after each of them.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::domain::{Usd, Venue};

/// Venue balances reported by a reconciliation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceSnapshot {
    pub total_usd: Usd,
    pub by_venue: HashMap<Venue, Usd>,
    pub taken_at: DateTime<Utc>,
}

impl BalanceSnapshot {
    /// Build a snapshot from per-venue balances, summing the total.
    #[must_use]
    pub fn from_venues(by_venue: HashMap<Venue, Usd>, taken_at: DateTime<Utc>) -> Self {
        let total_usd = by_venue.values().copied().sum();
        Self {
            total_usd,
            by_venue,
            taken_at,
        }
    }
}

#[derive(Debug)]
struct Ledger {
    used: Usd,
    balance: Option<BalanceSnapshot>,
}

/// Tracks committed capital against a fixed ceiling.
#[derive(Debug)]
pub struct CapitalGuard {
    max_capital: Usd,
    ledger: Mutex<Ledger>,
}

impl CapitalGuard {
    /// Create a guard with nothing allocated.
    #[must_use]
    pub fn new(max_capital: Usd) -> Self {
        Self {
            max_capital,
            ledger: Mutex::new(Ledger {
                used: Decimal::ZERO,
                balance: None,
            }),
        }
    }

    #[must_use]
    pub fn max_capital(&self) -> Usd {
        self.max_capital
    }

    /// Capital currently committed to open positions.
    #[must_use]
    pub fn used(&self) -> Usd {
        self.ledger.lock().used
    }

    /// `max(0, max_capital - used)`.
    #[must_use]
    pub fn free_capital(&self) -> Usd {
        (self.max_capital - self.ledger.lock().used).max(Decimal::ZERO)
    }

    /// Whether a positive `amount` fits under the ceiling and, when a balance
    /// snapshot is present, whether `used + amount` fits within the reported
    /// venue balances. Snapshots are taken before anything is committed.
    pub async fn can_allocate(&self, amount: Usd) -> bool {
        if amount <= Decimal::ZERO {
            return false;
        }
        let ledger = self.ledger.lock();
        if ledger.used + amount > self.max_capital {
            return false;
        }
        match &ledger.balance {
            Some(snapshot) => ledger.used + amount <= snapshot.total_usd,
            None => true,
        }
    }

    /// Commit `amount`. Returns `false` and leaves the ledger unchanged if the
    /// amount is not positive or would exceed the ceiling.
    pub fn allocate(&self, amount: Usd) -> bool {
        if amount <= Decimal::ZERO {
            return false;
        }
        let mut ledger = self.ledger.lock();
        if ledger.used + amount > self.max_capital {
            warn!(
                requested = %amount,
                used = %ledger.used,
                max = %self.max_capital,
                "Allocation would exceed capital ceiling"
            );
            return false;
        }
        ledger.used += amount;
        debug!(amount = %amount, used = %ledger.used, "Capital allocated");
        self.check_invariant(&ledger);
        true
    }

    /// Return `amount` to the free pool. `used` is floored at zero.
    pub fn release(&self, amount: Usd) {
        let mut ledger = self.ledger.lock();
        ledger.used = (ledger.used - amount.max(Decimal::ZERO)).max(Decimal::ZERO);
        debug!(amount = %amount, used = %ledger.used, "Capital released");
        self.check_invariant(&ledger);
    }

    /// Clamp a suggested size to the per-position cap and to free capital.
    ///
    /// Returns `max(0, min(suggested, max_capital * max_position_pct, free))`.
    #[must_use]
    pub fn safe_position_size(&self, suggested: Usd, max_position_pct: Decimal) -> Usd {
        let per_position_cap = self.max_capital * max_position_pct;
        suggested
            .min(per_position_cap)
            .min(self.free_capital())
            .max(Decimal::ZERO)
    }

    /// Record the latest venue balances.
    pub fn set_balance_snapshot(&self, snapshot: BalanceSnapshot) {
        debug!(total = %snapshot.total_usd, "Balance snapshot updated");
        self.ledger.lock().balance = Some(snapshot);
    }

    #[must_use]
    pub fn balance_snapshot(&self) -> Option<BalanceSnapshot> {
        self.ledger.lock().balance.clone()
    }

    fn check_invariant(&self, ledger: &Ledger) {
        debug_assert!(
            ledger.used >= Decimal::ZERO && ledger.used <= self.max_capital,
            "capital ledger out of bounds: used {} of {}",
            ledger.used,
            self.max_capital
        );
    }
}
