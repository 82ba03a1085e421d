//! Capital ledger behavior across executions and position closes.

mod support;

use std::sync::Arc;

use crossarb::application::{CapitalGuard, ExecutionMode, Executor, PortfolioTracker};
use crossarb::testkit::domain::{kalshi_market, opportunity, poly_market};
use rust_decimal_macros::dec;

use support::HarnessBuilder;

#[tokio::test]
async fn closing_a_position_frees_capital_for_the_next_cycle() {
    let harness = HarnessBuilder::new()
        .polymarket(vec![poly_market("0xfed", "Fed cuts rates in June", dec!(0.45))])
        .kalshi(vec![kalshi_market(
            "FED-25JUN",
            "Will the Fed cut rates in June?",
            dec!(0.52),
        )])
        .capital(dec!(1000), dec!(1))
        .build();

    let first = harness.context.run_cycle().await;
    assert_eq!(first.executed, 1);
    assert_eq!(harness.guard.free_capital(), dec!(0));

    let blocked = harness.context.run_cycle().await;
    assert_eq!(blocked.executed, 0);
    assert_eq!(blocked.skipped_unsized, 1);

    let portfolio = harness.context.portfolio();
    let id = portfolio.open_positions()[0].id().clone();
    let closed = portfolio.close_position(&id, dec!(20), dec!(1)).unwrap();
    assert_eq!(closed.size_usd(), dec!(1000));
    assert_eq!(harness.guard.used(), dec!(0));

    // A second close is a no-op and releases nothing.
    assert!(portfolio.close_position(&id, dec!(20), dec!(1)).is_none());
    assert_eq!(harness.guard.used(), dec!(0));

    let again = harness.context.run_cycle().await;
    assert_eq!(again.executed, 1);
    assert_eq!(harness.guard.used(), dec!(1000));

    let pnl = portfolio.snapshot();
    assert_eq!(pnl.open_positions, 1);
    assert_eq!(pnl.realized_pnl, dec!(20));
    assert_eq!(pnl.fees_paid, dec!(1));
    assert_eq!(portfolio.positions().len(), 2);
}

#[tokio::test]
async fn concurrent_executions_never_overcommit() {
    let guard = Arc::new(CapitalGuard::new(dec!(1000)));
    let executor = Arc::new(Executor::new(Arc::clone(&guard), ExecutionMode::Sim));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let executor = Arc::clone(&executor);
        handles.push(tokio::spawn(async move {
            let mut opp = opportunity(dec!(2.5), dec!(300));
            opp.apply_safe_size(dec!(300)).unwrap();
            let result = executor.execute(&opp).await;
            result.success
        }));
    }

    let mut filled = 0;
    for handle in handles {
        if handle.await.unwrap() {
            filled += 1;
        }
    }

    assert_eq!(filled, 3);
    assert_eq!(guard.used(), dec!(900));
    assert!(guard.used() <= guard.max_capital());
}

#[test]
fn sizing_respects_cap_and_free_capital() {
    let guard = CapitalGuard::new(dec!(5000));
    assert_eq!(guard.safe_position_size(dec!(1500), dec!(0.2)), dec!(1000));
    assert_eq!(guard.safe_position_size(dec!(400), dec!(0.2)), dec!(400));

    assert!(guard.allocate(dec!(4800)));
    assert_eq!(guard.safe_position_size(dec!(1500), dec!(0.2)), dec!(200));

    assert!(!guard.allocate(dec!(201)));
    assert!(!guard.allocate(dec!(0)));
    assert_eq!(guard.used(), dec!(4800));

    guard.release(dec!(10_000));
    assert_eq!(guard.used(), dec!(0));
}

#[test]
fn portfolio_shares_the_guard_it_was_given() {
    let guard = Arc::new(CapitalGuard::new(dec!(100)));
    let portfolio = PortfolioTracker::new(Arc::clone(&guard));

    assert!(portfolio.open_positions().is_empty());
    assert_eq!(portfolio.snapshot().total_pnl, dec!(0));
    assert_eq!(guard.free_capital(), dec!(100));
}
