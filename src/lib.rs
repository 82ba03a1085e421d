//! Crossarb - cross-venue prediction market arbitrage.
//!
//! Buys YES on one venue and NO on another for the same real-world event
//! whenever the fee-adjusted pair costs strictly less than the $1 payout.
//!
//! # Architecture
//!
//! - [`domain`] - Venue-agnostic types: markets, opportunities, positions,
//!   the title similarity matcher and fee schedule.
//! - [`port`] - Traits at the system boundary: market sources, order
//!   placement, validators, notifiers, LLM completion.
//! - [`application`] - The scanner, capital guard, executor, portfolio
//!   tracker, validators and the per-cycle [`application::AppContext`].
//! - [`adapter`] - Polymarket and Kalshi clients, OpenAI validator backend,
//!   log/Telegram/Discord notifiers.
//! - [`infrastructure`] - Configuration, logging, wiring and the periodic
//!   scan driver.
//!
//! # Features
//!
//! - `polymarket` - Live Polymarket CLOB order placement.
//! - `telegram` - Telegram alert channel.
//! - `testkit` - Test doubles for integration tests.

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
