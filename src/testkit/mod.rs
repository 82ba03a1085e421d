//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`source`]: `StaticMarketSource`, a [`MarketSource`](crate::port::MarketSource)
//!   with scripted listings and failures.
//! - [`order`]: `ScriptedOrderPlacer`, an [`OrderPlacer`](crate::port::OrderPlacer)
//!   that records requests and pops scripted outcomes.
//! - [`notifier`]: `RecordingNotifier`, which keeps every event it receives.
//! - [`llm`]: `ScriptedLlm`, a canned [`Llm`](crate::port::Llm).
//! - [`domain`]: builders for markets and opportunities.
//! - [`config`]: canonical test configurations.

pub mod config;
pub mod domain;
pub mod llm;
pub mod notifier;
pub mod order;
pub mod source;
