//! Outbound adapters (driven side).

pub mod kalshi;
pub mod llm;
pub mod notifier;
pub mod polymarket;
