//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe infrastructure dependencies such as venue
//! listings, order placement, LLM completion, and notifications.

pub mod llm;
pub mod market;
pub mod notifier;
pub mod order;
