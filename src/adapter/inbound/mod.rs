//! Inbound adapters: surfaces that read application state.

#[cfg(feature = "dashboard")]
pub mod dashboard;
