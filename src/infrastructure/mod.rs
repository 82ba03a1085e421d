//! Infrastructure layer.
//!
//! Technical concerns that support the application without containing
//! business logic.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root: builds an `AppContext` from `Config`
//! - [`config`] - Configuration loading and validation
//! - [`orchestrator`] - Periodic scan loop and shutdown handling

pub mod bootstrap;
pub mod config;
pub mod orchestrator;
