//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters through
//! ports to implement the arbitrage cycle.

pub mod capital;
pub mod context;
pub mod executor;
pub mod portfolio;
pub mod scanner;
pub mod validator;

pub use capital::{BalanceSnapshot, CapitalGuard};
pub use context::{AppContext, CycleReport, CycleSettings};
pub use executor::{ExecutionMode, ExecutionResult, Executor};
pub use portfolio::PortfolioTracker;
pub use scanner::{Scanner, ScannerConfig};
pub use validator::{LlmValidator, RuleBasedValidator};
