//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams between the arbitrage pipeline and the outside world:
//! venue listings, order placement, the LLM, and alert channels on the
//! outbound side; opportunity validation on the inbound side.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │  scan → validate → size │
//!     ┌──────────────┤  → execute → track      ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │ Venue   │            │    LLM      │              │ Notifier  │
//! │ Adapter │            │   Adapter   │              │  Adapter  │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```

pub mod inbound;
pub mod outbound;

pub use inbound::validator::OpportunityValidator;
pub use outbound::llm::Llm;
pub use outbound::market::MarketSource;
pub use outbound::notifier::{Event, ExecutionEvent, Notifier, OpportunityEvent};
pub use outbound::order::{OrderPlacer, OrderRequest};
