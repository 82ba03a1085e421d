//! Polymarket exchange integration.
//!
//! Two API surfaces:
//! - **Gamma API** (`gamma-api.polymarket.com`): market discovery, quotes
//!   and volume. See [`market::GammaClient`].
//! - **CLOB API** (`clob.polymarket.com`): authenticated order submission,
//!   behind the `polymarket` feature. See [`order::PolymarketOrderPlacer`].

pub mod dto;
pub mod market;
#[cfg(feature = "polymarket")]
pub mod order;

pub use market::GammaClient;
#[cfg(feature = "polymarket")]
pub use order::PolymarketOrderPlacer;
