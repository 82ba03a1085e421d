//! Kalshi exchange integration.
//!
//! A single [`KalshiClient`] serves both as the market source (listing plus
//! per-market orderbooks) and, when credentials are present, as the order
//! placer. Authenticated requests are signed with RSA-PSS, see [`auth`].

pub mod auth;
pub mod client;
pub mod dto;

pub use auth::KalshiAuth;
pub use client::KalshiClient;
