//! Telegram alert delivery.
//!
//! Requires the `telegram` feature to be enabled.

pub mod notifier;

pub use notifier::{TelegramConfig, TelegramNotifier};
