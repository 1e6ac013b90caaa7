//! Core types and traits for the trading bot.
//!
//! This crate provides the foundational building blocks including:
//! - Price history types (PricePoint, PriceSeries)
//! - Account, position and order types
//! - Trading signals and the traded symbol universe
//! - Gateway traits for brokers and market data, and the indicator trait

pub mod error;
pub mod traits;
pub mod types;

pub use error::TradingError;
pub use traits::*;
pub use types::*;
