//! Core data types for the trading bot.

mod order;
mod period;
mod position;
mod price;
mod signal;
mod symbol;

pub use order::{OrderConfirmation, OrderRequest, OrderStatus, Side, TimeInForce};
pub use period::HistoryPeriod;
pub use position::{AccountSnapshot, Position};
pub use price::{PricePoint, PriceSeries};
pub use signal::{Signal, Trend};
pub use symbol::{default_symbols, SymbolConfig};
