//! Technical indicators.
//!
//! This crate provides the indicators the signal classifier consumes:
//! - Exponential moving averages (adjusted form, span or Wilder smoothing)
//! - Momentum indicators (RSI, MACD)

pub mod momentum;
pub mod moving_average;

pub use momentum::{Macd, MacdOutput, Rsi};
pub use moving_average::{Ema, StreamingEma};
