//! Trading strategy implementations.
//!
//! This crate turns indicator readings into trading decisions:
//! - the RSI/MACD signal classifier
//! - the strategy that runs the indicators over a price series

mod classifier;
mod rsi_macd;

pub use classifier::{classify, SignalClassifier};
pub use rsi_macd::{Analysis, RsiMacdConfig, RsiMacdStrategy};
