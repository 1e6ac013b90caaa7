//! RSI/MACD signal classification.

use trading_core::types::{Signal, Trend};

/// Combines an RSI reading with the MACD trend into a single decision.
///
/// Buys when RSI is oversold while the MACD line is above its signal line,
/// sells when RSI is overbought while the MACD line is below it, and holds
/// in every other case. Both thresholds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalClassifier {
    /// Buy only below this RSI
    pub oversold: f64,
    /// Sell only above this RSI
    pub overbought: f64,
}

impl SignalClassifier {
    /// Create a classifier with custom thresholds.
    pub fn new(oversold: f64, overbought: f64) -> Self {
        assert!(
            oversold < overbought,
            "Oversold threshold must be below overbought threshold"
        );
        Self {
            oversold,
            overbought,
        }
    }

    /// Classify one RSI reading and the latest MACD/signal line values.
    pub fn classify(&self, rsi: f64, macd_line: f64, signal_line: f64) -> Signal {
        match Trend::from_macd(macd_line, signal_line) {
            Trend::Up if rsi < self.oversold => Signal::Buy,
            Trend::Down if rsi > self.overbought => Signal::Sell,
            _ => Signal::Hold,
        }
    }
}

impl Default for SignalClassifier {
    fn default() -> Self {
        Self {
            oversold: 35.0,
            overbought: 65.0,
        }
    }
}

/// Classify with the default 35/65 thresholds.
pub fn classify(rsi: f64, macd_line: f64, signal_line: f64) -> Signal {
    SignalClassifier::default().classify(rsi, macd_line, signal_line)
}
