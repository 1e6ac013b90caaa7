//! Momentum indicators.

use serde::{Deserialize, Serialize};
use trading_core::traits::Indicator;

use crate::moving_average::{Ema, StreamingEma};

/// Relative Strength Index (RSI).
///
/// Measures the speed and magnitude of recent price changes
/// to evaluate overbought or oversold conditions.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// Common periods are 14 (default) or 9.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// RSI from smoothed average gain and loss.
    ///
    /// A window without any movement has no defined strength; it reads as
    /// the neutral midpoint.
    fn from_averages(gain: f64, loss: f64) -> f64 {
        let total = gain + loss;
        if total == 0.0 {
            50.0
        } else {
            100.0 * gain / total
        }
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() <= self.period {
            return vec![];
        }

        // Wilder's smoothing of gains and losses
        let mut gains = StreamingEma::with_alpha(1.0 / self.period as f64);
        let mut losses = StreamingEma::with_alpha(1.0 / self.period as f64);
        let mut result = Vec::with_capacity(data.len() - self.period);

        for (i, pair) in data.windows(2).enumerate() {
            let change = pair[1] - pair[0];
            let (gain, loss) = if change > 0.0 {
                (change, 0.0)
            } else {
                (0.0, -change)
            };

            let avg_gain = gains.update(gain);
            let avg_loss = losses.update(loss);

            if i + 1 >= self.period {
                result.push(Self::from_averages(avg_gain, avg_loss));
            }
        }

        result
    }

    fn period(&self) -> usize {
        self.period + 1 // Need period+1 data points
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// MACD (Moving Average Convergence Divergence) output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd: f64,
    /// Signal line (EMA of MACD)
    pub signal: f64,
    /// Histogram (MACD - Signal)
    pub histogram: f64,
}

/// MACD indicator.
///
/// Uses two EMAs to identify trend direction and momentum.
#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast > 0 && slow > 0 && signal > 0);
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast_period: fast,
            slow_period: slow,
            signal_period: signal,
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for Macd {
    type Output = MacdOutput;

    fn calculate(&self, data: &[f64]) -> Vec<MacdOutput> {
        if data.len() < self.period() {
            return vec![];
        }

        let fast_ema = Ema::new(self.fast_period).calculate(data);
        let slow_ema = Ema::new(self.slow_period).calculate(data);

        let macd_line: Vec<f64> = fast_ema
            .iter()
            .zip(slow_ema.iter())
            .map(|(f, s)| f - s)
            .collect();

        let signal_line = Ema::new(self.signal_period).calculate(&macd_line);

        // Every point is defined, but only those past the warm-up are reported
        macd_line
            .iter()
            .zip(signal_line.iter())
            .skip(self.period() - 1)
            .map(|(&macd, &signal)| MacdOutput {
                macd,
                signal,
                histogram: macd - signal,
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.slow_period + self.signal_period
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trading_core::error::IndicatorError;

    #[test]
    fn test_rsi_bounds() {
        let rsi = Rsi::new(14);
        let data: Vec<f64> = (0..60)
            .map(|i| 100.0 + (i as f64 * 0.5).sin() * 5.0)
            .collect();

        let result = rsi.calculate(&data);
        assert_eq!(result.len(), data.len() - 14);

        // All RSI values should be between 0 and 100
        for value in &result {
            assert!(*value >= 0.0 && *value <= 100.0);
        }
    }

    #[test]
    fn test_rsi_wilder_smoothing() {
        let rsi = Rsi::new(2);
        // changes +1, -1; alpha = 0.5
        // gain: 1 -> 1 + (0 - 1) / 1.5 = 1/3
        // loss: 0 -> 0 + (1 - 0) / 1.5 = 2/3
        let result = rsi.calculate(&[1.0, 2.0, 1.0]);
        assert_eq!(result.len(), 1);
        assert!((result[0] - 100.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_all_gains() {
        let rsi = Rsi::new(5);
        let data: Vec<f64> = (1..=40).map(|i| i as f64).collect();
        // All gains = RSI should be 100
        assert!((rsi.latest(&data).unwrap() - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_all_losses() {
        let rsi = Rsi::new(5);
        let data: Vec<f64> = (1..=40).rev().map(|i| i as f64).collect();
        // All losses = RSI should be 0
        assert!(rsi.latest(&data).unwrap().abs() < 1e-10);
    }

    #[test]
    fn test_rsi_flat_is_neutral() {
        let rsi = Rsi::default();
        assert_eq!(rsi.latest(&[10.0; 30]).unwrap(), 50.0);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let rsi = Rsi::new(14);
        let err = rsi.latest(&[1.0; 14]).unwrap_err();
        assert_eq!(
            err,
            IndicatorError::InsufficientData {
                required: 15,
                available: 14
            }
        );
        assert!(rsi.latest(&[1.0; 15]).is_ok());
    }

    #[test]
    fn test_macd_uptrend() {
        let macd = Macd::new();
        let data: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        let result = macd.calculate(&data);

        assert_eq!(result.len(), 50 - 34);
        // In an uptrend, MACD should be positive
        let last = result.last().unwrap();
        assert!(last.macd > 0.0);
        assert!((last.histogram - (last.macd - last.signal)).abs() < 1e-12);
    }

    #[test]
    fn test_macd_flat_series_is_zero() {
        let macd = Macd::new();
        let output = macd.latest(&[250.0; 60]).unwrap();
        assert_eq!(output.macd, 0.0);
        assert_eq!(output.signal, 0.0);
        assert_eq!(output.histogram, 0.0);
    }

    #[test]
    fn test_macd_insufficient_data() {
        let macd = Macd::new();
        let data = vec![100.0; 34];
        assert!(macd.calculate(&data).is_empty());
        assert!(matches!(
            macd.latest(&data),
            Err(IndicatorError::InsufficientData {
                required: 35,
                available: 34
            })
        ));
    }

    #[test]
    fn test_macd_custom_periods() {
        let macd = Macd::with_periods(5, 10, 3);
        let data: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let result = macd.calculate(&data);

        assert_eq!(result.len(), 30 - 12);
    }
}
