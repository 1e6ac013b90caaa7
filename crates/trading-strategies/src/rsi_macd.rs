//! RSI + MACD confirmation strategy.
//!
//! Runs RSI and MACD over the closing prices of a series and hands the
//! latest readings to the [`SignalClassifier`]. A series that is too short
//! for either indicator is reported as an error so the caller can decide
//! how to treat it.

use serde::{Deserialize, Serialize};
use trading_core::{
    error::{IndicatorError, StrategyError},
    traits::Indicator,
    types::{PriceSeries, Signal, Trend},
};
use trading_indicators::{Macd, MacdOutput, Rsi};

use crate::classifier::SignalClassifier;

/// Configuration for the RSI/MACD strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiMacdConfig {
    /// RSI calculation period
    pub rsi_period: usize,
    /// Fast MACD EMA span
    pub macd_fast: usize,
    /// Slow MACD EMA span
    pub macd_slow: usize,
    /// Signal line EMA span
    pub macd_signal: usize,
    /// Buy only below this RSI
    pub oversold: f64,
    /// Sell only above this RSI
    pub overbought: f64,
}

impl Default for RsiMacdConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            oversold: 35.0,
            overbought: 65.0,
        }
    }
}

impl RsiMacdConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), StrategyError> {
        if self.rsi_period < 2 {
            return Err(StrategyError::InvalidConfig(
                "RSI period must be at least 2".into(),
            ));
        }
        if self.macd_fast == 0 || self.macd_signal == 0 || self.macd_fast >= self.macd_slow {
            return Err(StrategyError::InvalidConfig(
                "MACD spans must be positive with fast < slow".into(),
            ));
        }
        if self.overbought <= self.oversold {
            return Err(StrategyError::InvalidConfig(
                "Overbought must be greater than oversold".into(),
            ));
        }
        if self.overbought > 100.0 || self.oversold < 0.0 {
            return Err(StrategyError::InvalidConfig(
                "RSI thresholds must be between 0 and 100".into(),
            ));
        }
        Ok(())
    }
}

/// Latest indicator readings and the decision derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Latest RSI value
    pub rsi: f64,
    /// Latest MACD, signal and histogram values
    pub macd: MacdOutput,
    /// MACD line relative to its signal line
    pub trend: Trend,
    /// Resulting decision
    pub signal: Signal,
    /// Close the readings were computed up to
    pub last_close: f64,
}

/// RSI/MACD strategy.
#[derive(Debug, Clone)]
pub struct RsiMacdStrategy {
    rsi: Rsi,
    macd: Macd,
    classifier: SignalClassifier,
}

impl RsiMacdStrategy {
    /// Create a new strategy.
    pub fn new(config: &RsiMacdConfig) -> Self {
        Self {
            rsi: Rsi::new(config.rsi_period),
            macd: Macd::with_periods(config.macd_fast, config.macd_slow, config.macd_signal),
            classifier: SignalClassifier::new(config.oversold, config.overbought),
        }
    }

    /// Strategy name.
    pub fn name(&self) -> &str {
        "RSI/MACD"
    }

    /// Number of closes needed before both indicators are defined.
    pub fn warmup_period(&self) -> usize {
        self.rsi.period().max(self.macd.period())
    }

    /// Analyze a price series.
    pub fn analyze(&self, series: &PriceSeries) -> Result<Analysis, IndicatorError> {
        self.analyze_closes(&series.closes())
    }

    /// Analyze bare closing prices, oldest first.
    pub fn analyze_closes(&self, closes: &[f64]) -> Result<Analysis, IndicatorError> {
        let rsi = self.rsi.latest(closes)?;
        let macd = self.macd.latest(closes)?;
        let last_close = closes.last().copied().unwrap_or_default();

        Ok(Analysis {
            rsi,
            macd,
            trend: Trend::from_macd(macd.macd, macd.signal),
            signal: self.classifier.classify(rsi, macd.macd, macd.signal),
            last_close,
        })
    }
}

impl Default for RsiMacdStrategy {
    fn default() -> Self {
        Self::new(&RsiMacdConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::from_closes("BTC/USD", closes).unwrap()
    }

    #[test]
    fn test_config_validation() {
        let mut config = RsiMacdConfig::default();
        assert!(config.validate().is_ok());

        config.overbought = 30.0;
        config.oversold = 70.0;
        assert!(config.validate().is_err());

        let config = RsiMacdConfig {
            macd_fast: 26,
            macd_slow: 12,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_warmup_period() {
        let strategy = RsiMacdStrategy::default();
        assert_eq!(strategy.warmup_period(), 35);
    }

    #[test]
    fn test_short_series_is_an_error() {
        let strategy = RsiMacdStrategy::default();
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();

        let err = strategy.analyze(&series(&closes)).unwrap_err();
        assert_eq!(
            err,
            IndicatorError::InsufficientData {
                required: 35,
                available: 20
            }
        );
    }

    #[test]
    fn test_flat_series_holds() {
        let strategy = RsiMacdStrategy::default();
        let analysis = strategy.analyze(&series(&[100.0; 60])).unwrap();

        assert_eq!(analysis.trend, Trend::Flat);
        assert_eq!(analysis.signal, Signal::Hold);
        assert_eq!(analysis.last_close, 100.0);
    }

    #[test]
    fn test_flat_then_rally_turns_trend_up() {
        let strategy = RsiMacdStrategy::default();
        let mut closes = vec![100.0; 40];
        closes.extend((1..=10).map(|i| 100.0 + 5.0 * i as f64));

        let analysis = strategy.analyze(&series(&closes)).unwrap();
        assert_eq!(analysis.trend, Trend::Up);
        assert!(analysis.rsi > 65.0);
        // Rally already overbought: no chase
        assert_eq!(analysis.signal, Signal::Hold);
    }

    #[test]
    fn test_bounce_after_decline_buys() {
        let strategy = RsiMacdStrategy::default();
        let mut closes: Vec<f64> = (0..80).map(|i| 200.0 - i as f64).collect();

        let before = strategy.analyze_closes(&closes).unwrap();
        assert_eq!(before.trend, Trend::Down);
        assert!(before.rsi < 35.0);
        assert_eq!(before.signal, Signal::Hold);

        // First up bar: MACD crosses its signal line while RSI is still oversold
        closes.push(124.0);
        let after = strategy.analyze_closes(&closes).unwrap();
        assert_eq!(after.trend, Trend::Up);
        assert!(after.rsi < 35.0);
        assert_eq!(after.signal, Signal::Buy);
    }

    #[test]
    fn test_drop_after_rally_sells() {
        let strategy = RsiMacdStrategy::default();
        let mut closes: Vec<f64> = (0..80).map(|i| 100.0 + i as f64).collect();

        let before = strategy.analyze_closes(&closes).unwrap();
        assert_eq!(before.trend, Trend::Up);
        assert_eq!(before.signal, Signal::Hold);

        closes.push(176.0);
        let after = strategy.analyze_closes(&closes).unwrap();
        assert_eq!(after.trend, Trend::Down);
        assert!(after.rsi > 65.0);
        assert_eq!(after.signal, Signal::Sell);
    }
}
