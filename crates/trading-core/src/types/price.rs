//! Closing-price history types.

use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// A single closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Closing price
    pub close: f64,
}

impl PricePoint {
    /// Create a new price point.
    pub fn new(timestamp: i64, close: f64) -> Self {
        Self { timestamp, close }
    }
}

/// Time-ordered closing prices for one symbol.
///
/// Timestamps are strictly ascending and every close is positive and
/// finite; the constructor rejects anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Create a validated series.
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, DataError> {
        let symbol = symbol.into();

        for (i, point) in points.iter().enumerate() {
            if !point.close.is_finite() || point.close <= 0.0 {
                return Err(DataError::InvalidSeries(format!(
                    "{}: non-positive close {} at index {}",
                    symbol, point.close, i
                )));
            }
            if i > 0 && point.timestamp <= points[i - 1].timestamp {
                return Err(DataError::InvalidSeries(format!(
                    "{}: timestamps not strictly ascending at index {}",
                    symbol, i
                )));
            }
        }

        Ok(Self { symbol, points })
    }

    /// Build a series from bare closes, one point per day starting at the epoch.
    pub fn from_closes(symbol: impl Into<String>, closes: &[f64]) -> Result<Self, DataError> {
        const DAY_MS: i64 = 86_400_000;
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint::new(i as i64 * DAY_MS, close))
            .collect();
        Self::new(symbol, points)
    }

    /// Symbol this series belongs to.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All points, oldest first.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Most recent point.
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_accepts_ascending_points() {
        let series = PriceSeries::new(
            "BTC/USD",
            vec![PricePoint::new(1, 100.0), PricePoint::new(2, 101.5)],
        )
        .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![100.0, 101.5]);
        assert_eq!(series.last().unwrap().timestamp, 2);
    }

    #[test]
    fn test_series_rejects_duplicate_timestamps() {
        let result = PriceSeries::new(
            "BTC/USD",
            vec![PricePoint::new(1, 100.0), PricePoint::new(1, 101.0)],
        );
        assert!(matches!(result, Err(DataError::InvalidSeries(_))));
    }

    #[test]
    fn test_series_rejects_non_positive_close() {
        let result = PriceSeries::new("ETH/USD", vec![PricePoint::new(1, 0.0)]);
        assert!(result.is_err());

        let result = PriceSeries::new("ETH/USD", vec![PricePoint::new(1, f64::NAN)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_closes() {
        let series = PriceSeries::from_closes("LINK/USD", &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(series.symbol(), "LINK/USD");
        assert_eq!(series.points()[2].timestamp, 2 * 86_400_000);
    }
}
