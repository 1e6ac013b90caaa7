//! Indicator trait definitions.

use crate::error::IndicatorError;

/// Trait for technical indicators.
///
/// Indicators process closing prices and produce derived values
/// useful for trading decisions.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values for the given data.
    ///
    /// # Arguments
    /// * `data` - Input data (typically closing prices, oldest first)
    ///
    /// # Returns
    /// A vector of indicator values, empty when there is not enough data
    fn calculate(&self, data: &[f64]) -> Vec<Self::Output>;

    /// Get the minimum data points required.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Validate that there's enough data.
    fn validate_data(&self, data: &[f64]) -> Result<(), IndicatorError> {
        if data.len() < self.period() {
            return Err(IndicatorError::InsufficientData {
                required: self.period(),
                available: data.len(),
            });
        }
        Ok(())
    }

    /// Most recent indicator value.
    ///
    /// Fails with `InsufficientData` instead of returning a placeholder
    /// when the input is too short.
    fn latest(&self, data: &[f64]) -> Result<Self::Output, IndicatorError> {
        self.validate_data(data)?;
        self.calculate(data)
            .pop()
            .ok_or(IndicatorError::InsufficientData {
                required: self.period(),
                available: data.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestIndicator {
        period: usize,
    }

    impl Indicator for TestIndicator {
        type Output = f64;

        fn calculate(&self, data: &[f64]) -> Vec<f64> {
            if data.len() < self.period {
                return vec![];
            }
            // Simple sum indicator for testing
            data.windows(self.period)
                .map(|w| w.iter().sum())
                .collect()
        }

        fn period(&self) -> usize {
            self.period
        }

        fn name(&self) -> &str {
            "test"
        }
    }

    #[test]
    fn test_indicator_validation() {
        let indicator = TestIndicator { period: 5 };

        assert!(indicator.validate_data(&[1.0, 2.0, 3.0]).is_err());
        assert!(indicator.validate_data(&[1.0, 2.0, 3.0, 4.0, 5.0]).is_ok());
    }

    #[test]
    fn test_indicator_latest() {
        let indicator = TestIndicator { period: 3 };
        let latest = indicator.latest(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!((latest - 12.0).abs() < 0.001); // 3+4+5

        let err = indicator.latest(&[1.0]).unwrap_err();
        assert_eq!(
            err,
            IndicatorError::InsufficientData {
                required: 3,
                available: 1
            }
        );
    }
}
