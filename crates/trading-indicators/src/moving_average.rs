//! Exponential moving averages.

use trading_core::traits::Indicator;

/// Exponential Moving Average (EMA).
///
/// Uses the adjusted (cumulative) form: every value from the first one on
/// contributes with weight `(1 - alpha)^age`, normalised by the sum of the
/// weights. There is no simple-moving-average seed, so the EMA is defined
/// from the first data point.
#[derive(Debug, Clone)]
pub struct Ema {
    alpha: f64,
}

impl Ema {
    /// Create an EMA with smoothing factor `2 / (span + 1)`.
    pub fn new(span: usize) -> Self {
        assert!(span > 0, "Span must be greater than 0");
        Self {
            alpha: 2.0 / (span as f64 + 1.0),
        }
    }

    /// Create an EMA with Wilder's smoothing factor `1 / period`.
    pub fn wilder(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            alpha: 1.0 / period as f64,
        }
    }

    /// Smoothing factor.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Start a streaming EMA with the same smoothing.
    pub fn streaming(&self) -> StreamingEma {
        StreamingEma::with_alpha(self.alpha)
    }
}

impl Indicator for Ema {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        let mut ema = self.streaming();
        data.iter().map(|&value| ema.update(value)).collect()
    }

    fn period(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

/// Streaming adjusted EMA that maintains state for incremental updates.
///
/// Keeps the running weight sum `w_t = 1 + (1 - alpha) * w_{t-1}` and
/// moves the average by `(value - ema) / w_t`, which equals the weighted
/// mean over all values seen so far and stays exact on constant input.
#[derive(Debug, Clone)]
pub struct StreamingEma {
    decay: f64,
    weight: f64,
    current: Option<f64>,
}

impl StreamingEma {
    /// Create a streaming EMA with smoothing factor `2 / (span + 1)`.
    pub fn new(span: usize) -> Self {
        assert!(span > 0, "Span must be greater than 0");
        Self::with_alpha(2.0 / (span as f64 + 1.0))
    }

    /// Create a streaming EMA with an explicit smoothing factor.
    pub fn with_alpha(alpha: f64) -> Self {
        assert!(
            alpha > 0.0 && alpha <= 1.0,
            "Smoothing factor must be in (0, 1]"
        );
        Self {
            decay: 1.0 - alpha,
            weight: 0.0,
            current: None,
        }
    }

    /// Update with a new value and return the current EMA.
    pub fn update(&mut self, value: f64) -> f64 {
        self.weight = 1.0 + self.decay * self.weight;
        let next = match self.current {
            None => value,
            Some(prev) => prev + (value - prev) / self.weight,
        };
        self.current = Some(next);
        next
    }

    /// Get the current EMA value.
    pub fn current(&self) -> Option<f64> {
        self.current
    }

    /// Reset the indicator.
    pub fn reset(&mut self) {
        self.weight = 0.0;
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_adjusted_weights() {
        let ema = Ema::new(3);
        let data = vec![1.0, 2.0, 3.0];
        let result = ema.calculate(&data);

        assert_eq!(result.len(), 3);
        // Seeded from the first value, no SMA warm-up
        assert!((result[0] - 1.0).abs() < 1e-10);
        // alpha = 0.5: (2 + 0.5*1) / (1 + 0.5)
        assert!((result[1] - 2.5 / 1.5).abs() < 1e-10);
        // (3 + 0.5*2 + 0.25*1) / (1 + 0.5 + 0.25)
        assert!((result[2] - 4.25 / 1.75).abs() < 1e-10);
    }

    #[test]
    fn test_ema_constant_input_is_exact() {
        let ema = Ema::new(26);
        let result = ema.calculate(&[42.5; 100]);
        assert!(result.iter().all(|&v| v == 42.5));
    }

    #[test]
    fn test_wilder_alpha() {
        assert!((Ema::wilder(14).alpha() - 1.0 / 14.0).abs() < 1e-12);
        assert!((Ema::new(9).alpha() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_streaming_ema_reset() {
        let mut ema = StreamingEma::new(3);
        ema.update(1.0);
        ema.update(2.0);
        assert!(ema.current().is_some());

        ema.reset();
        assert!(ema.current().is_none());
        assert_eq!(ema.update(7.0), 7.0);
    }
}
