//! Market data source trait.

use crate::error::DataError;
use crate::types::{HistoryPeriod, PriceSeries};
use async_trait::async_trait;

/// Trait for historical price sources.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch daily closing prices.
    ///
    /// # Arguments
    /// * `symbol` - Pair symbol as configured, e.g. `BTC/USD`
    /// * `period` - How far back to look
    ///
    /// # Returns
    /// A validated series ordered from oldest to newest
    async fn get_price_history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<PriceSeries, DataError>;

    /// Get the most recent closing price.
    async fn get_latest_close(&self, symbol: &str) -> Result<f64, DataError> {
        let series = self.get_price_history(symbol, HistoryPeriod::Day).await?;
        series
            .last()
            .map(|p| p.close)
            .ok_or_else(|| DataError::NoDataAvailable(symbol.to_string()))
    }

    /// Get the data source name.
    fn name(&self) -> &str;
}
