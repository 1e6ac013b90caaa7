//! In-memory data source.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use trading_core::error::DataError;
use trading_core::traits::DataSource;
use trading_core::types::{HistoryPeriod, PriceSeries};

/// Serves fixed series from memory.
///
/// Every look-back period returns the full stored series, except `Day`,
/// which returns only the most recent point. Clones share storage and the
/// request counter.
#[derive(Clone, Default)]
pub struct StaticDataSource {
    series: Arc<Mutex<HashMap<String, PriceSeries>>>,
    requests: Arc<AtomicUsize>,
}

impl StaticDataSource {
    /// Create an empty data source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store bare closes for a symbol.
    pub fn with_closes(self, symbol: &str, closes: &[f64]) -> Result<Self, DataError> {
        self.insert(PriceSeries::from_closes(symbol, closes)?);
        Ok(self)
    }

    /// Store or replace a series.
    pub fn insert(&self, series: PriceSeries) {
        self.series
            .lock()
            .unwrap()
            .insert(series.symbol().to_string(), series);
    }

    /// History requests served so far, failed lookups included.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl DataSource for StaticDataSource {
    async fn get_price_history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<PriceSeries, DataError> {
        self.requests.fetch_add(1, Ordering::Relaxed);

        let series = self
            .series
            .lock()
            .unwrap()
            .get(symbol)
            .cloned()
            .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))?;

        match period {
            HistoryPeriod::Day => {
                let last = series
                    .last()
                    .copied()
                    .ok_or_else(|| DataError::NoDataAvailable(symbol.to_string()))?;
                PriceSeries::new(symbol, vec![last])
            }
            _ => Ok(series),
        }
    }

    fn name(&self) -> &str {
        "Static"
    }
}
