//! Yahoo Finance chart API data source.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use trading_core::error::DataError;
use trading_core::traits::DataSource;
use trading_core::types::{HistoryPeriod, PricePoint, PriceSeries};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Daily closes from the Yahoo Finance chart endpoint.
pub struct YahooDataSource {
    base_url: String,
    client: Client,
}

impl YahooDataSource {
    /// Create a client against the public endpoint.
    pub fn new(timeout: Duration) -> Result<Self, DataError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    /// Create a client against a custom host.
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DataError> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0")
            .timeout(timeout)
            .build()
            .map_err(|e| DataError::Connection(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }
}

/// Yahoo quotes crypto pairs with a dash (`BTC/USD` -> `BTC-USD`).
pub fn ticker(symbol: &str) -> String {
    symbol.replace('/', "-")
}

/// Turn a chart payload into a validated series.
///
/// Null closes are dropped, points are ordered by timestamp and a repeated
/// timestamp keeps its last close.
fn parse_chart(symbol: &str, response: ChartResponse) -> Result<PriceSeries, DataError> {
    if let Some(error) = response.chart.error {
        return Err(if error.code == "Not Found" {
            DataError::SymbolNotFound(symbol.to_string())
        } else {
            DataError::Parse(format!("{}: {}", error.code, error.description))
        });
    }

    let data = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| DataError::NoDataAvailable(symbol.to_string()))?;

    let closes = data
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    let mut by_time = BTreeMap::new();
    for (&ts, close) in data.timestamp.iter().zip(closes) {
        match close {
            Some(close) if close.is_finite() && close > 0.0 => {
                by_time.insert(ts * 1000, close);
            }
            _ => debug!("Dropping empty close for {} at {}", symbol, ts),
        }
    }

    if by_time.is_empty() {
        return Err(DataError::NoDataAvailable(symbol.to_string()));
    }

    let points = by_time
        .into_iter()
        .map(|(timestamp, close)| PricePoint::new(timestamp, close))
        .collect();
    PriceSeries::new(symbol, points)
}

#[async_trait]
impl DataSource for YahooDataSource {
    async fn get_price_history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<PriceSeries, DataError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker(symbol));

        debug!("Fetching {} history for {}", period, symbol);

        let resp = self
            .client
            .get(&url)
            .query(&[("range", period.as_range()), ("interval", "1d")])
            .send()
            .await
            .map_err(|e| DataError::Connection(e.to_string()))?;

        // The chart API reports unknown tickers as a 404 with an error body
        let status = resp.status();
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(DataError::Connection(format!("{} for {}", status, symbol)));
        }

        let response: ChartResponse = resp
            .json()
            .await
            .map_err(|e| DataError::Parse(e.to_string()))?;

        let series = parse_chart(symbol, response)?;
        debug!("Fetched {} closes for {}", series.len(), symbol);
        Ok(series)
    }

    fn name(&self) -> &str {
        "Yahoo Finance"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(symbol: &str, json: &str) -> Result<PriceSeries, DataError> {
        parse_chart(symbol, serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_ticker() {
        assert_eq!(ticker("BTC/USD"), "BTC-USD");
        assert_eq!(ticker("USDC/USD"), "USDC-USD");
    }

    #[test]
    fn test_parse_chart_drops_nulls() {
        let json = r#"{"chart": {"result": [{
            "meta": {"symbol": "BTC-USD", "currency": "USD"},
            "timestamp": [1700000000, 1700086400, 1700172800, 1700259200],
            "indicators": {"quote": [{
                "open": [1.0, 2.0, 3.0, 4.0],
                "close": [36500.5, null, 37100.25, 36950.0]
            }]}
        }], "error": null}}"#;

        let series = parse("BTC/USD", json).unwrap();
        assert_eq!(series.symbol(), "BTC/USD");
        assert_eq!(series.closes(), vec![36500.5, 37100.25, 36950.0]);
        assert_eq!(series.points()[0].timestamp, 1_700_000_000_000);
    }

    #[test]
    fn test_parse_chart_orders_and_dedups() {
        let json = r#"{"chart": {"result": [{
            "timestamp": [30, 10, 20, 30],
            "indicators": {"quote": [{"close": [3.0, 1.0, 2.0, 3.5]}]}
        }], "error": null}}"#;

        let series = parse("ETH/USD", json).unwrap();
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.5]);
    }

    #[test]
    fn test_parse_chart_unknown_symbol() {
        let json = r#"{"chart": {"result": null, "error": {
            "code": "Not Found",
            "description": "No data found, symbol may be delisted"
        }}}"#;

        assert!(matches!(
            parse("FOO/USD", json),
            Err(DataError::SymbolNotFound(s)) if s == "FOO/USD"
        ));
    }

    #[test]
    fn test_parse_chart_all_null() {
        let json = r#"{"chart": {"result": [{
            "timestamp": [1, 2],
            "indicators": {"quote": [{"close": [null, null]}]}
        }], "error": null}}"#;

        assert!(matches!(
            parse("LINK/USD", json),
            Err(DataError::NoDataAvailable(_))
        ));
    }

    #[test]
    fn test_parse_chart_without_timestamps() {
        let json = r#"{"chart": {"result": [{
            "indicators": {"quote": [{}]}
        }], "error": null}}"#;

        assert!(matches!(
            parse("AVAX/USD", json),
            Err(DataError::NoDataAvailable(_))
        ));
    }
}
