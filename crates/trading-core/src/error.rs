//! Error types for the trading bot.

use thiserror::Error;

use crate::types::Side;

/// Top-level trading error.
///
/// Recoverable per-symbol conditions (unavailable data, too little history)
/// are handled inside a trading cycle and never surface here; what reaches
/// the caller is either fatal for the cycle or fatal for the bot.
#[derive(Error, Debug)]
pub enum TradingError {
    #[error("Trading account is blocked")]
    AccountBlocked,

    #[error("Market order failure: {side} {symbol}: {source}")]
    OrderSubmission {
        symbol: String,
        side: Side,
        #[source]
        source: BrokerError,
    },

    #[error("Trading has been halted after a fatal error")]
    Halted,

    #[error("Broker error: {0}")]
    Broker(#[from] BrokerError),
}

impl TradingError {
    /// Whether the error must stop the bot for good (as opposed to a cycle
    /// that can be retried after a cooldown).
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TradingError::OrderSubmission { .. } | TradingError::Halted
        )
    }
}

/// Broker-specific errors.
#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Account restricted: {0}")]
    AccountRestricted(String),

    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("Order rejected: {0}")]
    OrderRejected(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error: {0}")]
    Api(String),
}

/// Market data errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available for {0}")]
    NoDataAvailable(String),

    #[error("Invalid price series: {0}")]
    InvalidSeries(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Strategy configuration errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrategyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Indicator calculation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_submission_is_fatal() {
        let err = TradingError::OrderSubmission {
            symbol: "BTC/USD".to_string(),
            side: Side::Buy,
            source: BrokerError::InsufficientFunds("cash 10".into()),
        };
        assert!(err.is_fatal());
        assert!(err.to_string().contains("BUY BTC/USD"));
    }

    #[test]
    fn test_account_blocked_is_retryable() {
        assert!(!TradingError::AccountBlocked.is_fatal());
        assert!(!TradingError::Broker(BrokerError::Connection("reset".into())).is_fatal());
    }
}
