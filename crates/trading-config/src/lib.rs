//! Configuration management.

mod credentials;
mod settings;

pub use credentials::{
    Credentials, TradingMode, ACCESS_TOKEN_VAR, LIVE_KEY_VAR, LIVE_SECRET_VAR, PAPER_KEY_VAR,
    PAPER_SECRET_VAR,
};
pub use settings::{
    AlpacaSettings, AppConfig, AppSettings, EngineSettings, LoggingConfig, MarketDataSettings,
    ScheduleSettings,
};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use std::path::Path;
use thiserror::Error;
use trading_core::error::StrategyError;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Invalid strategy settings: {0}")]
    Strategy(#[from] StrategyError),

    #[error("Missing credential: environment variable {0} is not set")]
    MissingCredential(String),
}

/// Load configuration from an optional file and the environment.
///
/// Environment overrides use the `TRADING` prefix with `__` between path
/// segments, e.g. `TRADING__SCHEDULE__MAX_IDLE_CYCLES=30`.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }
    builder = builder.add_source(
        Environment::with_prefix("TRADING")
            .separator("__")
            .try_parsing(true),
    );

    build(builder)
}

fn build(builder: ConfigBuilder<DefaultState>) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = builder.build()?.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use rust_decimal_macros::dec;
    use trading_core::types::HistoryPeriod;

    fn from_toml(toml: &str) -> Result<AppConfig, ConfigError> {
        build(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = from_toml("").unwrap();
        assert_eq!(config.symbols.len(), 6);
        assert_eq!(config.schedule.max_idle_cycles, 365);
        assert_eq!(config.strategy.rsi_period, 14);
    }

    #[test]
    fn test_partial_sections_merge_with_defaults() {
        let config = from_toml(
            r#"
            [engine]
            pacing_delay_secs = 2

            [engine.sizing]
            cash_fraction = 0.25

            [market_data]
            history_period = "1y"

            [schedule]
            window_start = "07:00"
            "#,
        )
        .unwrap();

        assert_eq!(config.engine.pacing_delay_secs, 2);
        assert_eq!(config.engine.sizing.cash_fraction, dec!(0.25));
        assert_eq!(config.engine.sizing.slippage_buffer_pct, dec!(3));
        assert_eq!(config.market_data.history_period, HistoryPeriod::Year);
        assert_eq!(config.schedule.window_start, "07:00");
        assert_eq!(config.schedule.window_end, "09:20");
    }

    #[test]
    fn test_custom_symbols_replace_defaults() {
        let config = from_toml(
            r#"
            [[symbols]]
            symbol = "BTC/USD"
            name = "Bitcoin"
            min_quantity = "0.01"
            "#,
        )
        .unwrap();

        assert_eq!(config.symbols.len(), 1);
        assert_eq!(config.symbols[0].min_quantity, dec!(0.01));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = from_toml(
            r#"
            [strategy]
            oversold = 80.0
            overbought = 20.0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Strategy(_)));
    }

    #[test]
    fn test_quantity_precision_is_not_configurable() {
        let err = from_toml(
            r#"
            [engine.sizing]
            quantity_decimals = 25
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = load_config(Some(Path::new("/nonexistent/trading.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
