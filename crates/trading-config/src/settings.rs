//! Configuration structures.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use trading_core::types::{default_symbols, HistoryPeriod, SymbolConfig};
use trading_risk::SizerConfig;
use trading_strategies::RsiMacdConfig;

use crate::ConfigError;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub alpaca: AlpacaSettings,
    #[serde(default)]
    pub market_data: MarketDataSettings,
    #[serde(default)]
    pub strategy: RsiMacdConfig,
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub schedule: ScheduleSettings,
    #[serde(default = "default_symbols")]
    pub symbols: Vec<SymbolConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSettings::default(),
            logging: LoggingConfig::default(),
            alpaca: AlpacaSettings::default(),
            market_data: MarketDataSettings::default(),
            strategy: RsiMacdConfig::default(),
            engine: EngineSettings::default(),
            schedule: ScheduleSettings::default(),
            symbols: default_symbols(),
        }
    }
}

impl AppConfig {
    /// Check cross-field constraints the types cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbols.is_empty() {
            return Err(ConfigError::Invalid("At least one symbol is required".into()));
        }
        for symbol in &self.symbols {
            if symbol.symbol.trim().is_empty() {
                return Err(ConfigError::Invalid("Symbol must not be empty".into()));
            }
            if symbol.min_quantity <= rust_decimal::Decimal::ZERO {
                return Err(ConfigError::Invalid(format!(
                    "Minimum quantity for {} must be positive",
                    symbol.symbol
                )));
            }
        }

        self.strategy.validate()?;

        let sizing = &self.engine.sizing;
        if sizing.cash_fraction <= rust_decimal::Decimal::ZERO
            || sizing.cash_fraction > rust_decimal::Decimal::ONE
        {
            return Err(ConfigError::Invalid(
                "Cash fraction must be in (0, 1]".into(),
            ));
        }
        if sizing.slippage_buffer_pct.is_sign_negative() {
            return Err(ConfigError::Invalid(
                "Slippage buffer must not be negative".into(),
            ));
        }

        let (start, end) = self.schedule.window()?;
        if end < start {
            return Err(ConfigError::Invalid(format!(
                "Trading window ends ({}) before it starts ({})",
                end, start
            )));
        }
        if self.schedule.max_idle_cycles == 0 {
            return Err(ConfigError::Invalid(
                "max_idle_cycles must be at least 1".into(),
            ));
        }

        if self.alpaca.http_timeout_secs == 0 || self.market_data.http_timeout_secs == 0 {
            return Err(ConfigError::Invalid("HTTP timeouts must be positive".into()));
        }

        Ok(())
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "crypto-trader".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Append-only log file; `None` disables it
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: Some("log.txt".to_string()),
        }
    }
}

/// Alpaca endpoints.
///
/// Credentials never live in the config file; see [`crate::Credentials`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlpacaSettings {
    pub paper_url: String,
    pub live_url: String,
    pub http_timeout_secs: u64,
}

impl Default for AlpacaSettings {
    fn default() -> Self {
        Self {
            paper_url: "https://paper-api.alpaca.markets".to_string(),
            live_url: "https://api.alpaca.markets".to_string(),
            http_timeout_secs: 30,
        }
    }
}

/// Market data source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketDataSettings {
    pub base_url: String,
    /// Look-back requested for indicator history
    pub history_period: HistoryPeriod,
    pub http_timeout_secs: u64,
}

impl Default for MarketDataSettings {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            history_period: HistoryPeriod::Max,
            http_timeout_secs: 30,
        }
    }
}

/// Trading cycle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Pause after each accepted order
    pub pacing_delay_secs: u64,
    pub sizing: SizerConfig,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            pacing_delay_secs: 5,
            sizing: SizerConfig::default(),
        }
    }
}

/// When the bot trades.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSettings {
    /// Local time, `HH:MM`
    pub window_start: String,
    /// Local time, `HH:MM`, inclusive
    pub window_end: String,
    pub idle_sleep_mins: u64,
    pub cycle_sleep_mins: u64,
    pub max_idle_cycles: u32,
    pub retry_cooldown_mins: u64,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            window_start: "08:30".to_string(),
            window_end: "09:20".to_string(),
            idle_sleep_mins: 30,
            cycle_sleep_mins: 60,
            max_idle_cycles: 365,
            retry_cooldown_mins: 15,
        }
    }
}

impl ScheduleSettings {
    /// Parsed trading window.
    pub fn window(&self) -> Result<(NaiveTime, NaiveTime), ConfigError> {
        Ok((
            parse_time("window_start", &self.window_start)?,
            parse_time("window_end", &self.window_end)?,
        ))
    }
}

fn parse_time(field: &str, raw: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| ConfigError::Invalid(format!("{} is not a valid time: {:?}", field, raw)))
}
