//! CLI command implementations.

pub mod once;
pub mod run;
pub mod signals;
pub mod symbols;
pub mod validate;

use anyhow::{Context, Result};
use std::time::Duration;
use trading_broker::{AlpacaAuth, AlpacaBroker, AlpacaConfig};
use trading_config::{AppConfig, Credentials, TradingMode};
use trading_core::traits::{Broker, DataSource};
use trading_data::YahooDataSource;
use trading_engine::{OrchestratorConfig, ScheduleConfig, TradeOrchestrator};
use trading_risk::OrderSizer;
use trading_strategies::RsiMacdStrategy;

/// Alpaca client for `mode`, with credentials from the environment.
pub fn alpaca_broker(mode: TradingMode, config: &AppConfig) -> Result<AlpacaBroker> {
    let credentials = Credentials::from_env(mode)
        .with_context(|| format!("Missing {} trading credentials", mode))?;

    let auth = match credentials {
        Credentials::ApiKey { key, secret } => AlpacaAuth::ApiKey { key, secret },
        Credentials::OAuth { access_token } => AlpacaAuth::OAuth { access_token },
    };
    let base_url = if mode.is_live() {
        &config.alpaca.live_url
    } else {
        &config.alpaca.paper_url
    };

    let alpaca = AlpacaConfig {
        auth,
        paper: !mode.is_live(),
        base_url: Some(base_url.clone()),
        timeout: Duration::from_secs(config.alpaca.http_timeout_secs),
    };
    AlpacaBroker::new(alpaca).context("Failed to create Alpaca client")
}

pub fn data_source(config: &AppConfig) -> Result<YahooDataSource> {
    YahooDataSource::with_base_url(
        &config.market_data.base_url,
        Duration::from_secs(config.market_data.http_timeout_secs),
    )
    .context("Failed to create market data client")
}

pub fn orchestrator<B: Broker, D: DataSource>(
    broker: B,
    data: D,
    config: &AppConfig,
) -> TradeOrchestrator<B, D> {
    TradeOrchestrator::new(
        broker,
        data,
        config.symbols.clone(),
        RsiMacdStrategy::new(&config.strategy),
        OrderSizer::new(config.engine.sizing.clone()),
        OrchestratorConfig {
            pacing_delay: Duration::from_secs(config.engine.pacing_delay_secs),
            history_period: config.market_data.history_period,
        },
    )
}

pub fn schedule(config: &AppConfig) -> Result<ScheduleConfig> {
    let settings = &config.schedule;
    let (window_start, window_end) = settings.window()?;
    Ok(ScheduleConfig {
        window_start,
        window_end,
        idle_sleep: Duration::from_secs(settings.idle_sleep_mins * 60),
        cycle_sleep: Duration::from_secs(settings.cycle_sleep_mins * 60),
        max_idle_cycles: settings.max_idle_cycles,
        retry_cooldown: Duration::from_secs(settings.retry_cooldown_mins * 60),
    })
}
