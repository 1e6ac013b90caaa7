//! Scheduled trading command implementation.

use anyhow::{Context, Result};
use tracing::{info, warn};
use trading_config::{AppConfig, TradingMode};
use trading_engine::{Scheduler, StopReason};

pub async fn run(mode: TradingMode, config: &AppConfig) -> Result<()> {
    let broker = super::alpaca_broker(mode, config)?;
    let data = super::data_source(config)?;
    let orchestrator = super::orchestrator(broker, data, config);
    let mut scheduler = Scheduler::new(orchestrator, super::schedule(config)?);

    info!(
        "Starting {} trading on {} symbols",
        mode,
        config.symbols.len()
    );

    tokio::select! {
        result = scheduler.run() => {
            match result.context("Trading stopped")? {
                StopReason::Idle { cycles } => info!("Stopped after {} cycles without trades", cycles),
                StopReason::Stopped => info!("Stopped"),
            }
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, shutting down");
        }
    }

    Ok(())
}
