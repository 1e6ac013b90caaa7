//! Single cycle command implementation.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use trading_broker::PaperBroker;
use trading_config::{AppConfig, TradingMode};
use trading_core::traits::Broker;

use crate::cli::OnceArgs;

pub async fn run(args: OnceArgs, config: &AppConfig) -> Result<()> {
    if args.dry_run {
        let cash = Decimal::try_from(args.cash).context("Invalid --cash")?;
        return cycle(PaperBroker::new(cash), config, args.json).await;
    }

    let mode = if args.live {
        TradingMode::Live
    } else {
        TradingMode::Paper
    };
    cycle(super::alpaca_broker(mode, config)?, config, args.json).await
}

async fn cycle<B: Broker>(broker: B, config: &AppConfig, json: bool) -> Result<()> {
    let data = super::data_source(config)?;
    let mut orchestrator = super::orchestrator(broker, data, config);

    let report = orchestrator.trade().await.context("Trading cycle failed")?;

    if json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report.summary());
    }
    Ok(())
}
