//! Validate configuration command.

use anyhow::Result;
use trading_config::AppConfig;

use crate::cli::ValidateArgs;

pub async fn run(args: ValidateArgs, config: &AppConfig) -> Result<()> {
    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!(
        "Trading window: {}-{}",
        config.schedule.window_start, config.schedule.window_end
    );
    println!(
        "RSI {} ({}/{}), MACD {}/{}/{}",
        config.strategy.rsi_period,
        config.strategy.oversold,
        config.strategy.overbought,
        config.strategy.macd_fast,
        config.strategy.macd_slow,
        config.strategy.macd_signal
    );
    println!(
        "Order size: {} of cash, {}% buffer",
        config.engine.sizing.cash_fraction, config.engine.sizing.slippage_buffer_pct
    );
    println!("Symbols: {}", config.symbols.len());

    if args.show {
        println!();
        println!("{}", toml::to_string_pretty(config)?);
    }

    Ok(())
}
