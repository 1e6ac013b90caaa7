//! Signals command implementation.

use anyhow::Result;
use serde_json::json;
use trading_config::AppConfig;
use trading_core::traits::DataSource;
use trading_strategies::RsiMacdStrategy;

use crate::cli::SignalsArgs;

pub async fn run(args: SignalsArgs, config: &AppConfig) -> Result<()> {
    let data = super::data_source(config)?;
    let strategy = RsiMacdStrategy::new(&config.strategy);
    let mut rows = Vec::new();

    if !args.json {
        println!(
            "{} signals ({}, needs {} daily closes)",
            strategy.name(),
            data.name(),
            strategy.warmup_period()
        );
        println!("═══════════════════════════════════════════════════════════");
        println!("  SYMBOL          CLOSE      RSI       MACD     SIGNAL");
        println!("───────────────────────────────────────────────────────────");
    }

    for symbol in &config.symbols {
        let history = match data
            .get_price_history(&symbol.symbol, config.market_data.history_period)
            .await
        {
            Ok(history) => history,
            Err(e) => {
                if args.json {
                    rows.push(json!({ "symbol": symbol.symbol, "error": e.to_string() }));
                } else {
                    println!("  {:<12} unavailable: {}", symbol.symbol, e);
                }
                continue;
            }
        };

        match strategy.analyze(&history) {
            Ok(analysis) if args.json => rows.push(json!({
                "symbol": symbol.symbol,
                "analysis": analysis,
            })),
            Ok(a) => println!(
                "  {:<12} {:>10.2} {:>8.2} {:>10.4} {:>10}",
                symbol.symbol,
                a.last_close,
                a.rsi,
                a.macd.histogram,
                a.signal.to_string()
            ),
            Err(e) if args.json => {
                rows.push(json!({ "symbol": symbol.symbol, "error": e.to_string() }))
            }
            Err(e) => println!("  {:<12} {}", symbol.symbol, e),
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    }
    Ok(())
}
