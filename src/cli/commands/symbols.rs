//! List symbols command.

use anyhow::Result;
use trading_config::AppConfig;
use trading_data::ticker;

pub async fn run(config: &AppConfig) -> Result<()> {
    println!("Configured Symbols");
    println!("═══════════════════════════════════════════════════════════");
    println!("  {:<12} {:<20} {:<12} {}", "SYMBOL", "NAME", "TICKER", "MIN QTY");
    println!("───────────────────────────────────────────────────────────");

    for symbol in &config.symbols {
        println!(
            "  {:<12} {:<20} {:<12} {}",
            symbol.symbol,
            symbol.name,
            ticker(&symbol.symbol),
            symbol.min_quantity
        );
    }

    Ok(())
}
