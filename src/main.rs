//! RSI/MACD crypto trading bot.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use trading_config::{load_config, AppConfig, TradingMode};
use trading_monitor::{setup_logging, LogSettings};

const DEFAULT_CONFIG: &str = "config/default.toml";

fn config_path(cli: &Cli) -> Option<PathBuf> {
    cli.config.clone().or_else(|| {
        let default = Path::new(DEFAULT_CONFIG);
        default.exists().then(|| default.to_path_buf())
    })
}

fn log_settings(cli: &Cli, config: &AppConfig) -> LogSettings {
    let file = if cli.no_log_file {
        None
    } else {
        cli.log_file
            .clone()
            .or_else(|| config.logging.file.as_ref().map(PathBuf::from))
    };

    LogSettings {
        level: cli
            .log_level
            .map(|l| l.as_str().to_string())
            .unwrap_or_else(|| config.logging.level.clone()),
        json: cli.json_logs || config.logging.format.eq_ignore_ascii_case("json"),
        file,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let path = config_path(&cli);
    let config = load_config(path.as_deref()).with_context(|| match &path {
        Some(p) => format!("Failed to load configuration from {}", p.display()),
        None => "Failed to load configuration".to_string(),
    })?;

    // Flushes the log file on drop
    let _guard = setup_logging(&log_settings(&cli, &config)).context("Failed to set up logging")?;

    // Execute command
    match cli.command {
        Commands::Paper => cli::commands::run::run(TradingMode::Paper, &config).await,
        Commands::Live => cli::commands::run::run(TradingMode::Live, &config).await,
        Commands::Once(args) => cli::commands::once::run(args, &config).await,
        Commands::Signals(args) => cli::commands::signals::run(args, &config).await,
        Commands::Symbols => cli::commands::symbols::run(&config).await,
        Commands::ValidateConfig(args) => cli::commands::validate::run(args, &config).await,
    }
}
