//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "crypto-trader")]
#[command(author, version, about = "RSI/MACD crypto trading bot for Alpaca")]
pub struct Cli {
    /// Configuration file path (defaults to config/default.toml when present)
    #[arg(short, long, env = "TRADING_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level, overrides the configured one
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    /// Append-only log file, overrides the configured one
    #[arg(long, conflicts_with = "no_log_file")]
    pub log_file: Option<PathBuf>,

    /// Do not write the log file
    #[arg(long)]
    pub no_log_file: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Trade on the paper account until stopped
    Paper,
    /// Trade on the live account until stopped
    Live,
    /// Run a single trading cycle now, ignoring the trading window
    Once(OnceArgs),
    /// Print current indicator readings and signals without trading
    Signals(SignalsArgs),
    /// List the configured symbols
    Symbols,
    /// Validate configuration
    ValidateConfig(ValidateArgs),
}

#[derive(clap::Args)]
pub struct OnceArgs {
    /// Use the live account instead of paper
    #[arg(long)]
    pub live: bool,

    /// Simulate orders in memory instead of sending them
    #[arg(long)]
    pub dry_run: bool,

    /// Starting cash for a dry run
    #[arg(long, default_value = "1000")]
    pub cash: f64,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args)]
pub struct SignalsArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Print the effective configuration as TOML
    #[arg(long)]
    pub show: bool,
}
