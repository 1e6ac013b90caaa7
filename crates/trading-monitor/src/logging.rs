//! Logging setup.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use thiserror::Error;
use tracing::{Event, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{filter::LevelFilter, fmt as tfmt, prelude::*, EnvFilter, Layer};

/// Logging errors.
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Invalid log file path: {0}")]
    InvalidPath(PathBuf),

    #[error("Failed to create log directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to install subscriber: {0}")]
    Init(String),
}

/// Logging options.
#[derive(Debug, Clone)]
pub struct LogSettings {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    /// JSON instead of pretty console output
    pub json: bool,
    /// Append-only log file
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: Some(PathBuf::from("log.txt")),
        }
    }
}

/// `(17/10/26 08:30:00)`
pub fn timestamp_prefix<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    time.format("(%d/%m/%y %H:%M:%S)").to_string()
}

/// Event format for the flat log file: `(DD/MM/YY HH:MM:SS) LEVEL: message`.
pub struct FlatLogFormat;

impl<S, N> FormatEvent<S, N> for FlatLogFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "{} {}: ",
            timestamp_prefix(&Local::now()),
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Flat log file layer. Always records INFO and above, whatever the console
/// filter says, so every order and error reaches the file.
pub fn flat_file_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tfmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .event_format(FlatLogFormat)
        .with_filter(LevelFilter::INFO)
}

fn split_path(path: &Path) -> Result<(PathBuf, String), LoggingError> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(path.to_path_buf()))?
        .to_string();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, file_name))
}

/// Install the global subscriber.
///
/// `RUST_LOG` or the configured level filters the console only; the log
/// file receives INFO and above regardless. Keep the returned guard alive
/// for the lifetime of the process or buffered lines are lost.
pub fn setup_logging(settings: &LogSettings) -> Result<Option<WorkerGuard>, LoggingError> {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let (file_layer, guard) = match &settings.file {
        Some(path) => {
            let (dir, file_name) = split_path(path)?;
            std::fs::create_dir_all(&dir)?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(flat_file_layer(writer)), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(file_layer);
    let result = if settings.json {
        registry
            .with(tfmt::layer().json().with_filter(console_filter))
            .try_init()
    } else {
        registry
            .with(tfmt::layer().pretty().with_filter(console_filter))
            .try_init()
    };
    result.map_err(|e| LoggingError::Init(e.to_string()))?;

    Ok(guard)
}
