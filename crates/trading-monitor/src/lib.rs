//! Logging and the append-only trade log.

mod logging;

pub use logging::{
    flat_file_layer, setup_logging, timestamp_prefix, FlatLogFormat, LogSettings, LoggingError,
};
