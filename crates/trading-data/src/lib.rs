//! Market data sources.

mod static_source;
mod yahoo;

pub use static_source::StaticDataSource;
pub use yahoo::{ticker, YahooDataSource, DEFAULT_BASE_URL};
