//! Risk management for trading.
//!
//! Converts signals into bounded order requests.

mod position_sizer;

pub use position_sizer::{OrderSizer, SizerConfig, QUANTITY_DECIMALS};
