//! Broker integrations.

mod alpaca;
mod paper;

pub use alpaca::{AlpacaAuth, AlpacaBroker, AlpacaConfig};
pub use paper::PaperBroker;
