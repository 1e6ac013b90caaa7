//! Tradable symbol configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// A tradable pair with its display name and minimum order size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolConfig {
    /// Pair symbol, e.g. `BTC/USD`
    pub symbol: String,
    /// Human-readable name used in log messages
    pub name: String,
    /// Smallest quantity the brokerage accepts
    pub min_quantity: Decimal,
}

impl SymbolConfig {
    /// Create a new symbol configuration.
    pub fn new(symbol: impl Into<String>, name: impl Into<String>, min_quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            min_quantity,
        }
    }

    /// `Bitcoin (BTC/USD)`
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.symbol)
    }
}

/// The fixed set of pairs the bot trades.
pub fn default_symbols() -> Vec<SymbolConfig> {
    vec![
        SymbolConfig::new("BTC/USD", "Bitcoin", dec!(0.01)),
        SymbolConfig::new("ETH/USD", "Ethereum", dec!(0.01)),
        SymbolConfig::new("LINK/USD", "Link", dec!(0.1)),
        SymbolConfig::new("USDT/USD", "Tether", dec!(1)),
        SymbolConfig::new("USDC/USD", "U.S. Dollar Coin", dec!(1)),
        SymbolConfig::new("AVAX/USD", "Avalanche", dec!(0.1)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_symbols() {
        let symbols = default_symbols();
        assert_eq!(symbols.len(), 6);

        let btc = symbols.iter().find(|s| s.symbol == "BTC/USD").unwrap();
        assert_eq!(btc.min_quantity, dec!(0.01));
        assert_eq!(btc.label(), "Bitcoin (BTC/USD)");

        let usdt = symbols.iter().find(|s| s.symbol == "USDT/USD").unwrap();
        assert_eq!(usdt.min_quantity, dec!(1));
    }
}
