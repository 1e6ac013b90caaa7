//! Account and position snapshots.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Read-only view of the brokerage account, fetched fresh each cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// Available cash
    pub cash: Decimal,
    /// Whether the brokerage has blocked the account from trading
    pub blocked: bool,
}

impl AccountSnapshot {
    /// Create a snapshot for an unblocked account.
    pub fn new(cash: Decimal) -> Self {
        Self {
            cash,
            blocked: false,
        }
    }
}

/// An open position in a single symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Symbol
    pub symbol: String,
    /// Quantity that is not tied up in open orders
    pub quantity_available: Decimal,
}

impl Position {
    /// Create a new position.
    pub fn new(symbol: impl Into<String>, quantity_available: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            quantity_available,
        }
    }

    /// Check if nothing can be sold.
    pub fn is_flat(&self) -> bool {
        self.quantity_available <= Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_account_snapshot() {
        let account = AccountSnapshot::new(dec!(1000));
        assert!(!account.blocked);
        assert_eq!(account.cash, dec!(1000));
    }

    #[test]
    fn test_position_flat() {
        assert!(Position::new("ETH/USD", Decimal::ZERO).is_flat());
        assert!(!Position::new("ETH/USD", dec!(0.5)).is_flat());
    }
}
