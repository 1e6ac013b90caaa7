//! Order sizing.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;
use trading_core::types::{AccountSnapshot, OrderRequest, Position, Side, Signal, SymbolConfig};

/// Decimal places every order quantity is truncated to.
pub const QUANTITY_DECIMALS: u32 = 2;

/// Sizing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizerConfig {
    /// Share of available cash committed to a single buy
    pub cash_fraction: Decimal,
    /// Price buffer for slippage and fees, in percent
    pub slippage_buffer_pct: Decimal,
}

impl Default for SizerConfig {
    fn default() -> Self {
        Self {
            cash_fraction: dec!(0.5),
            slippage_buffer_pct: dec!(3),
        }
    }
}

/// Turns a signal plus account state into a bounded market order.
#[derive(Debug, Clone, Default)]
pub struct OrderSizer {
    config: SizerConfig,
}

impl OrderSizer {
    /// Create a new order sizer.
    pub fn new(config: SizerConfig) -> Self {
        Self { config }
    }

    /// Size an order for a signal.
    ///
    /// Returns `None` for HOLD, for a sell without a position, and whenever
    /// the truncated quantity falls below the symbol's minimum.
    pub fn size(
        &self,
        signal: Signal,
        symbol: &SymbolConfig,
        account: &AccountSnapshot,
        position: Option<&Position>,
        last_price: f64,
    ) -> Option<OrderRequest> {
        let side = Side::from_signal(signal)?;

        let quantity = match side {
            Side::Buy => self.buy_quantity(account.cash, last_price)?,
            Side::Sell => match position {
                Some(position) => truncate(position.quantity_available),
                None => {
                    debug!("No open {} position to sell", symbol.symbol);
                    return None;
                }
            },
        };

        if quantity <= Decimal::ZERO || quantity < symbol.min_quantity {
            debug!(
                "{} quantity {} for {} is below minimum {}",
                side, quantity, symbol.symbol, symbol.min_quantity
            );
            return None;
        }

        Some(OrderRequest::market(&symbol.symbol, side, quantity))
    }

    /// `floor(cash * fraction / (price * (1 + buffer)))` to two decimals.
    fn buy_quantity(&self, cash: Decimal, last_price: f64) -> Option<Decimal> {
        let price = Decimal::try_from(last_price).ok()?;
        if price <= Decimal::ZERO {
            return None;
        }

        let buffered_price = price * (Decimal::ONE + self.config.slippage_buffer_pct / dec!(100));
        let budget = cash * self.config.cash_fraction;
        Some(truncate(budget / buffered_price))
    }
}

fn truncate(quantity: Decimal) -> Decimal {
    quantity.trunc_with_scale(QUANTITY_DECIMALS)
}
