//! Broker trait definition.

use crate::error::BrokerError;
use crate::types::{AccountSnapshot, OrderConfirmation, OrderRequest, Position};
use async_trait::async_trait;

/// Trait for broker integrations.
///
/// Brokers supply the account state the bot sizes orders against and
/// accept the resulting market orders.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Get a fresh snapshot of the trading account.
    async fn get_account(&self) -> Result<AccountSnapshot, BrokerError>;

    /// Get the open position for a symbol.
    ///
    /// # Arguments
    /// * `symbol` - Pair symbol as configured, e.g. `BTC/USD`
    ///
    /// # Returns
    /// The position if one exists, None when flat
    async fn get_open_position(&self, symbol: &str) -> Result<Option<Position>, BrokerError>;

    /// Submit a market order.
    ///
    /// # Arguments
    /// * `request` - The order request to submit
    ///
    /// # Returns
    /// The broker's acknowledgement of the order
    async fn submit_market_order(
        &self,
        request: OrderRequest,
    ) -> Result<OrderConfirmation, BrokerError>;

    /// Get the broker name.
    fn name(&self) -> &str;
}
