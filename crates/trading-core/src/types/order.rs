//! Order types and structures.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Signal;

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Side an actionable signal maps to; `None` for HOLD.
    pub fn from_signal(signal: Signal) -> Option<Self> {
        match signal {
            Signal::Buy => Some(Side::Buy),
            Signal::Sell => Some(Side::Sell),
            Signal::Hold => None,
        }
    }

    /// Wire representation used by broker APIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Time in force for orders. Market orders stay open until filled or
/// cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    #[default]
    Gtc,
}

impl TimeInForce {
    /// Wire representation used by broker APIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::Gtc => "gtc",
        }
    }
}

/// Order status as reported by the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order created but not yet acknowledged
    Pending,
    /// Order accepted by broker/exchange
    Accepted,
    /// Order partially filled
    PartiallyFilled,
    /// Order completely filled
    Filled,
    /// Order canceled or expired
    Canceled,
    /// Order rejected
    Rejected,
}

impl OrderStatus {
    /// Map a broker status string onto the local status.
    pub fn from_wire(status: &str) -> Self {
        match status {
            "new" | "accepted" | "pending_new" | "accepted_for_bidding" => OrderStatus::Accepted,
            "partially_filled" => OrderStatus::PartiallyFilled,
            "filled" | "done_for_day" => OrderStatus::Filled,
            "canceled" | "expired" | "replaced" | "pending_cancel" => OrderStatus::Canceled,
            "rejected" | "suspended" => OrderStatus::Rejected,
            _ => OrderStatus::Pending,
        }
    }
}

/// Market order request.
///
/// The bot only ever places market orders that stay open until filled or
/// cancelled, so the request carries no price fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Symbol to trade
    pub symbol: String,
    /// Buy or sell
    pub side: Side,
    /// Quantity to trade (positive, at most two decimal places)
    pub quantity: Decimal,
    /// Time in force
    pub time_in_force: TimeInForce,
}

impl OrderRequest {
    /// Create a good-till-cancelled market order request.
    pub fn market(symbol: impl Into<String>, side: Side, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            quantity,
            time_in_force: TimeInForce::Gtc,
        }
    }
}

/// Broker acknowledgement of a submitted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    /// Broker order ID
    pub id: String,
    /// Client-provided order ID
    pub client_order_id: String,
    /// Symbol traded
    pub symbol: String,
    /// Buy or sell
    pub side: Side,
    /// Requested quantity
    pub quantity: Decimal,
    /// Quantity filled so far
    pub filled_quantity: Decimal,
    /// Current status
    pub status: OrderStatus,
    /// When the broker accepted the order
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_request_market() {
        let request = OrderRequest::market("BTC/USD", Side::Buy, dec!(0.25));
        assert_eq!(request.symbol, "BTC/USD");
        assert_eq!(request.side, Side::Buy);
        assert_eq!(request.quantity, dec!(0.25));
        assert_eq!(request.time_in_force, TimeInForce::Gtc);
    }

    #[test]
    fn test_side_from_signal() {
        assert_eq!(Side::from_signal(Signal::Buy), Some(Side::Buy));
        assert_eq!(Side::from_signal(Signal::Sell), Some(Side::Sell));
        assert_eq!(Side::from_signal(Signal::Hold), None);
    }

    #[test]
    fn test_status_from_wire() {
        assert_eq!(OrderStatus::from_wire("pending_new"), OrderStatus::Accepted);
        assert_eq!(OrderStatus::from_wire("filled"), OrderStatus::Filled);
        assert_eq!(OrderStatus::from_wire("rejected"), OrderStatus::Rejected);
        assert_eq!(OrderStatus::from_wire("expired"), OrderStatus::Canceled);
        assert_eq!(
            OrderStatus::from_wire("partially_filled"),
            OrderStatus::PartiallyFilled
        );
    }
}
