//! Paper trading broker for dry runs and simulation.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use trading_core::error::BrokerError;
use trading_core::traits::Broker;
use trading_core::types::{
    AccountSnapshot, OrderConfirmation, OrderRequest, OrderStatus, Position, Side,
};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Default)]
struct PaperState {
    account: AccountSnapshot,
    /// Keyed by the separator-free symbol, as the brokerage reports it
    positions: HashMap<String, Decimal>,
    marks: HashMap<String, Decimal>,
    orders: Vec<OrderRequest>,
    next_failure: Option<BrokerError>,
}

/// In-memory broker.
///
/// Orders are recorded and acknowledged. When a mark price is known for the
/// symbol the order fills immediately at that price and cash and positions
/// move accordingly; otherwise it stays accepted and nothing changes.
#[derive(Clone)]
pub struct PaperBroker {
    state: Arc<Mutex<PaperState>>,
}

impl PaperBroker {
    /// Create a new paper broker with starting cash.
    pub fn new(cash: Decimal) -> Self {
        let state = PaperState {
            account: AccountSnapshot::new(cash),
            ..Default::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Start with an open position.
    pub fn with_position(self, symbol: &str, quantity: Decimal) -> Self {
        self.state
            .lock()
            .unwrap()
            .positions
            .insert(key(symbol), quantity);
        self
    }

    /// Fill orders for `symbol` at `price`.
    pub fn with_mark_price(self, symbol: &str, price: Decimal) -> Self {
        self.set_mark_price(symbol, price);
        self
    }

    /// Update the fill price for a symbol.
    pub fn set_mark_price(&self, symbol: &str, price: Decimal) {
        self.state.lock().unwrap().marks.insert(key(symbol), price);
    }

    /// Block or unblock the account.
    pub fn set_blocked(&self, blocked: bool) {
        self.state.lock().unwrap().account.blocked = blocked;
    }

    /// Make the next order submission fail with `error`.
    pub fn fail_next_order(&self, error: BrokerError) {
        self.state.lock().unwrap().next_failure = Some(error);
    }

    /// Every order accepted so far, oldest first.
    pub fn submitted_orders(&self) -> Vec<OrderRequest> {
        self.state.lock().unwrap().orders.clone()
    }

    /// Current cash.
    pub fn cash(&self) -> Decimal {
        self.state.lock().unwrap().account.cash
    }

    /// Current quantity held for a symbol.
    pub fn position_quantity(&self, symbol: &str) -> Decimal {
        self.state
            .lock()
            .unwrap()
            .positions
            .get(&key(symbol))
            .copied()
            .unwrap_or_default()
    }
}

fn key(symbol: &str) -> String {
    symbol.replace('/', "")
}

impl PaperState {
    fn fill(&mut self, request: &OrderRequest, price: Decimal) -> Result<(), BrokerError> {
        let symbol = key(&request.symbol);
        let value = price * request.quantity;

        match request.side {
            Side::Buy => {
                if value > self.account.cash {
                    return Err(BrokerError::InsufficientFunds(format!(
                        "required {}, available {}",
                        value, self.account.cash
                    )));
                }
                self.account.cash -= value;
                *self.positions.entry(symbol).or_default() += request.quantity;
            }
            Side::Sell => {
                let held = self.positions.get(&symbol).copied().unwrap_or_default();
                if request.quantity > held {
                    return Err(BrokerError::OrderRejected(format!(
                        "insufficient qty available for {} (requested: {}, available: {})",
                        request.symbol, request.quantity, held
                    )));
                }
                self.account.cash += value;
                if held == request.quantity {
                    self.positions.remove(&symbol);
                } else {
                    self.positions.insert(symbol, held - request.quantity);
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Broker for PaperBroker {
    async fn get_account(&self) -> Result<AccountSnapshot, BrokerError> {
        Ok(self.state.lock().unwrap().account.clone())
    }

    async fn get_open_position(&self, symbol: &str) -> Result<Option<Position>, BrokerError> {
        let state = self.state.lock().unwrap();
        let symbol = key(symbol);
        Ok(state
            .positions
            .get(&symbol)
            .map(|qty| Position::new(symbol.clone(), *qty))
            .filter(|position| !position.is_flat()))
    }

    async fn submit_market_order(
        &self,
        request: OrderRequest,
    ) -> Result<OrderConfirmation, BrokerError> {
        let mut state = self.state.lock().unwrap();

        if let Some(error) = state.next_failure.take() {
            return Err(error);
        }
        if state.account.blocked {
            return Err(BrokerError::AccountRestricted(
                "account is blocked".to_string(),
            ));
        }
        if request.quantity <= Decimal::ZERO {
            return Err(BrokerError::OrderRejected("qty must be > 0".to_string()));
        }

        let mark = state.marks.get(&key(&request.symbol)).copied();
        let (status, filled_quantity) = match mark {
            Some(price) => {
                state.fill(&request, price)?;
                (OrderStatus::Filled, request.quantity)
            }
            None => (OrderStatus::Accepted, Decimal::ZERO),
        };

        debug!(
            "Paper order {} {} {} -> {:?}",
            request.side, request.quantity, request.symbol, status
        );
        state.orders.push(request.clone());

        Ok(OrderConfirmation {
            id: Uuid::new_v4().to_string(),
            client_order_id: Uuid::new_v4().to_string(),
            symbol: request.symbol,
            side: request.side,
            quantity: request.quantity,
            filled_quantity,
            status,
            submitted_at: Utc::now(),
        })
    }

    fn name(&self) -> &str {
        "Paper"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_order_without_mark_is_only_recorded() {
        let broker = PaperBroker::new(dec!(1000));
        let request = OrderRequest::market("BTC/USD", Side::Buy, dec!(0.5));

        let confirmation = broker.submit_market_order(request.clone()).await.unwrap();
        assert_eq!(confirmation.status, OrderStatus::Accepted);
        assert_eq!(confirmation.filled_quantity, Decimal::ZERO);

        assert_eq!(broker.submitted_orders(), vec![request]);
        assert_eq!(broker.cash(), dec!(1000));
    }

    #[tokio::test]
    async fn test_buy_and_sell_fill_at_mark() {
        let broker = PaperBroker::new(dec!(1000)).with_mark_price("ETH/USD", dec!(100));

        broker
            .submit_market_order(OrderRequest::market("ETH/USD", Side::Buy, dec!(4.85)))
            .await
            .unwrap();
        assert_eq!(broker.cash(), dec!(515));

        let position = broker.get_open_position("ETH/USD").await.unwrap().unwrap();
        assert_eq!(position.symbol, "ETHUSD");
        assert_eq!(position.quantity_available, dec!(4.85));

        broker.set_mark_price("ETH/USD", dec!(110));
        let confirmation = broker
            .submit_market_order(OrderRequest::market("ETH/USD", Side::Sell, dec!(4.85)))
            .await
            .unwrap();
        assert_eq!(confirmation.status, OrderStatus::Filled);
        assert_eq!(broker.cash(), dec!(1048.50));
        assert!(broker.get_open_position("ETH/USD").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_buy_beyond_cash_is_rejected() {
        let broker = PaperBroker::new(dec!(10)).with_mark_price("BTC/USD", dec!(60000));
        let err = broker
            .submit_market_order(OrderRequest::market("BTC/USD", Side::Buy, dec!(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, BrokerError::InsufficientFunds(_)));
        assert!(broker.submitted_orders().is_empty());
    }

    #[tokio::test]
    async fn test_forced_failure_applies_once() {
        let broker = PaperBroker::new(dec!(1000));
        broker.fail_next_order(BrokerError::InvalidSymbol("DOGE/USD".into()));

        let request = OrderRequest::market("DOGE/USD", Side::Buy, dec!(1));
        assert!(broker.submit_market_order(request.clone()).await.is_err());
        assert!(broker.submit_market_order(request).await.is_ok());
    }

    #[tokio::test]
    async fn test_blocked_account() {
        let broker = PaperBroker::new(dec!(1000));
        broker.set_blocked(true);

        assert!(broker.get_account().await.unwrap().blocked);
        let err = broker
            .submit_market_order(OrderRequest::market("BTC/USD", Side::Buy, dec!(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, BrokerError::AccountRestricted(_)));
    }

    #[tokio::test]
    async fn test_seeded_position() {
        let broker = PaperBroker::new(Decimal::ZERO).with_position("LINK/USD", dec!(12.5));
        assert_eq!(broker.position_quantity("LINK/USD"), dec!(12.5));
        assert!(broker.get_open_position("BTC/USD").await.unwrap().is_none());
    }
}
