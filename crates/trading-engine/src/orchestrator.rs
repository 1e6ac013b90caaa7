//! One trading cycle over the symbol universe.
//!
//! For every symbol the orchestrator fetches prices, runs the strategy,
//! sizes an order against the current account and submits it. Symbols are
//! handled one after another; a symbol whose prices cannot be fetched is
//! skipped. A rejected order clears the stop flag, but the cycle still
//! finishes the remaining symbols before the failure is returned.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use trading_core::error::{DataError, IndicatorError, TradingError};
use trading_core::traits::{Broker, DataSource};
use trading_core::types::{AccountSnapshot, HistoryPeriod, Side, Signal, SymbolConfig};
use trading_risk::OrderSizer;
use trading_strategies::{Analysis, RsiMacdStrategy};

use crate::report::{CycleReport, SymbolOutcome, SymbolReport};

/// Orchestrator settings.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Pause after each accepted order
    pub pacing_delay: Duration,
    /// Look-back requested for indicator history
    pub history_period: HistoryPeriod,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            pacing_delay: Duration::from_secs(5),
            history_period: HistoryPeriod::Max,
        }
    }
}

/// Lifetime counters and the stop flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotState {
    /// Cleared for good once an order fails
    pub trading: bool,
    /// Completed cycles
    pub cycles: u32,
    /// Orders accepted by the broker
    pub orders_placed: u32,
}

impl Default for BotState {
    fn default() -> Self {
        Self {
            trading: true,
            cycles: 0,
            orders_placed: 0,
        }
    }
}

/// Runs trading cycles against injected gateways.
pub struct TradeOrchestrator<B, D> {
    broker: B,
    data: D,
    symbols: Vec<SymbolConfig>,
    strategy: RsiMacdStrategy,
    sizer: OrderSizer,
    config: OrchestratorConfig,
    state: BotState,
}

impl<B: Broker, D: DataSource> TradeOrchestrator<B, D> {
    /// Create a new orchestrator.
    pub fn new(
        broker: B,
        data: D,
        symbols: Vec<SymbolConfig>,
        strategy: RsiMacdStrategy,
        sizer: OrderSizer,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            broker,
            data,
            symbols,
            strategy,
            sizer,
            config,
            state: BotState::default(),
        }
    }

    pub fn state(&self) -> BotState {
        self.state
    }

    pub fn is_trading(&self) -> bool {
        self.state.trading
    }

    /// Clear the stop flag; every later cycle is refused.
    pub fn stop(&mut self) {
        self.state.trading = false;
    }

    pub fn symbols(&self) -> &[SymbolConfig] {
        &self.symbols
    }

    /// Fetch history for one symbol and run the strategy over it.
    ///
    /// The outer error is a data failure; the inner one means the history is
    /// too short for the indicators.
    pub async fn analyze(
        &self,
        symbol: &SymbolConfig,
    ) -> Result<Result<Analysis, IndicatorError>, DataError> {
        let history = self
            .data
            .get_price_history(&symbol.symbol, self.config.history_period)
            .await?;
        Ok(self.strategy.analyze(&history))
    }

    /// Run one cycle over every symbol.
    ///
    /// An order failure does not cut the cycle short. The first failure is
    /// returned once every symbol has been processed, and later calls are
    /// refused with [`TradingError::Halted`].
    pub async fn trade(&mut self) -> Result<CycleReport, TradingError> {
        if !self.state.trading {
            return Err(TradingError::Halted);
        }

        debug!(
            "Starting cycle {} with {} via {}",
            self.state.cycles + 1,
            self.broker.name(),
            self.data.name()
        );

        let mut report = CycleReport::start();
        let mut account = self.fetch_account().await?;
        let mut failure = None;

        for symbol in &self.symbols {
            let outcome = self.process_symbol(symbol, &account, &mut failure).await;
            let ordered = outcome.is_order();
            if outcome.is_failure() {
                self.state.trading = false;
            }
            report.outcomes.push(outcome);

            if ordered {
                self.state.orders_placed += 1;
                if !self.config.pacing_delay.is_zero() {
                    tokio::time::sleep(self.config.pacing_delay).await;
                }
                // Cash moved; size the next order against fresh numbers
                account = self.fetch_account().await?;
            }
        }

        let report = report.finish();
        if let Some(err) = failure {
            warn!("{}", report.headline());
            return Err(err);
        }

        self.state.cycles += 1;
        Ok(report)
    }

    async fn fetch_account(&self) -> Result<AccountSnapshot, TradingError> {
        let account = self.broker.get_account().await.map_err(|e| {
            error!("Failed to fetch account: {}", e);
            TradingError::Broker(e)
        })?;

        if account.blocked {
            error!("{}", TradingError::AccountBlocked);
            return Err(TradingError::AccountBlocked);
        }
        Ok(account)
    }

    /// Handle one symbol. A rejected order is recorded in the report and
    /// its error stored in `failure`, keeping the first one seen.
    async fn process_symbol(
        &self,
        symbol: &SymbolConfig,
        account: &AccountSnapshot,
        failure: &mut Option<TradingError>,
    ) -> SymbolReport {
        let label = symbol.label();

        let last_close = match self.data.get_latest_close(&symbol.symbol).await {
            Ok(price) => price,
            Err(e) => {
                error!("Failed to fetch price for {}: {}", label, e);
                return SymbolReport::unavailable(&symbol.symbol, e);
            }
        };

        let analysis = match self.analyze(symbol).await {
            Ok(Ok(analysis)) => Some(analysis),
            Ok(Err(e)) => {
                warn!("Holding {}: {}", label, e);
                None
            }
            Err(e) => {
                error!("Failed to fetch history for {}: {}", label, e);
                return SymbolReport::unavailable(&symbol.symbol, e);
            }
        };

        let mut report = SymbolReport {
            symbol: symbol.symbol.clone(),
            last_close: Some(last_close),
            analysis,
            outcome: SymbolOutcome::Hold {
                insufficient_data: analysis.is_none(),
            },
        };

        let signal = report.signal();
        if let Some(a) = &analysis {
            debug!(
                "{}: close {:.2}, RSI {:.2}, MACD {:.4}/{:.4} -> {}",
                label, last_close, a.rsi, a.macd.macd, a.macd.signal, signal
            );
        }
        if !signal.is_actionable() {
            return report;
        }

        let position = if signal == Signal::Sell {
            match self.broker.get_open_position(&symbol.symbol).await {
                Ok(position) => position,
                Err(e) => {
                    error!("Failed to fetch position for {}: {}", label, e);
                    report.outcome = SymbolOutcome::Skipped {
                        signal,
                        reason: format!("position lookup failed: {}", e),
                    };
                    return report;
                }
            }
        } else {
            None
        };

        let Some(request) =
            self.sizer
                .size(signal, symbol, account, position.as_ref(), last_close)
        else {
            let reason = match (signal, &position) {
                (Signal::Sell, None) => "no open position",
                _ => "below minimum quantity",
            };
            debug!("{} {} skipped: {}", signal, label, reason);
            report.outcome = SymbolOutcome::Skipped {
                signal,
                reason: reason.to_string(),
            };
            return report;
        };

        let side = request.side;
        let quantity = request.quantity;
        match self.broker.submit_market_order(request).await {
            Ok(confirmation) => {
                let verb = match side {
                    Side::Buy => "Bought",
                    Side::Sell => "Sold",
                };
                info!("{} {} {}.", verb, quantity, symbol.name);
                report.outcome = SymbolOutcome::ordered(&confirmation);
            }
            Err(source) => {
                let err = TradingError::OrderSubmission {
                    symbol: symbol.symbol.clone(),
                    side,
                    source,
                };
                error!("{}", err);
                report.outcome = SymbolOutcome::Failed {
                    side,
                    quantity,
                    reason: err.to_string(),
                };
                if failure.is_none() {
                    *failure = Some(err);
                }
            }
        }
        report
    }
}
