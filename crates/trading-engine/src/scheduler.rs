//! Outer trading loop.

use std::time::Duration;

use chrono::{Local, NaiveTime};
use tokio::time::sleep;
use tracing::{debug, error, info};
use trading_core::error::TradingError;
use trading_core::traits::{Broker, DataSource};

use crate::orchestrator::TradeOrchestrator;

/// When and how often cycles run.
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Local time the window opens
    pub window_start: NaiveTime,
    /// Local time the window closes, inclusive
    pub window_end: NaiveTime,
    /// Sleep while outside the window
    pub idle_sleep: Duration,
    /// Sleep after a completed cycle
    pub cycle_sleep: Duration,
    /// Give up after this many cycles without a single order
    pub max_idle_cycles: u32,
    /// Sleep before retrying a failed cycle
    pub retry_cooldown: Duration,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            window_start: NaiveTime::from_hms_opt(8, 30, 0).unwrap_or_default(),
            window_end: NaiveTime::from_hms_opt(9, 20, 0).unwrap_or_default(),
            idle_sleep: Duration::from_secs(30 * 60),
            cycle_sleep: Duration::from_secs(60 * 60),
            max_idle_cycles: 365,
            retry_cooldown: Duration::from_secs(15 * 60),
        }
    }
}

impl ScheduleConfig {
    /// Check if `time` falls inside the trading window.
    pub fn in_window(&self, time: NaiveTime) -> bool {
        time >= self.window_start && time <= self.window_end
    }

    /// Check if the bot has gone too long without trading.
    pub fn should_stop(&self, cycles: u32, orders_placed: u32) -> bool {
        orders_placed == 0 && cycles >= self.max_idle_cycles
    }
}

/// Why the loop ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No order in `cycles` cycles
    Idle { cycles: u32 },
    /// The stop flag was cleared
    Stopped,
}

type Clock = Box<dyn Fn() -> NaiveTime + Send + Sync>;

/// Drives an orchestrator on a daily window.
pub struct Scheduler<B, D> {
    orchestrator: TradeOrchestrator<B, D>,
    config: ScheduleConfig,
    clock: Clock,
}

impl<B: Broker, D: DataSource> Scheduler<B, D> {
    /// Create a scheduler on the local wall clock.
    pub fn new(orchestrator: TradeOrchestrator<B, D>, config: ScheduleConfig) -> Self {
        Self {
            orchestrator,
            config,
            clock: Box::new(|| Local::now().time()),
        }
    }

    /// Replace the wall clock.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> NaiveTime + Send + Sync + 'static,
    {
        self.clock = Box::new(clock);
        self
    }

    pub fn orchestrator(&self) -> &TradeOrchestrator<B, D> {
        &self.orchestrator
    }

    /// Loop until the idle cutoff or a fatal error.
    ///
    /// A blocked account or an unreachable broker only costs a cooldown; a
    /// failed order ends the loop with that error.
    pub async fn run(&mut self) -> Result<StopReason, TradingError> {
        info!(
            "Trading window {}-{}, {} symbols",
            self.config.window_start.format("%H:%M"),
            self.config.window_end.format("%H:%M"),
            self.orchestrator.symbols().len()
        );

        while self.orchestrator.is_trading() {
            let now = (self.clock)();
            if !self.config.in_window(now) {
                debug!("Outside trading window at {}", now.format("%H:%M:%S"));
                sleep(self.config.idle_sleep).await;
                continue;
            }

            match self.orchestrator.trade().await {
                Ok(report) => info!("{}", report.headline()),
                Err(err) if err.is_fatal() => {
                    error!("Stopping: {}", err);
                    return Err(err);
                }
                Err(err) => {
                    error!(
                        "Cycle failed: {}; retrying in {} min",
                        err,
                        self.config.retry_cooldown.as_secs() / 60
                    );
                    sleep(self.config.retry_cooldown).await;
                    continue;
                }
            }

            let state = self.orchestrator.state();
            if self.config.should_stop(state.cycles, state.orders_placed) {
                info!("No trades in {} cycles, stopping", state.cycles);
                return Ok(StopReason::Idle {
                    cycles: state.cycles,
                });
            }

            sleep(self.config.cycle_sleep).await;
        }

        Ok(StopReason::Stopped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_in_window_is_inclusive() {
        let config = ScheduleConfig::default();
        assert!(!config.in_window(time(8, 29)));
        assert!(config.in_window(time(8, 30)));
        assert!(config.in_window(time(9, 0)));
        assert!(config.in_window(time(9, 20)));
        assert!(!config.in_window(time(9, 21)));
        assert!(!config.in_window(time(20, 0)));
    }

    #[test]
    fn test_should_stop_only_without_orders() {
        let config = ScheduleConfig::default();
        assert!(!config.should_stop(364, 0));
        assert!(config.should_stop(365, 0));
        assert!(config.should_stop(400, 0));
        assert!(!config.should_stop(365, 1));
        assert!(!config.should_stop(1000, 3));
    }
}
