//! Trading cycle reports.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use trading_core::types::{OrderConfirmation, OrderStatus, Side, Signal};
use trading_strategies::Analysis;

/// What happened to one symbol during a cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SymbolOutcome {
    /// Prices could not be fetched; the symbol was skipped
    Unavailable { reason: String },
    /// Nothing to do
    Hold { insufficient_data: bool },
    /// An actionable signal that produced no order
    Skipped { signal: Signal, reason: String },
    /// An order was accepted by the broker
    Ordered {
        order_id: String,
        side: Side,
        quantity: Decimal,
        status: OrderStatus,
    },
    /// The broker refused the order; trading stops after this cycle
    Failed {
        side: Side,
        quantity: Decimal,
        reason: String,
    },
}

/// Per-symbol result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolReport {
    pub symbol: String,
    pub last_close: Option<f64>,
    pub analysis: Option<Analysis>,
    #[serde(flatten)]
    pub outcome: SymbolOutcome,
}

impl SymbolReport {
    pub(crate) fn unavailable(symbol: &str, reason: impl ToString) -> Self {
        Self {
            symbol: symbol.to_string(),
            last_close: None,
            analysis: None,
            outcome: SymbolOutcome::Unavailable {
                reason: reason.to_string(),
            },
        }
    }

    /// Signal acted on, HOLD when none could be computed.
    pub fn signal(&self) -> Signal {
        self.analysis.map(|a| a.signal).unwrap_or_default()
    }

    pub fn is_order(&self) -> bool {
        matches!(self.outcome, SymbolOutcome::Ordered { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, SymbolOutcome::Failed { .. })
    }
}

/// Result of one pass over the symbol universe.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<SymbolReport>,
}

impl CycleReport {
    pub(crate) fn start() -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            outcomes: Vec::new(),
        }
    }

    pub(crate) fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }

    /// Orders placed during the cycle.
    pub fn orders(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_order()).count()
    }

    /// Symbols that were skipped for lack of prices.
    pub fn unavailable(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.outcome, SymbolOutcome::Unavailable { .. }))
            .count()
    }

    /// Orders the broker refused.
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    /// Report for a single symbol.
    pub fn get(&self, symbol: &str) -> Option<&SymbolReport> {
        self.outcomes.iter().find(|o| o.symbol == symbol)
    }

    /// One-line summary for logs.
    pub fn headline(&self) -> String {
        let mut line = format!(
            "Cycle complete: {} symbols, {} orders, {} unavailable",
            self.outcomes.len(),
            self.orders(),
            self.unavailable()
        );
        let failures = self.failures();
        if failures > 0 {
            line.push_str(&format!(", {} failed", failures));
        }
        line
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str(&format!(
            "  TRADING CYCLE  {}\n",
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("  SYMBOL       CLOSE        RSI   TREND  SIGNAL  RESULT\n");
        s.push_str("───────────────────────────────────────────────────────────\n");

        for report in &self.outcomes {
            let close = report
                .last_close
                .map(|c| format!("{:.2}", c))
                .unwrap_or_else(|| "-".to_string());
            let (rsi, trend) = match &report.analysis {
                Some(a) => (format!("{:.1}", a.rsi), format!("{:?}", a.trend)),
                None => ("-".to_string(), "-".to_string()),
            };
            let result = match &report.outcome {
                SymbolOutcome::Unavailable { reason } => format!("unavailable ({})", reason),
                SymbolOutcome::Hold {
                    insufficient_data: true,
                } => "hold (not enough history)".to_string(),
                SymbolOutcome::Hold { .. } => "hold".to_string(),
                SymbolOutcome::Skipped { reason, .. } => format!("skipped ({})", reason),
                SymbolOutcome::Ordered { side, quantity, .. } => {
                    format!("{} {}", side, quantity)
                }
                SymbolOutcome::Failed { side, quantity, .. } => {
                    format!("{} {} failed", side, quantity)
                }
            };
            s.push_str(&format!(
                "  {:<10} {:>10} {:>6} {:>7} {:>7}  {}\n",
                report.symbol,
                close,
                rsi,
                trend,
                report.signal().to_string(),
                result
            ));
        }

        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  {}\n", self.headline()));
        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl SymbolOutcome {
    pub(crate) fn ordered(confirmation: &OrderConfirmation) -> Self {
        SymbolOutcome::Ordered {
            order_id: confirmation.id.clone(),
            side: confirmation.side,
            quantity: confirmation.quantity,
            status: confirmation.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use trading_core::types::Trend;
    use trading_indicators::MacdOutput;

    fn sample() -> CycleReport {
        let mut report = CycleReport::start();
        report.outcomes.push(SymbolReport {
            symbol: "BTC/USD".into(),
            last_close: Some(124.0),
            analysis: Some(Analysis {
                rsi: 28.4,
                macd: MacdOutput {
                    macd: -1.2,
                    signal: -1.5,
                    histogram: 0.3,
                },
                trend: Trend::Up,
                signal: Signal::Buy,
                last_close: 124.0,
            }),
            outcome: SymbolOutcome::Ordered {
                order_id: "abc".into(),
                side: Side::Buy,
                quantity: dec!(3.91),
                status: OrderStatus::Accepted,
            },
        });
        report
            .outcomes
            .push(SymbolReport::unavailable("DOGE/USD", "Symbol not found"));
        report.finish()
    }

    #[test]
    fn test_counts() {
        let report = sample();
        assert_eq!(report.orders(), 1);
        assert_eq!(report.unavailable(), 1);
        assert_eq!(report.get("DOGE/USD").unwrap().signal(), Signal::Hold);
        assert_eq!(
            report.headline(),
            "Cycle complete: 2 symbols, 1 orders, 1 unavailable"
        );
    }

    #[test]
    fn test_summary_lists_every_symbol() {
        let summary = sample().summary();
        assert!(summary.contains("BTC/USD"));
        assert!(summary.contains("BUY 3.91"));
        assert!(summary.contains("unavailable (Symbol not found)"));
    }

    #[test]
    fn test_failed_order_is_counted() {
        let mut report = sample();
        report.outcomes.push(SymbolReport {
            symbol: "ETH/USD".into(),
            last_close: Some(124.0),
            analysis: None,
            outcome: SymbolOutcome::Failed {
                side: Side::Buy,
                quantity: dec!(2.01),
                reason: "Insufficient funds".into(),
            },
        });

        assert_eq!(report.orders(), 1);
        assert_eq!(report.failures(), 1);
        assert!(report.headline().ends_with(", 1 failed"));
        assert!(report.summary().contains("BUY 2.01 failed"));
    }

    #[test]
    fn test_json_export() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let first = &value["outcomes"][0];
        assert_eq!(first["symbol"], "BTC/USD");
        assert_eq!(first["outcome"], "ordered");
        assert_eq!(first["side"], "buy");
        assert_eq!(value["outcomes"][1]["outcome"], "unavailable");
    }
}
