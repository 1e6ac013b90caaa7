//! Trading cycle orchestration and scheduling.

mod orchestrator;
mod report;
mod scheduler;

pub use orchestrator::{BotState, OrchestratorConfig, TradeOrchestrator};
pub use report::{CycleReport, SymbolOutcome, SymbolReport};
pub use scheduler::{ScheduleConfig, Scheduler, StopReason};
