//! Look-back periods for price history requests.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How much daily history to request from a data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HistoryPeriod {
    /// The current day only
    #[serde(rename = "1d")]
    Day,
    /// One month
    #[serde(rename = "1mo")]
    Month,
    /// One year
    #[serde(rename = "1y")]
    Year,
    /// Everything the source has
    #[serde(rename = "max")]
    #[default]
    Max,
}

impl HistoryPeriod {
    /// Range parameter understood by chart-style market data APIs.
    pub fn as_range(&self) -> &'static str {
        match self {
            HistoryPeriod::Day => "1d",
            HistoryPeriod::Month => "1mo",
            HistoryPeriod::Year => "1y",
            HistoryPeriod::Max => "max",
        }
    }
}

impl fmt::Display for HistoryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_range())
    }
}

impl FromStr for HistoryPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1d" | "day" => Ok(HistoryPeriod::Day),
            "1mo" | "month" => Ok(HistoryPeriod::Month),
            "1y" | "year" => Ok(HistoryPeriod::Year),
            "max" | "all" => Ok(HistoryPeriod::Max),
            _ => Err(format!("Invalid history period: {}", s)),
        }
    }
}
