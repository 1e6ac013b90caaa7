//! Brokerage credentials and trading mode.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ConfigError;

pub const PAPER_KEY_VAR: &str = "alpaca_paper_key";
pub const PAPER_SECRET_VAR: &str = "alpaca_paper_secret";
pub const LIVE_KEY_VAR: &str = "alpaca_live_key";
pub const LIVE_SECRET_VAR: &str = "alpaca_live_secret";
pub const ACCESS_TOKEN_VAR: &str = "access_token";

/// Paper or live trading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TradingMode {
    #[default]
    Paper,
    Live,
}

impl TradingMode {
    pub fn is_live(&self) -> bool {
        matches!(self, TradingMode::Live)
    }
}

impl fmt::Display for TradingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradingMode::Paper => write!(f, "paper"),
            TradingMode::Live => write!(f, "live"),
        }
    }
}

impl FromStr for TradingMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "paper" => Ok(TradingMode::Paper),
            "live" => Ok(TradingMode::Live),
            other => Err(ConfigError::Invalid(format!("Unknown trading mode: {}", other))),
        }
    }
}

/// Brokerage credentials.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// API key pair
    ApiKey { key: String, secret: String },
    /// OAuth access token (live only)
    OAuth { access_token: String },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::ApiKey { .. } => write!(f, "ApiKey(***)"),
            Credentials::OAuth { .. } => write!(f, "OAuth(***)"),
        }
    }
}

impl Credentials {
    /// Read credentials for `mode` from the process environment.
    ///
    /// A `.env` file in the working directory is loaded first when present.
    pub fn from_env(mode: TradingMode) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(mode, |name| std::env::var(name).ok())
    }

    /// Resolve credentials through an arbitrary variable lookup.
    ///
    /// Paper uses the paper key pair. Live prefers an OAuth access token and
    /// falls back to the live key pair.
    pub fn from_lookup<F>(mode: TradingMode, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingCredential(name.to_string()))
        };

        match mode {
            TradingMode::Paper => Ok(Credentials::ApiKey {
                key: require(PAPER_KEY_VAR)?,
                secret: require(PAPER_SECRET_VAR)?,
            }),
            TradingMode::Live => match require(ACCESS_TOKEN_VAR) {
                Ok(access_token) => Ok(Credentials::OAuth { access_token }),
                Err(_) => Ok(Credentials::ApiKey {
                    key: require(LIVE_KEY_VAR)?,
                    secret: require(LIVE_SECRET_VAR)?,
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_paper_uses_paper_keys() {
        let creds = Credentials::from_lookup(
            TradingMode::Paper,
            lookup(&[
                ("alpaca_paper_key", "PK1"),
                ("alpaca_paper_secret", "PS1"),
                ("access_token", "tok"),
            ]),
        )
        .unwrap();
        assert_eq!(
            creds,
            Credentials::ApiKey {
                key: "PK1".into(),
                secret: "PS1".into()
            }
        );
    }

    #[test]
    fn test_live_prefers_access_token() {
        let creds = Credentials::from_lookup(
            TradingMode::Live,
            lookup(&[
                ("access_token", "tok"),
                ("alpaca_live_key", "AK"),
                ("alpaca_live_secret", "AS"),
            ]),
        )
        .unwrap();
        assert_eq!(
            creds,
            Credentials::OAuth {
                access_token: "tok".into()
            }
        );
    }

    #[test]
    fn test_live_falls_back_to_key_pair() {
        let creds = Credentials::from_lookup(
            TradingMode::Live,
            lookup(&[("alpaca_live_key", "AK"), ("alpaca_live_secret", "AS")]),
        )
        .unwrap();
        assert!(matches!(creds, Credentials::ApiKey { .. }));
    }

    #[test]
    fn test_missing_credential_is_named() {
        let err = Credentials::from_lookup(
            TradingMode::Paper,
            lookup(&[("alpaca_paper_key", "PK1"), ("alpaca_paper_secret", " ")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential(ref name) if name == "alpaca_paper_secret"));

        let err = Credentials::from_lookup(TradingMode::Live, lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential(ref name) if name == "alpaca_live_key"));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let creds = Credentials::ApiKey {
            key: "PK1".into(),
            secret: "PS1".into(),
        };
        assert_eq!(format!("{:?}", creds), "ApiKey(***)");
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("LIVE".parse::<TradingMode>().unwrap(), TradingMode::Live);
        assert_eq!("paper".parse::<TradingMode>().unwrap(), TradingMode::Paper);
        assert!("demo".parse::<TradingMode>().is_err());
        assert_eq!(TradingMode::Live.to_string(), "live");
    }
}
