//! Alpaca broker integration for paper and live trading.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{header, Client, Response, StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use trading_core::error::BrokerError;
use trading_core::traits::Broker;
use trading_core::types::{
    AccountSnapshot, OrderConfirmation, OrderRequest, OrderStatus, Position, Side,
};
use tracing::debug;
use uuid::Uuid;

const PAPER_URL: &str = "https://paper-api.alpaca.markets";
const LIVE_URL: &str = "https://api.alpaca.markets";

/// How requests are authenticated.
#[derive(Clone)]
pub enum AlpacaAuth {
    /// Key pair sent as `APCA-API-KEY-ID` / `APCA-API-SECRET-KEY`
    ApiKey { key: String, secret: String },
    /// OAuth access token sent as a bearer token
    OAuth { access_token: String },
}

impl std::fmt::Debug for AlpacaAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlpacaAuth::ApiKey { .. } => write!(f, "ApiKey(***)"),
            AlpacaAuth::OAuth { .. } => write!(f, "OAuth(***)"),
        }
    }
}

/// Alpaca API configuration.
#[derive(Debug, Clone)]
pub struct AlpacaConfig {
    pub auth: AlpacaAuth,
    pub paper: bool,
    /// Overrides the paper/live endpoint
    pub base_url: Option<String>,
    pub timeout: Duration,
}

impl AlpacaConfig {
    /// Paper trading with an API key pair.
    pub fn paper(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            auth: AlpacaAuth::ApiKey {
                key: key.into(),
                secret: secret.into(),
            },
            paper: true,
            base_url: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Live trading with the given credentials.
    pub fn live(auth: AlpacaAuth) -> Self {
        Self {
            auth,
            paper: false,
            base_url: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Point the client at a different host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn base_url(&self) -> &str {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/'),
            None if self.paper => PAPER_URL,
            None => LIVE_URL,
        }
    }

    fn headers(&self) -> Result<header::HeaderMap, BrokerError> {
        let value = |raw: &str| {
            header::HeaderValue::from_str(raw)
                .map_err(|e| BrokerError::Configuration(e.to_string()))
        };

        let mut headers = header::HeaderMap::new();
        match &self.auth {
            AlpacaAuth::ApiKey { key, secret } => {
                headers.insert("APCA-API-KEY-ID", value(key)?);
                headers.insert("APCA-API-SECRET-KEY", value(secret)?);
            }
            AlpacaAuth::OAuth { access_token } => {
                headers.insert(
                    header::AUTHORIZATION,
                    value(&format!("Bearer {}", access_token))?,
                );
            }
        }
        Ok(headers)
    }
}

#[derive(Debug, Deserialize)]
struct AlpacaAccount {
    cash: String,
    #[serde(default)]
    account_blocked: bool,
}

#[derive(Debug, Deserialize)]
struct AlpacaPosition {
    symbol: String,
    qty: String,
    qty_available: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlpacaOrder {
    id: String,
    client_order_id: String,
    status: String,
    symbol: String,
    qty: Option<String>,
    #[serde(default)]
    filled_qty: Option<String>,
    side: String,
    submitted_at: Option<String>,
    created_at: String,
}

#[derive(Debug, Serialize)]
struct CreateOrderRequest {
    symbol: String,
    qty: String,
    side: &'static str,
    #[serde(rename = "type")]
    order_type: &'static str,
    time_in_force: &'static str,
    client_order_id: String,
}

#[derive(Debug, Deserialize)]
struct AlpacaErrorBody {
    message: String,
}

/// Alpaca broker client.
pub struct AlpacaBroker {
    config: AlpacaConfig,
    client: Client,
}

impl AlpacaBroker {
    /// Create a new Alpaca broker client.
    pub fn new(config: AlpacaConfig) -> Result<Self, BrokerError> {
        let client = Client::builder()
            .default_headers(config.headers()?)
            .timeout(config.timeout)
            .build()
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn is_paper(&self) -> bool {
        self.config.paper
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url(), path)
    }
}

/// Positions are addressed without the pair separator (`BTC/USD` -> `BTCUSD`).
fn position_symbol(symbol: &str) -> String {
    symbol.replace('/', "")
}

/// Quantities go over the wire truncated to two decimals.
fn format_quantity(quantity: Decimal) -> String {
    format!("{:.2}", quantity.trunc_with_scale(2))
}

fn parse_decimal(field: &str, raw: &str) -> Result<Decimal, BrokerError> {
    raw.parse()
        .map_err(|_| BrokerError::Api(format!("Invalid {}: {:?}", field, raw)))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_account(account: AlpacaAccount) -> Result<AccountSnapshot, BrokerError> {
    Ok(AccountSnapshot {
        cash: parse_decimal("cash", &account.cash)?,
        blocked: account.account_blocked,
    })
}

fn parse_position(position: AlpacaPosition) -> Result<Position, BrokerError> {
    // Older payloads only carry qty
    let available = position.qty_available.as_deref().unwrap_or(&position.qty);
    Ok(Position::new(
        position.symbol,
        parse_decimal("qty_available", available)?,
    ))
}

fn parse_order(order: AlpacaOrder) -> Result<OrderConfirmation, BrokerError> {
    let side = match order.side.as_str() {
        "buy" => Side::Buy,
        "sell" => Side::Sell,
        other => return Err(BrokerError::Api(format!("Unknown side: {}", other))),
    };

    let quantity = match order.qty.as_deref() {
        Some(qty) => parse_decimal("qty", qty)?,
        None => Decimal::ZERO,
    };
    let filled_quantity = match order.filled_qty.as_deref() {
        Some(qty) => parse_decimal("filled_qty", qty)?,
        None => Decimal::ZERO,
    };

    let submitted_at = order
        .submitted_at
        .as_deref()
        .and_then(parse_timestamp)
        .or_else(|| parse_timestamp(&order.created_at))
        .unwrap_or_else(Utc::now);

    Ok(OrderConfirmation {
        id: order.id,
        client_order_id: order.client_order_id,
        symbol: order.symbol,
        side,
        quantity,
        filled_quantity,
        status: OrderStatus::from_wire(&order.status),
        submitted_at,
    })
}

/// Map an unsuccessful response onto a broker error.
fn map_error(status: StatusCode, body: &str) -> BrokerError {
    let message = serde_json::from_str::<AlpacaErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.to_string());
    let detail = format!("{}: {}", status.as_u16(), message);
    let lower = message.to_lowercase();

    match status {
        StatusCode::UNAUTHORIZED => BrokerError::Authentication(detail),
        StatusCode::FORBIDDEN if lower.contains("insufficient") => {
            BrokerError::InsufficientFunds(detail)
        }
        StatusCode::FORBIDDEN => BrokerError::AccountRestricted(detail),
        StatusCode::UNPROCESSABLE_ENTITY | StatusCode::NOT_FOUND
            if lower.contains("symbol") || lower.contains("asset") =>
        {
            BrokerError::InvalidSymbol(detail)
        }
        StatusCode::UNPROCESSABLE_ENTITY => BrokerError::OrderRejected(detail),
        StatusCode::TOO_MANY_REQUESTS => BrokerError::RateLimited(detail),
        _ => BrokerError::Api(detail),
    }
}

async fn check(resp: Response) -> Result<Response, BrokerError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    Err(map_error(status, &text))
}

#[async_trait]
impl Broker for AlpacaBroker {
    async fn get_account(&self) -> Result<AccountSnapshot, BrokerError> {
        let resp = self
            .client
            .get(self.url("/v2/account"))
            .send()
            .await
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        let account: AlpacaAccount = check(resp)
            .await?
            .json()
            .await
            .map_err(|e| BrokerError::Api(e.to_string()))?;

        parse_account(account)
    }

    async fn get_open_position(&self, symbol: &str) -> Result<Option<Position>, BrokerError> {
        let url = self.url(&format!("/v2/positions/{}", position_symbol(symbol)));
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        if resp.status() == StatusCode::NOT_FOUND {
            debug!("No open position for {}", symbol);
            return Ok(None);
        }

        let position: AlpacaPosition = check(resp)
            .await?
            .json()
            .await
            .map_err(|e| BrokerError::Api(e.to_string()))?;

        parse_position(position).map(Some)
    }

    async fn submit_market_order(
        &self,
        request: OrderRequest,
    ) -> Result<OrderConfirmation, BrokerError> {
        let create_req = CreateOrderRequest {
            symbol: request.symbol.clone(),
            qty: format_quantity(request.quantity),
            side: request.side.as_str(),
            order_type: "market",
            time_in_force: request.time_in_force.as_str(),
            client_order_id: Uuid::new_v4().to_string(),
        };

        debug!("Submitting order: {:?}", create_req);

        let resp = self
            .client
            .post(self.url("/v2/orders"))
            .json(&create_req)
            .send()
            .await
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        let order: AlpacaOrder = check(resp)
            .await?
            .json()
            .await
            .map_err(|e| BrokerError::Api(e.to_string()))?;

        debug!(
            "Order submitted: {} {} {} ({})",
            order.side,
            order.qty.as_deref().unwrap_or("?"),
            order.symbol,
            order.status
        );
        parse_order(order)
    }

    fn name(&self) -> &str {
        if self.config.paper {
            "Alpaca Paper"
        } else {
            "Alpaca Live"
        }
    }
}
