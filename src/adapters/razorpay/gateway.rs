//! Razorpay order API client.
//!
//! Creates orders through `POST /v1/orders` with HTTP basic auth (key id and
//! key secret). Transient failures (network errors, 429, 5xx) are retried
//! with exponential backoff: 1s, 2s, 4s, ... up to `max_attempts` in total.
//!
//! # Configuration
//!
//! ```ignore
//! let config = RazorpayConfig::new("rzp_live_xxx", SecretString::new(secret));
//! let gateway = RazorpayGateway::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{CreateOrderRequest, GatewayError, GatewayErrorCode, GatewayOrder, PaymentGateway};

const DEFAULT_API_BASE_URL: &str = "https://api.razorpay.com";

/// Razorpay API configuration.
#[derive(Clone)]
pub struct RazorpayConfig {
    key_id: String,
    key_secret: SecretString,
    api_base_url: String,
    max_attempts: u32,
    initial_backoff: Duration,
    request_timeout: Duration,
}

impl RazorpayConfig {
    pub fn new(key_id: impl Into<String>, key_secret: SecretString) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
            request_timeout: Duration::from_secs(15),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// First retry delay; each later retry doubles it.
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }
}

impl std::fmt::Debug for RazorpayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayConfig")
            .field("key_id", &self.key_id)
            .field("api_base_url", &self.api_base_url)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct OrderBody<'a> {
    amount: i64,
    currency: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    receipt: Option<&'a str>,
    payment_capture: u8,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
    amount: i64,
    currency: String,
    status: String,
}

pub struct RazorpayGateway {
    config: RazorpayConfig,
    http_client: reqwest::Client,
}

impl RazorpayGateway {
    pub fn new(config: RazorpayConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_default();
        Self { config, http_client }
    }

    async fn send_once(&self, request: &CreateOrderRequest) -> Result<GatewayOrder, GatewayError> {
        let body = OrderBody {
            amount: request.amount.paise(),
            currency: &request.currency,
            receipt: request.receipt.as_deref(),
            payment_capture: 1,
        };

        let response = self
            .http_client
            .post(format!("{}/v1/orders", self.config.api_base_url))
            .basic_auth(&self.config.key_id, Some(self.config.key_secret.expose_secret()))
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::network(format!("Razorpay request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let code = match status.as_u16() {
                401 | 403 => GatewayErrorCode::AuthenticationError,
                429 => GatewayErrorCode::RateLimitExceeded,
                400..=499 => GatewayErrorCode::InvalidRequest,
                _ => GatewayErrorCode::ProviderError,
            };
            return Err(GatewayError::new(
                code,
                format!("Razorpay API error ({}): {}", status, error_text),
            ));
        }

        let order: OrderResponse = response.json().await.map_err(|e| {
            GatewayError::new(
                GatewayErrorCode::ProviderError,
                format!("Failed to parse Razorpay response: {}", e),
            )
        })?;

        Ok(GatewayOrder {
            id: order.id,
            amount: order.amount,
            currency: order.currency,
            status: order.status,
        })
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<GatewayOrder, GatewayError> {
        let mut attempt = 1;
        loop {
            match self.send_once(request).await {
                Ok(order) => {
                    tracing::info!(gateway_order_id = %order.id, amount = order.amount, attempt, "Gateway order created");
                    return Ok(order);
                }
                Err(err) if !err.retryable => return Err(err),
                Err(err) if attempt >= self.config.max_attempts => {
                    tracing::error!(attempts = attempt, error = %err, "Gateway order creation exhausted retries");
                    return Err(GatewayError::exhausted(attempt, &err));
                }
                Err(err) => {
                    let delay = self.config.initial_backoff * (1 << (attempt - 1));
                    tracing::warn!(attempt, delay_ms = delay.as_millis() as u64, error = %err, "Gateway order creation failed, retrying");
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
