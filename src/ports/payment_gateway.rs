//! Payment gateway port.
//!
//! The gateway issues an order for a total amount; the customer pays it in
//! the browser and the gateway's callback is verified separately by
//! signature.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, Money};

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an order for the given amount.
    ///
    /// Implementations may retry transient failures internally.
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<GatewayOrder, GatewayError>;
}

/// Request to create a gateway order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub amount: Money,
    /// ISO currency code, e.g. `INR`.
    pub currency: String,
    /// Merchant reference shown in the gateway dashboard.
    pub receipt: Option<String>,
}

/// Order as returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    /// Amount in the smallest currency unit.
    pub amount: i64,
    pub currency: String,
    pub status: String,
}

/// Errors from gateway operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayError {
    pub code: GatewayErrorCode,
    pub message: String,
    pub retryable: bool,
}

impl GatewayError {
    pub fn new(code: GatewayErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: code.is_retryable(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::NetworkError, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::AuthenticationError, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::InvalidRequest, message)
    }

    /// Retries were used up on a retryable failure.
    pub fn exhausted(attempts: u32, last: &GatewayError) -> Self {
        Self {
            code: GatewayErrorCode::Unavailable,
            message: format!("gave up after {} attempts: {}", attempts, last.message),
            retryable: false,
        }
    }
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for GatewayError {}

impl From<GatewayError> for DomainError {
    fn from(err: GatewayError) -> Self {
        let code = match err.code {
            GatewayErrorCode::InvalidRequest => ErrorCode::ValidationFailed,
            _ => ErrorCode::GatewayUnavailable,
        };
        DomainError::new(code, err.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayErrorCode {
    NetworkError,
    AuthenticationError,
    InvalidRequest,
    RateLimitExceeded,
    ProviderError,
    /// Retries exhausted.
    Unavailable,
}

impl GatewayErrorCode {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayErrorCode::NetworkError
                | GatewayErrorCode::RateLimitExceeded
                | GatewayErrorCode::ProviderError
        )
    }
}

impl std::fmt::Display for GatewayErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GatewayErrorCode::NetworkError => "network_error",
            GatewayErrorCode::AuthenticationError => "authentication_error",
            GatewayErrorCode::InvalidRequest => "invalid_request",
            GatewayErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            GatewayErrorCode::ProviderError => "provider_error",
            GatewayErrorCode::Unavailable => "unavailable",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_follows_code() {
        assert!(GatewayError::network("reset").retryable);
        assert!(!GatewayError::authentication("bad key").retryable);
    }

    #[test]
    fn exhausted_maps_to_gateway_unavailable() {
        let err = GatewayError::exhausted(3, &GatewayError::network("timeout"));
        assert!(!err.retryable);
        let domain: DomainError = err.into();
        assert_eq!(domain.code, ErrorCode::GatewayUnavailable);
    }
}
