//! Mock payment gateway for testing.
//!
//! Supports:
//! - Error injection (next call or every call)
//! - Call tracking
//! - Predictable order ids (`order_MOCK0001`, `order_MOCK0002`, ...)

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{CreateOrderRequest, GatewayError, GatewayOrder, PaymentGateway};

#[derive(Default, Clone)]
pub struct MockPaymentGateway {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Error to return on next call.
    next_error: Option<GatewayError>,
    /// Error returned on every call while set.
    persistent_error: Option<GatewayError>,
    /// Requests received, in order.
    call_log: Vec<CreateOrderRequest>,
    issued: u32,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway whose every call fails with `error`.
    pub fn failing(error: GatewayError) -> Self {
        let mock = Self::new();
        mock.lock().persistent_error = Some(error);
        mock
    }

    pub fn set_next_error(&self, error: GatewayError) {
        self.lock().next_error = Some(error);
    }

    pub fn calls(&self) -> Vec<CreateOrderRequest> {
        self.lock().call_log.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<GatewayOrder, GatewayError> {
        let mut state = self.lock();
        state.call_log.push(request.clone());

        if let Some(err) = state.next_error.take() {
            return Err(err);
        }
        if let Some(err) = &state.persistent_error {
            return Err(err.clone());
        }

        state.issued += 1;
        Ok(GatewayOrder {
            id: format!("order_MOCK{:04}", state.issued),
            amount: request.amount.paise(),
            currency: request.currency.clone(),
            status: "created".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Money;

    fn request() -> CreateOrderRequest {
        CreateOrderRequest {
            amount: Money::from_rupees(100),
            currency: "INR".to_string(),
            receipt: None,
        }
    }

    #[tokio::test]
    async fn issues_sequential_ids_and_logs_calls() {
        let mock = MockPaymentGateway::new();
        let first = mock.create_order(&request()).await.unwrap();
        let second = mock.create_order(&request()).await.unwrap();

        assert_eq!(first.id, "order_MOCK0001");
        assert_eq!(second.id, "order_MOCK0002");
        assert_eq!(first.amount, 10_000);
        assert_eq!(mock.calls().len(), 2);
    }

    #[tokio::test]
    async fn next_error_fires_once() {
        let mock = MockPaymentGateway::new();
        mock.set_next_error(GatewayError::network("boom"));

        assert!(mock.create_order(&request()).await.is_err());
        assert!(mock.create_order(&request()).await.is_ok());
    }
}
