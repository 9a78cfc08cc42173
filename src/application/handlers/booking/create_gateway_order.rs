//! CreateGatewayOrderHandler - Opens a gateway order for a party total.

use std::sync::Arc;

use crate::domain::booking::BookingError;
use crate::domain::foundation::Money;
use crate::ports::{CreateOrderRequest, GatewayOrder, PaymentGateway};

pub const DEFAULT_CURRENCY: &str = "INR";

#[derive(Debug, Clone)]
pub struct CreateGatewayOrderCommand {
    pub amount: Money,
    pub receipt: Option<String>,
}

pub struct CreateGatewayOrderHandler {
    gateway: Arc<dyn PaymentGateway>,
    currency: String,
}

impl CreateGatewayOrderHandler {
    pub fn new(gateway: Arc<dyn PaymentGateway>, currency: impl Into<String>) -> Self {
        Self {
            gateway,
            currency: currency.into(),
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub async fn handle(&self, cmd: CreateGatewayOrderCommand) -> Result<GatewayOrder, BookingError> {
        if cmd.amount.is_zero() {
            return Err(BookingError::Validation(
                "Order amount must be greater than zero".to_string(),
            ));
        }

        let request = CreateOrderRequest {
            amount: cmd.amount,
            currency: self.currency.clone(),
            receipt: cmd.receipt,
        };
        self.gateway.create_order(&request).await.map_err(|err| {
            tracing::error!(amount = %cmd.amount, error = %err, "Gateway order creation failed");
            BookingError::GatewayUnavailable(err.message)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::razorpay::MockPaymentGateway;
    use crate::ports::GatewayError;

    fn cmd(rupees: u32) -> CreateGatewayOrderCommand {
        CreateGatewayOrderCommand {
            amount: Money::from_rupees(rupees),
            receipt: None,
        }
    }

    #[tokio::test]
    async fn order_is_in_paise_and_inr() {
        let gateway = Arc::new(MockPaymentGateway::new());
        let handler = CreateGatewayOrderHandler::new(gateway.clone(), DEFAULT_CURRENCY);

        let order = handler.handle(cmd(36000)).await.unwrap();

        assert_eq!(order.amount, 3_600_000);
        assert_eq!(gateway.calls()[0].currency, "INR");
    }

    #[tokio::test]
    async fn zero_amount_rejected_without_calling_gateway() {
        let gateway = Arc::new(MockPaymentGateway::new());
        let handler = CreateGatewayOrderHandler::new(gateway.clone(), DEFAULT_CURRENCY);

        let err = handler.handle(cmd(0)).await.unwrap_err();

        assert!(matches!(err, BookingError::Validation(_)));
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn gateway_failure_maps_to_unavailable() {
        let gateway = Arc::new(MockPaymentGateway::failing(GatewayError::network("timeout")));
        let handler = CreateGatewayOrderHandler::new(gateway, DEFAULT_CURRENCY);

        assert!(matches!(
            handler.handle(cmd(100)).await,
            Err(BookingError::GatewayUnavailable(_))
        ));
    }
}
