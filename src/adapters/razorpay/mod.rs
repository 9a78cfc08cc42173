//! Razorpay payment gateway adapters.

mod gateway;
mod mock_gateway;

pub use gateway::{RazorpayConfig, RazorpayGateway};
pub use mock_gateway::MockPaymentGateway;
