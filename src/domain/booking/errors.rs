use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, OrderId, ValidationError};
use crate::domain::pricing::PricingError;

/// Message shown when payment succeeded but the booking could not be stored.
pub const SUPPORT_MESSAGE: &str =
    "Payment received but ticket generation failed. Please contact the administrator with your payment id.";

/// Failures surfaced by booking operations.
#[derive(Debug, Clone, Error)]
pub enum BookingError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Payment signature verification failed")]
    VerificationFailed,

    #[error("Payment {payment_id} received but booking could not be saved: {reason}")]
    PersistenceFailed { payment_id: String, reason: String },

    #[error("Membership code {code} could not be claimed by {order_id}")]
    ClaimConflict { code: String, order_id: OrderId },

    #[error("Payment gateway unavailable: {0}")]
    GatewayUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("{0}")]
    RegistrationClosed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for BookingError {
    fn from(err: ValidationError) -> Self {
        BookingError::Validation(err.to_string())
    }
}

impl From<PricingError> for BookingError {
    fn from(err: PricingError) -> Self {
        BookingError::Validation(err.to_string())
    }
}

impl From<DomainError> for BookingError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat
            | ErrorCode::InvalidStateTransition => BookingError::Validation(err.message),
            ErrorCode::BookingNotFound | ErrorCode::MembershipCodeNotFound => {
                BookingError::NotFound(err.message)
            }
            ErrorCode::BookingExists
            | ErrorCode::MembershipCodeExists
            | ErrorCode::MembershipCodeClaimed => BookingError::Conflict(err.message),
            ErrorCode::RegistrationClosed => BookingError::RegistrationClosed(err.message),
            ErrorCode::SignatureMismatch => BookingError::VerificationFailed,
            ErrorCode::GatewayUnavailable => BookingError::GatewayUnavailable(err.message),
            _ => BookingError::Internal(err.message),
        }
    }
}
