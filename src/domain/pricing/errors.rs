use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Reasons a price cannot be computed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("Age must be between 0 and 150, got {age}")]
    InvalidAge { age: i32 },

    #[error("End date {end} is before start date {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}

impl From<PricingError> for DomainError {
    fn from(err: PricingError) -> Self {
        let field = match &err {
            PricingError::InvalidAge { .. } => "age",
            PricingError::InvalidDateRange { .. } => "end_date",
        };
        DomainError::new(ErrorCode::ValidationFailed, err.to_string()).with_detail("field", field)
    }
}
