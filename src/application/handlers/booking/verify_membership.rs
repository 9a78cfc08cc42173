//! VerifyMembershipHandler - Checks a code before it is used in a quote.

use std::sync::Arc;

use crate::domain::booking::BookingError;
use crate::domain::membership::{is_youth_code, LookupResult};
use crate::ports::MembershipRegistry;

#[derive(Debug, Clone)]
pub struct VerifyMembershipQuery {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyMembershipResult {
    pub code: String,
    pub valid: bool,
    pub code_type: Option<String>,
    pub is_youth: bool,
}

pub struct VerifyMembershipHandler {
    registry: Arc<dyn MembershipRegistry>,
}

impl VerifyMembershipHandler {
    pub fn new(registry: Arc<dyn MembershipRegistry>) -> Self {
        Self { registry }
    }

    pub async fn handle(&self, query: VerifyMembershipQuery) -> Result<VerifyMembershipResult, BookingError> {
        let code = query.code.trim();
        if code.is_empty() {
            return Err(BookingError::Validation("Please enter a membership code".to_string()));
        }

        let result = match self.registry.lookup(code).await? {
            LookupResult::Active { code_type } => VerifyMembershipResult {
                code: code.to_string(),
                valid: true,
                code_type: Some(code_type),
                is_youth: is_youth_code(code),
            },
            LookupResult::NotFound => VerifyMembershipResult {
                code: code.to_string(),
                valid: false,
                code_type: None,
                is_youth: false,
            },
        };
        Ok(result)
    }
}
