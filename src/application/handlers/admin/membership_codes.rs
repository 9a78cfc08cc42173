//! Membership code administration: listing by state and single-code entry.

use std::sync::Arc;

use crate::domain::booking::BookingError;
use crate::domain::membership::{CodeState, MembershipCode, MembershipRecord, STANDARD_CODE_TYPE};
use crate::ports::MembershipRegistry;

pub struct ListCodesHandler {
    registry: Arc<dyn MembershipRegistry>,
}

impl ListCodesHandler {
    pub fn new(registry: Arc<dyn MembershipRegistry>) -> Self {
        Self { registry }
    }

    pub async fn handle(&self, state: Option<CodeState>) -> Result<Vec<MembershipRecord>, BookingError> {
        Ok(self.registry.list_codes(state).await?)
    }
}

#[derive(Debug, Clone)]
pub struct AddCodeCommand {
    pub code: String,
    pub code_type: Option<String>,
}

/// Adds one hand-picked code, such as a discount code issued offline.
pub struct AddCodeHandler {
    registry: Arc<dyn MembershipRegistry>,
}

impl AddCodeHandler {
    pub fn new(registry: Arc<dyn MembershipRegistry>) -> Self {
        Self { registry }
    }

    /// # Errors
    ///
    /// - `Validation` if the code is blank
    /// - `Conflict` if the code already exists, active or expired
    pub async fn handle(&self, cmd: AddCodeCommand) -> Result<MembershipRecord, BookingError> {
        let code = MembershipCode::new(cmd.code)?;
        let code_type = cmd
            .code_type
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| STANDARD_CODE_TYPE.to_string());

        let record = MembershipRecord::active(code, code_type);
        if !self.registry.insert_if_absent(&record).await? {
            return Err(BookingError::Conflict(format!(
                "Membership code {} already exists",
                record.code
            )));
        }

        tracing::info!(code = %record.code, code_type = %record.code_type, "Membership code added by admin");
        Ok(record)
    }
}
