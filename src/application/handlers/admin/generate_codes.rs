//! GenerateCodesHandler - Bulk creation of membership codes.

use std::sync::Arc;

use crate::domain::booking::BookingError;
use crate::domain::membership::{GenerateRequest, MembershipCode};
use crate::ports::MembershipRegistry;

#[derive(Debug, Clone)]
pub struct GenerateCodesCommand {
    pub count: usize,
    pub prefix: String,
    pub code_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GenerateCodesResult {
    pub requested: usize,
    pub codes: Vec<MembershipCode>,
}

impl GenerateCodesResult {
    /// Candidates dropped because they collided with existing codes.
    pub fn skipped(&self) -> usize {
        self.requested - self.codes.len()
    }
}

pub struct GenerateCodesHandler {
    registry: Arc<dyn MembershipRegistry>,
}

impl GenerateCodesHandler {
    pub fn new(registry: Arc<dyn MembershipRegistry>) -> Self {
        Self { registry }
    }

    pub async fn handle(&self, cmd: GenerateCodesCommand) -> Result<GenerateCodesResult, BookingError> {
        let mut request = GenerateRequest::new(cmd.count, cmd.prefix)?;
        if let Some(code_type) = cmd.code_type.filter(|t| !t.trim().is_empty()) {
            request = request.with_code_type(code_type.trim());
        }

        let codes = self.registry.generate(&request).await?;
        tracing::info!(
            requested = cmd.count,
            created = codes.len(),
            prefix = request.prefix(),
            "Membership codes generated"
        );

        Ok(GenerateCodesResult {
            requested: cmd.count,
            codes,
        })
    }
}
