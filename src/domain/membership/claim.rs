use serde::{Deserialize, Serialize};

/// Result of looking a code up in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupResult {
    Active { code_type: String },
    NotFound,
}

impl LookupResult {
    pub fn is_active(&self) -> bool {
        matches!(self, LookupResult::Active { .. })
    }
}

/// Result of attempting to consume a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimOutcome {
    Claimed,
    AlreadyClaimed,
    NotFound,
}

impl ClaimOutcome {
    pub fn is_claimed(&self) -> bool {
        matches!(self, ClaimOutcome::Claimed)
    }
}
