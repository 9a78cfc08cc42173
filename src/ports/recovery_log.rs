//! Recovery log port.
//!
//! Last-resort record of payments that were verified but could not be
//! persisted, kept so an operator can replay them by hand.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::booking::NewBooking;
use crate::domain::foundation::{DomainError, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryEntry {
    pub timestamp: Timestamp,
    pub payment_id: String,
    pub order_id: String,
    pub error: String,
    pub full_booking_payload: Vec<NewBooking>,
}

#[async_trait]
pub trait RecoveryLog: Send + Sync {
    /// Append an entry. Earlier entries are never rewritten or lost.
    async fn append(&self, entry: &RecoveryEntry) -> Result<(), DomainError>;

    /// Read every entry, oldest first.
    async fn entries(&self) -> Result<Vec<RecoveryEntry>, DomainError>;
}
