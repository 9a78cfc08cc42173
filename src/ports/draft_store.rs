//! Registration draft storage port.

use async_trait::async_trait;

use crate::domain::booking::RegistrationDraft;
use crate::domain::foundation::{DomainError, DraftToken};

/// Short-lived storage for drafts between quote and payment.
///
/// Implementations must treat drafts past `expires_at` as absent.
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Store or replace a draft.
    async fn put(&self, draft: &RegistrationDraft) -> Result<(), DomainError>;

    /// Fetch a live draft.
    async fn get(&self, token: &DraftToken) -> Result<Option<RegistrationDraft>, DomainError>;

    /// Remove a draft. Removing a missing draft is not an error.
    async fn remove(&self, token: &DraftToken) -> Result<(), DomainError>;
}
