//! In-memory registration draft store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::booking::RegistrationDraft;
use crate::domain::foundation::{DomainError, DraftToken, Timestamp};
use crate::ports::DraftStore;

#[derive(Debug, Clone, Default)]
pub struct InMemoryDraftStore {
    drafts: Arc<RwLock<HashMap<DraftToken, RegistrationDraft>>>,
}

impl InMemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every expired draft. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Timestamp::now();
        let mut drafts = self.drafts.write().await;
        let before = drafts.len();
        drafts.retain(|_, d| !d.is_expired(&now));
        before - drafts.len()
    }
}

#[async_trait]
impl DraftStore for InMemoryDraftStore {
    async fn put(&self, draft: &RegistrationDraft) -> Result<(), DomainError> {
        self.drafts.write().await.insert(draft.token, draft.clone());
        Ok(())
    }

    async fn get(&self, token: &DraftToken) -> Result<Option<RegistrationDraft>, DomainError> {
        let drafts = self.drafts.read().await;
        let now = Timestamp::now();
        Ok(drafts.get(token).filter(|d| !d.is_expired(&now)).cloned())
    }

    async fn remove(&self, token: &DraftToken) -> Result<(), DomainError> {
        self.drafts.write().await.remove(token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stored_draft_is_returned() {
        let store = InMemoryDraftStore::new();
        let draft = RegistrationDraft::new(vec![], vec![], 60);
        store.put(&draft).await.unwrap();

        assert_eq!(store.get(&draft.token).await.unwrap(), Some(draft.clone()));

        store.remove(&draft.token).await.unwrap();
        assert!(store.get(&draft.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_draft_behaves_as_missing() {
        let store = InMemoryDraftStore::new();
        let draft = RegistrationDraft::new(vec![], vec![], 0);
        store.put(&draft).await.unwrap();

        assert!(store.get(&draft.token).await.unwrap().is_none());
        assert_eq!(store.purge_expired().await, 1);
    }
}
