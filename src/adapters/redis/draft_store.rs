//! Redis-backed registration draft store.
//!
//! Each draft is one JSON string under `draft:{token}` with a TTL matching
//! the draft's remaining lifetime, so Redis expires abandoned drafts on its
//! own. Works across multiple server instances.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::booking::RegistrationDraft;
use crate::domain::foundation::{DomainError, DraftToken, ErrorCode, Timestamp};
use crate::ports::DraftStore;

const KEY_PREFIX: &str = "draft";

#[derive(Clone)]
pub struct RedisDraftStore {
    conn: MultiplexedConnection,
}

fn cache_error(e: redis::RedisError) -> DomainError {
    DomainError::new(ErrorCode::CacheError, format!("Redis error: {}", e))
}

impl RedisDraftStore {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }

    fn key(token: &DraftToken) -> String {
        format!("{}:{}", KEY_PREFIX, token)
    }
}

#[async_trait]
impl DraftStore for RedisDraftStore {
    async fn put(&self, draft: &RegistrationDraft) -> Result<(), DomainError> {
        let ttl = draft.remaining_secs(&Timestamp::now());
        if ttl == 0 {
            return Ok(());
        }
        let json = serde_json::to_string(draft).map_err(|e| {
            DomainError::new(ErrorCode::InternalError, format!("Failed to serialize draft: {}", e))
        })?;

        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(Self::key(&draft.token), json, ttl)
            .await
            .map_err(cache_error)
    }

    async fn get(&self, token: &DraftToken) -> Result<Option<RegistrationDraft>, DomainError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(Self::key(token)).await.map_err(cache_error)?;

        let Some(raw) = raw else {
            return Ok(None);
        };
        let draft: RegistrationDraft = serde_json::from_str(&raw).map_err(|e| {
            DomainError::new(ErrorCode::CacheError, format!("Corrupt draft {}: {}", token, e))
        })?;

        // Redis TTLs are second-granular.
        if draft.is_expired(&Timestamp::now()) {
            return Ok(None);
        }
        Ok(Some(draft))
    }

    async fn remove(&self, token: &DraftToken) -> Result<(), DomainError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(Self::key(token)).await.map_err(cache_error)
    }
}

impl std::fmt::Debug for RedisDraftStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisDraftStore").finish_non_exhaustive()
    }
}
