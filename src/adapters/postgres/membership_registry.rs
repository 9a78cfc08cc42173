//! PostgreSQL implementation of MembershipRegistry.
//!
//! Codes live in one table with a `state` column. Claiming is a single
//! conditional `UPDATE ... WHERE state = 'active'`, so concurrent claims on
//! the same code serialize on the row and exactly one succeeds.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::domain::foundation::{DomainError, ErrorCode, OrderId, Timestamp};
use crate::domain::membership::{
    ClaimOutcome, CodeState, LookupResult, MembershipCode, MembershipRecord,
};
use crate::ports::MembershipRegistry;

pub struct PostgresMembershipRegistry {
    pool: PgPool,
}

impl PostgresMembershipRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a membership code.
#[derive(Debug, sqlx::FromRow)]
struct CodeRow {
    code: String,
    code_type: String,
    state: String,
    created_at: DateTime<Utc>,
    expired_at: Option<DateTime<Utc>>,
    consumed_by: Option<String>,
}

impl TryFrom<CodeRow> for MembershipRecord {
    type Error = DomainError;

    fn try_from(row: CodeRow) -> Result<Self, Self::Error> {
        let invalid = |field: &str, e: String| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid {}: {}", field, e))
        };
        Ok(MembershipRecord {
            code: MembershipCode::new(row.code).map_err(|e| invalid("code", e.to_string()))?,
            code_type: row.code_type,
            state: parse_state(&row.state)?,
            created_at: Timestamp::from_datetime(row.created_at),
            expired_at: row.expired_at.map(Timestamp::from_datetime),
            consumed_by: row
                .consumed_by
                .map(OrderId::new)
                .transpose()
                .map_err(|e| invalid("consumed_by", e.to_string()))?,
        })
    }
}

fn parse_state(s: &str) -> Result<CodeState, DomainError> {
    s.parse().map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid code state value: {}", s),
        )
    })
}

/// Moves an Active code to Expired on the given connection.
///
/// Shared with booking settlement so the claim joins its transaction.
pub(super) async fn claim_code(
    conn: &mut PgConnection,
    code: &str,
    consumer: &OrderId,
    now: Timestamp,
) -> Result<ClaimOutcome, sqlx::Error> {
    let claimed = sqlx::query(
        r#"
        UPDATE membership_codes
        SET state = 'expired', expired_at = $3, consumed_by = $2
        WHERE code = $1 AND state = 'active'
        "#,
    )
    .bind(code)
    .bind(consumer.as_str())
    .bind(now.as_datetime())
    .execute(&mut *conn)
    .await?;

    if claimed.rows_affected() == 1 {
        return Ok(ClaimOutcome::Claimed);
    }

    let exists: Option<(String,)> =
        sqlx::query_as("SELECT state FROM membership_codes WHERE code = $1")
            .bind(code)
            .fetch_optional(&mut *conn)
            .await?;

    Ok(match exists {
        Some(_) => ClaimOutcome::AlreadyClaimed,
        None => ClaimOutcome::NotFound,
    })
}

#[async_trait]
impl MembershipRegistry for PostgresMembershipRegistry {
    async fn lookup(&self, code: &str) -> Result<LookupResult, DomainError> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT code_type FROM membership_codes WHERE code = $1 AND state = 'active'",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to look up code: {}", e))
        })?;

        Ok(match row {
            Some((code_type,)) => LookupResult::Active { code_type },
            None => LookupResult::NotFound,
        })
    }

    async fn claim(&self, code: &str, consumer: &OrderId) -> Result<ClaimOutcome, DomainError> {
        let mut conn = self.pool.acquire().await.map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to acquire connection: {}", e))
        })?;

        claim_code(&mut conn, code, consumer, Timestamp::now())
            .await
            .map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Failed to claim code: {}", e))
            })
    }

    async fn insert_if_absent(&self, record: &MembershipRecord) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO membership_codes (code, code_type, state, created_at, expired_at, consumed_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (code) DO NOTHING
            "#,
        )
        .bind(record.code.as_str())
        .bind(&record.code_type)
        .bind(record.state.as_str())
        .bind(record.created_at.as_datetime())
        .bind(record.expired_at.as_ref().map(|t| *t.as_datetime()))
        .bind(record.consumed_by.as_ref().map(|o| o.as_str()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to insert code: {}", e))
        })?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_codes(&self, state: Option<CodeState>) -> Result<Vec<MembershipRecord>, DomainError> {
        let rows = sqlx::query_as::<_, CodeRow>(
            r#"
            SELECT code, code_type, state, created_at, expired_at, consumed_by
            FROM membership_codes
            WHERE ($1::text IS NULL OR state = $1)
            ORDER BY code
            "#,
        )
        .bind(state.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to list codes: {}", e))
        })?;

        rows.into_iter().map(MembershipRecord::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(state: &str, consumed_by: Option<&str>) -> CodeRow {
        CodeRow {
            code: "GMPX1Y2Z".to_string(),
            code_type: "discount".to_string(),
            state: state.to_string(),
            created_at: Utc::now(),
            expired_at: consumed_by.map(|_| Utc::now()),
            consumed_by: consumed_by.map(str::to_string),
        }
    }

    #[test]
    fn parse_state_accepts_known_values() {
        assert_eq!(parse_state("active").unwrap(), CodeState::Active);
        assert_eq!(parse_state("expired").unwrap(), CodeState::Expired);
    }

    #[test]
    fn parse_state_rejects_unknown() {
        let err = parse_state("archived").unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn expired_row_converts_with_consumer() {
        let record = MembershipRecord::try_from(row("expired", Some("order_9"))).unwrap();
        assert_eq!(record.state, CodeState::Expired);
        assert_eq!(record.consumed_by.unwrap().as_str(), "order_9");
        assert_eq!(record.code_type, "discount");
    }

    #[test]
    fn active_row_converts() {
        let record = MembershipRecord::try_from(row("active", None)).unwrap();
        assert!(record.is_active());
        assert!(record.expired_at.is_none());
    }
}
