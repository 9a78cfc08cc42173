//! PostgreSQL implementation of BookingRepository.
//!
//! All travelers live in one `bookings` table; `has_membership` tells member
//! rows from guest rows. Settlement runs in a single transaction: existing
//! Paid rows are left alone, Pending rows are promoted by a conditional
//! UPDATE, missing rows are inserted, and membership codes are claimed on
//! the same connection.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{PgConnection, PgPool, Postgres};

use super::membership_registry::claim_code;
use crate::domain::booking::{BookedPackage, BookingRecord, PaymentStatus, Traveler};
use crate::domain::foundation::{DomainError, ErrorCode, Money, OrderId, Timestamp};
use crate::domain::membership::MembershipCode;
use crate::ports::{BookingFilter, BookingRepository, SettledLine, Settlement, SettlementPath};

const BOOKING_COLUMNS: &str = "order_id, membership_code, name, email, phone, alternative_phone, \
     age, gender, city, district, state, start_date, end_date, num_days, hotel_tier, \
     travel_mode, amount_paise, note, payment_status, payment_id, created_at";

pub struct PostgresBookingRepository {
    pool: PgPool,
}

impl PostgresBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a booking.
#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    order_id: String,
    membership_code: Option<String>,
    name: String,
    email: String,
    phone: String,
    alternative_phone: Option<String>,
    age: i32,
    gender: String,
    city: String,
    district: String,
    state: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    num_days: i32,
    hotel_tier: String,
    travel_mode: String,
    amount_paise: i64,
    note: Option<String>,
    payment_status: String,
    payment_id: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for BookingRecord {
    type Error = DomainError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let invalid = |field: &str, e: String| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid {}: {}", field, e))
        };

        Ok(BookingRecord {
            order_id: OrderId::new(row.order_id).map_err(|e| invalid("order_id", e.to_string()))?,
            traveler: Traveler {
                name: row.name,
                email: row.email,
                phone: row.phone,
                alternative_phone: row.alternative_phone,
                age: row.age,
                gender: row.gender,
                city: row.city,
                district: row.district,
                state: row.state,
                guardian: None,
            },
            package: BookedPackage {
                start_date: row.start_date,
                end_date: row.end_date,
                num_days: u32::try_from(row.num_days).map_err(|e| invalid("num_days", e.to_string()))?,
                hotel_tier: row
                    .hotel_tier
                    .parse()
                    .map_err(|_| invalid("hotel_tier", row.hotel_tier.clone()))?,
                travel_mode: row
                    .travel_mode
                    .parse()
                    .map_err(|_| invalid("travel_mode", row.travel_mode.clone()))?,
            },
            membership_code: row
                .membership_code
                .map(MembershipCode::new)
                .transpose()
                .map_err(|e| invalid("membership_code", e.to_string()))?,
            amount: Money::from_paise(row.amount_paise)
                .map_err(|e| invalid("amount_paise", e.to_string()))?,
            note: row.note,
            payment_status: parse_status(&row.payment_status)?,
            payment_id: row.payment_id,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

fn parse_status(s: &str) -> Result<PaymentStatus, DomainError> {
    match s {
        "pending" => Ok(PaymentStatus::Pending),
        "paid" => Ok(PaymentStatus::Paid),
        "failed" => Ok(PaymentStatus::Failed),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid payment status value: {}", s),
        )),
    }
}

fn db_error(action: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| DomainError::new(ErrorCode::DatabaseError, format!("Failed to {}: {}", action, e))
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.constraint() == Some("bookings_pkey"))
}

/// Binds every column of `record` in `BOOKING_COLUMNS` order, after `has_membership`.
fn bind_record<'q>(
    query: Query<'q, Postgres, PgArguments>,
    record: &'q BookingRecord,
) -> Query<'q, Postgres, PgArguments> {
    query
        .bind(record.has_membership())
        .bind(record.order_id.as_str())
        .bind(record.membership_code.as_ref().map(|c| c.as_str()))
        .bind(&record.traveler.name)
        .bind(&record.traveler.email)
        .bind(&record.traveler.phone)
        .bind(&record.traveler.alternative_phone)
        .bind(record.traveler.age)
        .bind(&record.traveler.gender)
        .bind(&record.traveler.city)
        .bind(&record.traveler.district)
        .bind(&record.traveler.state)
        .bind(record.package.start_date)
        .bind(record.package.end_date)
        .bind(record.package.num_days as i32)
        .bind(record.package.hotel_tier.as_str())
        .bind(record.package.travel_mode.as_str())
        .bind(record.amount.paise())
        .bind(&record.note)
        .bind(record.payment_status.as_str())
        .bind(&record.payment_id)
        .bind(record.created_at.as_datetime())
}

fn insert_sql(on_conflict_skip: bool) -> String {
    format!(
        "INSERT INTO bookings (has_membership, {}) VALUES \
         ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22){}",
        BOOKING_COLUMNS,
        if on_conflict_skip {
            " ON CONFLICT (order_id) DO NOTHING"
        } else {
            ""
        }
    )
}

async fn fetch_row(
    conn: &mut PgConnection,
    order_id: &str,
    for_update: bool,
) -> Result<Option<BookingRecord>, DomainError> {
    let sql = format!(
        "SELECT {} FROM bookings WHERE order_id = $1{}",
        BOOKING_COLUMNS,
        if for_update { " FOR UPDATE" } else { "" }
    );
    sqlx::query_as::<_, BookingRow>(&sql)
        .bind(order_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_error("fetch booking"))?
        .map(BookingRecord::try_from)
        .transpose()
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    async fn insert_pending(&self, records: &[BookingRecord]) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;
        let sql = insert_sql(false);

        for record in records {
            bind_record(sqlx::query(&sql), record)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        return DomainError::new(
                            ErrorCode::BookingExists,
                            format!("Booking {} already exists", record.order_id),
                        );
                    }
                    db_error("insert pending booking")(e)
                })?;
        }

        tx.commit().await.map_err(db_error("commit transaction"))?;
        Ok(())
    }

    async fn insert(&self, record: &BookingRecord) -> Result<(), DomainError> {
        self.insert_pending(std::slice::from_ref(record)).await
    }

    async fn settle(&self, settlement: &Settlement) -> Result<Vec<SettledLine>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;
        let now = Timestamp::now();
        let promote_sql = format!(
            r#"
            UPDATE bookings
            SET order_id = $2, payment_id = $3, payment_status = 'paid'
            WHERE order_id = $1 AND payment_status = 'pending'
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        );
        let insert_paid_sql = insert_sql(true);
        let mut settled = Vec::with_capacity(settlement.lines.len());

        for line in &settlement.lines {
            if let Some(existing) = fetch_row(&mut tx, line.order_id.as_str(), true).await? {
                if existing.is_paid() {
                    settled.push(SettledLine {
                        record: existing,
                        path: SettlementPath::AlreadyPaid,
                        claim: None,
                    });
                    continue;
                }
                // A non-paid row squatting on the final key is replaced.
                sqlx::query("DELETE FROM bookings WHERE order_id = $1")
                    .bind(line.order_id.as_str())
                    .execute(&mut *tx)
                    .await
                    .map_err(db_error("clear unpaid booking"))?;
            }

            let promoted = match &line.pending_order_id {
                Some(pending_id) => sqlx::query_as::<_, BookingRow>(&promote_sql)
                    .bind(pending_id.as_str())
                    .bind(line.order_id.as_str())
                    .bind(&settlement.payment_id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(db_error("promote pending booking"))?,
                None => None,
            };

            let (record, path) = match promoted {
                Some(row) => (BookingRecord::try_from(row)?, SettlementPath::Promoted),
                None => {
                    let record = BookingRecord::paid(
                        line.order_id.clone(),
                        line.booking.clone(),
                        settlement.payment_id.as_str(),
                        now,
                    );
                    let inserted = bind_record(sqlx::query(&insert_paid_sql), &record)
                        .execute(&mut *tx)
                        .await
                        .map_err(db_error("insert paid booking"))?;

                    if inserted.rows_affected() == 0 {
                        // Lost a race with a concurrent settlement of the same order.
                        let winner = fetch_row(&mut tx, line.order_id.as_str(), false)
                            .await?
                            .ok_or_else(|| {
                                DomainError::database(format!(
                                    "Booking {} vanished after conflict",
                                    line.order_id
                                ))
                            })?;
                        settled.push(SettledLine {
                            record: winner,
                            path: SettlementPath::AlreadyPaid,
                            claim: None,
                        });
                        continue;
                    }
                    (record, SettlementPath::Inserted)
                }
            };

            let claim = match &record.membership_code {
                Some(code) => Some(
                    claim_code(&mut tx, code.as_str(), &record.order_id, now)
                        .await
                        .map_err(db_error("claim membership code"))?,
                ),
                None => None,
            };

            settled.push(SettledLine { record, path, claim });
        }

        tx.commit().await.map_err(db_error("commit settlement"))?;
        Ok(settled)
    }

    async fn find_by_order_id(&self, order_id: &OrderId) -> Result<Option<BookingRecord>, DomainError> {
        let mut conn = self.pool.acquire().await.map_err(db_error("acquire connection"))?;
        fetch_row(&mut conn, order_id.as_str(), false).await
    }

    async fn list(&self, filter: &BookingFilter) -> Result<Vec<BookingRecord>, DomainError> {
        let sql = format!(
            r#"
            SELECT {} FROM bookings
            WHERE ($1::text IS NULL OR payment_status = $1)
              AND ($2::boolean IS NULL OR has_membership = $2)
            ORDER BY created_at, order_id
            "#,
            BOOKING_COLUMNS
        );
        let rows = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.has_membership)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list bookings"))?;

        rows.into_iter().map(BookingRecord::try_from).collect()
    }

    async fn update(&self, record: &BookingRecord) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE bookings SET
                name = $2,
                email = $3,
                phone = $4,
                alternative_phone = $5,
                gender = $6,
                city = $7,
                district = $8,
                state = $9,
                hotel_tier = $10,
                travel_mode = $11,
                amount_paise = $12,
                payment_status = $13,
                payment_id = $14
            WHERE order_id = $1
              AND (payment_status <> 'paid' OR amount_paise = $12)
            "#,
        )
        .bind(record.order_id.as_str())
        .bind(&record.traveler.name)
        .bind(&record.traveler.email)
        .bind(&record.traveler.phone)
        .bind(&record.traveler.alternative_phone)
        .bind(&record.traveler.gender)
        .bind(&record.traveler.city)
        .bind(&record.traveler.district)
        .bind(&record.traveler.state)
        .bind(record.package.hotel_tier.as_str())
        .bind(record.package.travel_mode.as_str())
        .bind(record.amount.paise())
        .bind(record.payment_status.as_str())
        .bind(&record.payment_id)
        .execute(&self.pool)
        .await
        .map_err(db_error("update booking"))?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        match self.find_by_order_id(&record.order_id).await? {
            Some(_) => Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Amount cannot change once the booking is paid",
            )),
            None => Err(DomainError::new(
                ErrorCode::BookingNotFound,
                format!("Booking {} not found", record.order_id),
            )),
        }
    }

    async fn delete(&self, order_id: &OrderId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM bookings WHERE order_id = $1")
            .bind(order_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_error("delete booking"))?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete_stale_pending(&self, cutoff: Timestamp) -> Result<u64, DomainError> {
        let result = sqlx::query(
            "DELETE FROM bookings WHERE payment_status = 'pending' AND created_at < $1",
        )
        .bind(cutoff.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("delete stale bookings"))?;
        Ok(result.rows_affected())
    }
}
