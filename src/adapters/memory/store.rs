//! In-memory booking and membership storage.
//!
//! Bookings and codes live behind one lock so that settlement (promotion,
//! insertion and claims) happens in a single critical section, mirroring
//! the single transaction used by the Postgres adapter. Settlement works on
//! copies and swaps them in only when every line succeeded.
//!
//! Useful for tests and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::booking::{BookingRecord, PaymentStatus};
use crate::domain::foundation::{DomainError, ErrorCode, OrderId, Timestamp};
use crate::domain::membership::{ClaimOutcome, CodeState, LookupResult, MembershipRecord};
use crate::ports::{
    BookingFilter, BookingRepository, MembershipRegistry, SettledLine, Settlement, SettlementPath,
};

#[derive(Debug, Default)]
struct StoreState {
    bookings: HashMap<OrderId, BookingRecord>,
    codes: HashMap<String, MembershipRecord>,
    fail_writes: bool,
}

/// In-memory implementation of [`BookingRepository`] and [`MembershipRegistry`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryBookingStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with a database error (for tests).
    pub async fn set_write_failure(&self, fail: bool) {
        self.state.write().await.fail_writes = fail;
    }

    pub async fn booking_count(&self) -> usize {
        self.state.read().await.bookings.len()
    }

    /// Insert a code directly, overwriting any existing entry (for tests).
    pub async fn seed_code(&self, record: MembershipRecord) {
        self.state
            .write()
            .await
            .codes
            .insert(record.code.as_str().to_string(), record);
    }

    /// Backdate a booking's creation time (for cleanup tests).
    pub async fn set_created_at(&self, order_id: &OrderId, at: Timestamp) -> bool {
        match self.state.write().await.bookings.get_mut(order_id) {
            Some(record) => {
                record.created_at = at;
                true
            }
            None => false,
        }
    }
}

fn injected_failure() -> DomainError {
    DomainError::database("injected write failure")
}

fn claim_code(
    codes: &mut HashMap<String, MembershipRecord>,
    code: &str,
    consumer: &OrderId,
    now: Timestamp,
) -> ClaimOutcome {
    match codes.get_mut(code) {
        None => ClaimOutcome::NotFound,
        Some(record) => match record.expire(consumer.clone(), now) {
            Ok(()) => ClaimOutcome::Claimed,
            Err(_) => ClaimOutcome::AlreadyClaimed,
        },
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingStore {
    async fn insert_pending(&self, records: &[BookingRecord]) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if state.fail_writes {
            return Err(injected_failure());
        }
        for record in records {
            if state.bookings.contains_key(&record.order_id) {
                return Err(DomainError::new(
                    ErrorCode::BookingExists,
                    format!("Booking {} already exists", record.order_id),
                ));
            }
        }
        for record in records {
            state.bookings.insert(record.order_id.clone(), record.clone());
        }
        Ok(())
    }

    async fn insert(&self, record: &BookingRecord) -> Result<(), DomainError> {
        self.insert_pending(std::slice::from_ref(record)).await
    }

    async fn settle(&self, settlement: &Settlement) -> Result<Vec<SettledLine>, DomainError> {
        let mut state = self.state.write().await;
        if state.fail_writes {
            return Err(injected_failure());
        }

        let mut bookings = state.bookings.clone();
        let mut codes = state.codes.clone();
        let now = Timestamp::now();
        let mut settled = Vec::with_capacity(settlement.lines.len());

        for line in &settlement.lines {
            if let Some(existing) = bookings.get(&line.order_id) {
                if existing.is_paid() {
                    settled.push(SettledLine {
                        record: existing.clone(),
                        path: SettlementPath::AlreadyPaid,
                        claim: None,
                    });
                    continue;
                }
            }

            let pending = line
                .pending_order_id
                .as_ref()
                .filter(|id| {
                    bookings
                        .get(*id)
                        .is_some_and(|r| r.payment_status == PaymentStatus::Pending)
                })
                .and_then(|id| bookings.remove(id));

            let (record, path) = match pending {
                Some(mut record) => {
                    record.promote(line.order_id.clone(), settlement.payment_id.as_str())?;
                    (record, SettlementPath::Promoted)
                }
                None => (
                    BookingRecord::paid(
                        line.order_id.clone(),
                        line.booking.clone(),
                        settlement.payment_id.as_str(),
                        now,
                    ),
                    SettlementPath::Inserted,
                ),
            };

            let claim = record
                .membership_code
                .as_ref()
                .map(|code| claim_code(&mut codes, code.as_str(), &record.order_id, now));

            bookings.insert(record.order_id.clone(), record.clone());
            settled.push(SettledLine { record, path, claim });
        }

        state.bookings = bookings;
        state.codes = codes;
        Ok(settled)
    }

    async fn find_by_order_id(&self, order_id: &OrderId) -> Result<Option<BookingRecord>, DomainError> {
        Ok(self.state.read().await.bookings.get(order_id).cloned())
    }

    async fn list(&self, filter: &BookingFilter) -> Result<Vec<BookingRecord>, DomainError> {
        let state = self.state.read().await;
        let mut records: Vec<BookingRecord> = state
            .bookings
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.order_id.cmp(&b.order_id))
        });
        Ok(records)
    }

    async fn update(&self, record: &BookingRecord) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if state.fail_writes {
            return Err(injected_failure());
        }
        let stored = state.bookings.get_mut(&record.order_id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::BookingNotFound,
                format!("Booking {} not found", record.order_id),
            )
        })?;
        if stored.is_paid() && stored.amount != record.amount {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Amount cannot change once the booking is paid",
            ));
        }
        *stored = record.clone();
        Ok(())
    }

    async fn delete(&self, order_id: &OrderId) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        if state.fail_writes {
            return Err(injected_failure());
        }
        Ok(state.bookings.remove(order_id).is_some())
    }

    async fn delete_stale_pending(&self, cutoff: Timestamp) -> Result<u64, DomainError> {
        let mut state = self.state.write().await;
        let before = state.bookings.len();
        state.bookings.retain(|_, r| {
            !(r.payment_status == PaymentStatus::Pending && r.created_at.is_before(&cutoff))
        });
        Ok((before - state.bookings.len()) as u64)
    }
}

#[async_trait]
impl MembershipRegistry for InMemoryBookingStore {
    async fn lookup(&self, code: &str) -> Result<LookupResult, DomainError> {
        let state = self.state.read().await;
        Ok(match state.codes.get(code) {
            Some(record) if record.is_active() => LookupResult::Active {
                code_type: record.code_type.clone(),
            },
            _ => LookupResult::NotFound,
        })
    }

    async fn claim(&self, code: &str, consumer: &OrderId) -> Result<ClaimOutcome, DomainError> {
        let mut state = self.state.write().await;
        if state.fail_writes {
            return Err(injected_failure());
        }
        Ok(claim_code(&mut state.codes, code, consumer, Timestamp::now()))
    }

    async fn insert_if_absent(&self, record: &MembershipRecord) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        if state.fail_writes {
            return Err(injected_failure());
        }
        let key = record.code.as_str().to_string();
        if state.codes.contains_key(&key) {
            return Ok(false);
        }
        state.codes.insert(key, record.clone());
        Ok(true)
    }

    async fn list_codes(&self, filter: Option<CodeState>) -> Result<Vec<MembershipRecord>, DomainError> {
        let state = self.state.read().await;
        let mut records: Vec<MembershipRecord> = state
            .codes
            .values()
            .filter(|r| filter.map_or(true, |s| r.state == s))
            .cloned()
            .collect();
        records.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::fixtures::new_booking;
    use crate::domain::membership::{GenerateRequest, MembershipCode};
    use crate::ports::SettlementLine;

    fn code(raw: &str) -> MembershipRecord {
        MembershipRecord::active(MembershipCode::new(raw).unwrap(), "standard")
    }

    fn order(raw: &str) -> OrderId {
        OrderId::new(raw).unwrap()
    }

    fn settlement(pending: Option<OrderId>, final_id: &str, code: Option<&str>) -> Settlement {
        Settlement {
            payment_id: "pay_1".to_string(),
            lines: vec![SettlementLine {
                pending_order_id: pending,
                order_id: order(final_id),
                booking: new_booking("Asha", code, 24000),
            }],
        }
    }

    // ════════════════════════════════════════════════════════════════════
    // Settlement
    // ════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn settle_promotes_pending_row() {
        let store = InMemoryBookingStore::new();
        let pending = BookingRecord::pending(OrderId::pending(false), new_booking("Asha", None, 24000), Timestamp::now());
        store.insert_pending(&[pending.clone()]).await.unwrap();

        let settled = store
            .settle(&settlement(Some(pending.order_id.clone()), "order_A", None))
            .await
            .unwrap();

        assert_eq!(settled[0].path, SettlementPath::Promoted);
        assert!(store.find_by_order_id(&pending.order_id).await.unwrap().is_none());
        let paid = store.find_by_order_id(&order("order_A")).await.unwrap().unwrap();
        assert!(paid.is_paid());
        assert_eq!(paid.payment_id.as_deref(), Some("pay_1"));
        assert_eq!(store.booking_count().await, 1);
    }

    #[tokio::test]
    async fn settle_inserts_when_pending_missing() {
        let store = InMemoryBookingStore::new();
        let settled = store
            .settle(&settlement(Some(OrderId::pending(false)), "order_A", None))
            .await
            .unwrap();

        assert_eq!(settled[0].path, SettlementPath::Inserted);
        assert_eq!(settled[0].record.amount.paise(), 2_400_000);
    }

    #[tokio::test]
    async fn settle_twice_reports_already_paid() {
        let store = InMemoryBookingStore::new();
        store.seed_code(code("GMP12345")).await;
        store.settle(&settlement(None, "order_A", Some("GMP12345"))).await.unwrap();

        let second = store
            .settle(&settlement(None, "order_A", Some("GMP12345")))
            .await
            .unwrap();

        assert_eq!(second[0].path, SettlementPath::AlreadyPaid);
        assert_eq!(second[0].claim, None);
        assert_eq!(store.booking_count().await, 1);
    }

    #[tokio::test]
    async fn settle_claims_code_with_consumer() {
        let store = InMemoryBookingStore::new();
        store.seed_code(code("GMP12345")).await;

        let settled = store
            .settle(&settlement(None, "order_A", Some("GMP12345")))
            .await
            .unwrap();

        assert_eq!(settled[0].claim, Some(ClaimOutcome::Claimed));
        let expired = store.list_codes(Some(CodeState::Expired)).await.unwrap();
        assert_eq!(expired[0].consumed_by, Some(order("order_A")));
        assert_eq!(expired[0].code_type, "standard");
    }

    #[tokio::test]
    async fn settle_with_unknown_code_still_pays() {
        let store = InMemoryBookingStore::new();
        let settled = store
            .settle(&settlement(None, "order_A", Some("NOPE1")))
            .await
            .unwrap();

        assert_eq!(settled[0].claim, Some(ClaimOutcome::NotFound));
        assert!(settled[0].record.is_paid());
    }

    #[tokio::test]
    async fn failed_settle_changes_nothing() {
        let store = InMemoryBookingStore::new();
        store.seed_code(code("GMP12345")).await;
        store.set_write_failure(true).await;

        assert!(store.settle(&settlement(None, "order_A", Some("GMP12345"))).await.is_err());

        store.set_write_failure(false).await;
        assert_eq!(store.booking_count().await, 0);
        assert!(store.lookup("GMP12345").await.unwrap().is_active());
    }

    // ════════════════════════════════════════════════════════════════════
    // Cleanup
    // ════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn cleanup_removes_only_old_pending() {
        let store = InMemoryBookingStore::new();
        let old = Timestamp::now().minus_minutes(45);
        let stale = BookingRecord::pending(OrderId::pending(false), new_booking("A", None, 1), old);
        let fresh = BookingRecord::pending(OrderId::pending(false), new_booking("B", None, 1), Timestamp::now());
        let paid = BookingRecord::paid(order("order_P"), new_booking("C", None, 1), "pay", old);
        store.insert_pending(&[stale.clone(), fresh.clone()]).await.unwrap();
        store.insert(&paid).await.unwrap();

        let deleted = store
            .delete_stale_pending(Timestamp::now().minus_minutes(30))
            .await
            .unwrap();

        assert_eq!(deleted, 1);
        assert!(store.find_by_order_id(&stale.order_id).await.unwrap().is_none());
        assert!(store.find_by_order_id(&fresh.order_id).await.unwrap().is_some());
        assert!(store.find_by_order_id(&paid.order_id).await.unwrap().is_some());
    }

    // ════════════════════════════════════════════════════════════════════
    // Registry
    // ════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn lookup_is_case_sensitive() {
        let store = InMemoryBookingStore::new();
        store.seed_code(code("GmpAbc")).await;

        assert!(store.lookup("GmpAbc").await.unwrap().is_active());
        assert_eq!(store.lookup("GMPABC").await.unwrap(), LookupResult::NotFound);
    }

    #[tokio::test]
    async fn second_claim_reports_already_claimed() {
        let store = InMemoryBookingStore::new();
        store.seed_code(code("GMP1")).await;

        assert_eq!(store.claim("GMP1", &order("a")).await.unwrap(), ClaimOutcome::Claimed);
        assert_eq!(store.claim("GMP1", &order("b")).await.unwrap(), ClaimOutcome::AlreadyClaimed);
        assert_eq!(store.claim("NONE", &order("c")).await.unwrap(), ClaimOutcome::NotFound);
        assert_eq!(store.lookup("GMP1").await.unwrap(), LookupResult::NotFound);
    }

    #[tokio::test]
    async fn insert_if_absent_skips_existing() {
        let store = InMemoryBookingStore::new();
        assert!(store.insert_if_absent(&code("X1")).await.unwrap());
        assert!(!store.insert_if_absent(&code("X1")).await.unwrap());
    }

    #[tokio::test]
    async fn generate_stores_prefixed_codes() {
        let store = InMemoryBookingStore::new();
        let request = GenerateRequest::new(10, "GMP").unwrap();

        let codes = store.generate(&request).await.unwrap();

        assert_eq!(codes.len(), 10);
        for c in &codes {
            assert!(c.as_str().starts_with("GMP"));
            assert!(store.lookup(c.as_str()).await.unwrap().is_active());
        }
    }

    #[tokio::test]
    async fn update_rejects_amount_change_on_paid() {
        let store = InMemoryBookingStore::new();
        let paid = BookingRecord::paid(order("order_P"), new_booking("C", None, 100), "pay", Timestamp::now());
        store.insert(&paid).await.unwrap();

        let mut changed = paid.clone();
        changed.amount = crate::domain::foundation::Money::from_rupees(1);
        let err = store.update(&changed).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }
}
