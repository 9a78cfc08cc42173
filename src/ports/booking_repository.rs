//! Booking repository port.
//!
//! Stores one row per traveler, keyed by a unique order id. Rows start
//! Pending under a placeholder id and are settled to Paid under the
//! gateway-derived id once a payment is verified.
//!
//! # Design
//!
//! - **Atomic settlement**: `settle` promotes or inserts every line of a
//!   payment and claims the membership codes involved in one transaction.
//! - **Conditional writes**: promotion only touches rows still Pending;
//!   stale cleanup only deletes rows still Pending.

use async_trait::async_trait;

use crate::domain::booking::{BookingRecord, NewBooking, PaymentStatus};
use crate::domain::foundation::{DomainError, OrderId, Timestamp};
use crate::domain::membership::ClaimOutcome;

/// One traveler of a verified payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementLine {
    /// Placeholder id of the Pending row, if one was created.
    pub pending_order_id: Option<OrderId>,
    /// Final key of the Paid row.
    pub order_id: OrderId,
    /// Payload used when the Pending row no longer exists.
    pub booking: NewBooking,
}

/// A verified payment covering one or more travelers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub payment_id: String,
    pub lines: Vec<SettlementLine>,
}

/// How a line reached the Paid state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementPath {
    /// The Pending row was promoted.
    Promoted,
    /// No Pending row was found; a Paid row was created from the payload.
    Inserted,
    /// A Paid row already existed under the final key; nothing changed.
    AlreadyPaid,
}

/// Result of settling one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettledLine {
    pub record: BookingRecord,
    pub path: SettlementPath,
    /// Outcome of the membership claim, when the line carries a code and
    /// was not already paid.
    pub claim: Option<ClaimOutcome>,
}

/// Filter for listing bookings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub status: Option<PaymentStatus>,
    pub has_membership: Option<bool>,
}

impl BookingFilter {
    pub fn matches(&self, record: &BookingRecord) -> bool {
        self.status.map_or(true, |s| record.payment_status == s)
            && self
                .has_membership
                .map_or(true, |m| record.has_membership() == m)
    }
}

/// Repository port for booking rows.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert Pending rows for a party, all or none.
    ///
    /// # Errors
    ///
    /// - `BookingExists` if any order id is taken
    /// - `DatabaseError` on persistence failure
    async fn insert_pending(&self, records: &[BookingRecord]) -> Result<(), DomainError>;

    /// Insert a single row in any state (administrative entry).
    ///
    /// # Errors
    ///
    /// - `BookingExists` if the order id is taken
    async fn insert(&self, record: &BookingRecord) -> Result<(), DomainError>;

    /// Settle a verified payment in one transaction.
    ///
    /// For each line: if a Paid row exists under `order_id` it is left alone;
    /// otherwise the Pending row is promoted, or a Paid row is inserted from
    /// the payload. Each newly paid line with a membership code claims it in
    /// the same transaction. A claim that is not `Claimed` does not abort.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure; nothing is committed
    async fn settle(&self, settlement: &Settlement) -> Result<Vec<SettledLine>, DomainError>;

    /// Find a row by its order id.
    async fn find_by_order_id(&self, order_id: &OrderId) -> Result<Option<BookingRecord>, DomainError>;

    /// List rows, oldest first.
    async fn list(&self, filter: &BookingFilter) -> Result<Vec<BookingRecord>, DomainError>;

    /// Overwrite an existing row's editable fields.
    ///
    /// # Errors
    ///
    /// - `BookingNotFound` if the row does not exist
    /// - `InvalidStateTransition` if the stored row is Paid and the amount differs
    async fn update(&self, record: &BookingRecord) -> Result<(), DomainError>;

    /// Delete a row. Returns false if it did not exist.
    async fn delete(&self, order_id: &OrderId) -> Result<bool, DomainError>;

    /// Delete Pending rows created before `cutoff`. Paid and Failed rows are kept.
    async fn delete_stale_pending(&self, cutoff: Timestamp) -> Result<u64, DomainError>;
}
