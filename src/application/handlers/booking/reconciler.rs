//! BookingReconciler - Moves bookings from Pending to Paid.
//!
//! Pending rows are written before the traveler is sent to the gateway. When
//! the gateway calls back, the signature is checked and every row of the
//! payment is settled in one repository transaction, together with the
//! membership claims. A verified payment that cannot be stored is written to
//! the recovery log so it can be replayed by hand.

use std::sync::Arc;

use crate::domain::booking::{
    BookingError, BookingRecord, NewBooking, PaymentSignatureVerifier, PaymentStatus,
    SUPPORT_MESSAGE,
};
use crate::domain::foundation::{DomainError, OrderId, Timestamp};
use crate::domain::membership::ClaimOutcome;
use crate::ports::{
    BookingRepository, RecoveryEntry, RecoveryLog, SettledLine, Settlement, SettlementLine,
    SettlementPath,
};

use super::ReceiptDispatcher;

/// Pending rows older than this are removed by the cleanup sweep.
pub const DEFAULT_PENDING_TTL_MINUTES: i64 = 30;

/// Gateway callback data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentProof {
    pub gateway_order_id: OrderId,
    pub payment_id: String,
    pub signature: String,
}

/// One traveler of a payment being finalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyLine {
    pub pending_order_id: Option<OrderId>,
    pub booking: NewBooking,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// At least one row became Paid during this call.
    Paid(Vec<BookingRecord>),
    /// Every row was already Paid; nothing changed.
    AlreadyPaid(Vec<BookingRecord>),
}

impl FinalizeOutcome {
    pub fn records(&self) -> &[BookingRecord] {
        match self {
            FinalizeOutcome::Paid(records) | FinalizeOutcome::AlreadyPaid(records) => records,
        }
    }

    pub fn is_already_paid(&self) -> bool {
        matches!(self, FinalizeOutcome::AlreadyPaid(_))
    }
}

pub struct BookingReconciler {
    bookings: Arc<dyn BookingRepository>,
    recovery_log: Arc<dyn RecoveryLog>,
    verifier: PaymentSignatureVerifier,
    receipts: Option<ReceiptDispatcher>,
}

impl BookingReconciler {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        recovery_log: Arc<dyn RecoveryLog>,
        verifier: PaymentSignatureVerifier,
    ) -> Self {
        Self {
            bookings,
            recovery_log,
            verifier,
            receipts: None,
        }
    }

    /// Mail receipts after each successful finalize.
    pub fn with_receipts(mut self, receipts: ReceiptDispatcher) -> Self {
        self.receipts = Some(receipts);
        self
    }

    /// Stores one Pending row and returns its placeholder id.
    pub async fn create_pending(&self, booking: NewBooking) -> Result<OrderId, BookingError> {
        let mut ids = self.create_pending_party(vec![booking]).await?;
        ids.pop()
            .ok_or_else(|| BookingError::Internal("no pending id issued".to_string()))
    }

    /// Stores Pending rows for a whole party, all or none.
    pub async fn create_pending_party(&self, bookings: Vec<NewBooking>) -> Result<Vec<OrderId>, BookingError> {
        if bookings.is_empty() {
            return Err(BookingError::Validation("No travelers to book".to_string()));
        }
        let now = Timestamp::now();
        let records: Vec<BookingRecord> = bookings
            .into_iter()
            .map(|b| BookingRecord::pending(OrderId::pending(b.has_membership()), b, now))
            .collect();

        self.bookings.insert_pending(&records).await?;

        let ids: Vec<OrderId> = records.into_iter().map(|r| r.order_id).collect();
        for id in &ids {
            tracing::info!(order_id = %id, "Pending booking created");
        }
        Ok(ids)
    }

    /// Finalizes a single-traveler payment.
    pub async fn finalize(
        &self,
        pending_order_id: Option<OrderId>,
        proof: &PaymentProof,
        booking: NewBooking,
    ) -> Result<FinalizeOutcome, BookingError> {
        self.finalize_party(
            proof,
            vec![PartyLine {
                pending_order_id,
                booking,
            }],
        )
        .await
    }

    /// Verifies the payment once, then settles every traveler of it.
    ///
    /// Row keys derive from the gateway order id, so a repeated callback for
    /// the same payment returns `AlreadyPaid` instead of writing again.
    ///
    /// # Errors
    ///
    /// - `VerificationFailed` if the signature does not match; nothing is written
    /// - `PersistenceFailed` if the rows could not be stored; the payload is
    ///   in the recovery log
    pub async fn finalize_party(
        &self,
        proof: &PaymentProof,
        lines: Vec<PartyLine>,
    ) -> Result<FinalizeOutcome, BookingError> {
        if lines.is_empty() {
            return Err(BookingError::Validation("No travelers to finalize".to_string()));
        }
        self.verify(proof)?;

        let party_size = lines.len();
        let settlement = Settlement {
            payment_id: proof.payment_id.clone(),
            lines: lines
                .into_iter()
                .enumerate()
                .map(|(i, line)| SettlementLine {
                    pending_order_id: line.pending_order_id,
                    order_id: OrderId::for_party_member(&proof.gateway_order_id, i, party_size),
                    booking: line.booking,
                })
                .collect(),
        };

        let settled = match self.bookings.settle(&settlement).await {
            Ok(settled) => settled,
            Err(err) => {
                let payload = settlement.lines.into_iter().map(|l| l.booking).collect();
                return Err(self.record_unsaved(proof, payload, err.message).await);
            }
        };

        for line in &settled {
            log_settled_line(line, &proof.payment_id);
        }

        let newly_paid = settled.iter().any(|l| l.path != SettlementPath::AlreadyPaid);
        let records: Vec<BookingRecord> = settled.into_iter().map(|l| l.record).collect();

        if !newly_paid {
            tracing::info!(
                order_id = %proof.gateway_order_id,
                payment_id = %proof.payment_id,
                "Payment already finalized"
            );
            return Ok(FinalizeOutcome::AlreadyPaid(records));
        }

        if let Some(receipts) = &self.receipts {
            receipts.dispatch(records.clone());
        }
        Ok(FinalizeOutcome::Paid(records))
    }

    /// Checks the gateway signature of a callback. Nothing is read or written.
    pub fn verify(&self, proof: &PaymentProof) -> Result<(), BookingError> {
        if self
            .verifier
            .verify(proof.gateway_order_id.as_str(), &proof.payment_id, &proof.signature)
        {
            return Ok(());
        }
        tracing::warn!(
            order_id = %proof.gateway_order_id,
            payment_id = %proof.payment_id,
            "Payment signature verification failed"
        );
        Err(BookingError::VerificationFailed)
    }

    /// Resolves a verified callback that arrived without its traveler payload.
    ///
    /// Rows already Paid under the gateway order id, or under its party
    /// suffixes, are returned as `AlreadyPaid`. Anything else is a captured
    /// payment with nothing to store, so it goes to the recovery log.
    ///
    /// # Errors
    ///
    /// - `VerificationFailed` if the signature does not match
    /// - `PersistenceFailed` once the payment has been written to the recovery log
    pub async fn resolve_without_payload(
        &self,
        proof: &PaymentProof,
        reason: &str,
    ) -> Result<FinalizeOutcome, BookingError> {
        self.verify(proof)?;

        let paid = match self.find_paid(&proof.gateway_order_id).await {
            Ok(paid) => paid,
            Err(err) => {
                let reason = format!("{reason}; lookup failed: {}", err.message);
                return Err(self.record_unsaved(proof, Vec::new(), reason).await);
            }
        };
        if paid.is_empty() {
            return Err(self.record_unsaved(proof, Vec::new(), reason.to_string()).await);
        }

        tracing::info!(
            order_id = %proof.gateway_order_id,
            payment_id = %proof.payment_id,
            rows = paid.len(),
            "Payment already finalized"
        );
        Ok(FinalizeOutcome::AlreadyPaid(paid))
    }

    /// Paid rows keyed by a gateway order id, whether single or a party.
    async fn find_paid(&self, gateway_order_id: &OrderId) -> Result<Vec<BookingRecord>, DomainError> {
        if let Some(record) = self.bookings.find_by_order_id(gateway_order_id).await? {
            if record.payment_status == PaymentStatus::Paid {
                return Ok(vec![record]);
            }
            return Ok(Vec::new());
        }

        // Party suffixes start at _1 and are contiguous.
        let mut paid = Vec::new();
        for index in 0.. {
            let order_id = OrderId::party_suffixed(gateway_order_id, index);
            match self.bookings.find_by_order_id(&order_id).await? {
                Some(record) if record.payment_status == PaymentStatus::Paid => paid.push(record),
                Some(_) => {}
                None => break,
            }
        }
        Ok(paid)
    }

    /// Deletes Pending rows older than `max_age_minutes`. Paid rows are never touched.
    pub async fn cleanup_stale(&self, max_age_minutes: i64) -> Result<u64, BookingError> {
        let cutoff = Timestamp::now().minus_minutes(max_age_minutes);
        let deleted = self.bookings.delete_stale_pending(cutoff).await?;
        if deleted > 0 {
            tracing::info!(deleted, max_age_minutes, "Stale pending bookings removed");
        }
        Ok(deleted)
    }

    async fn record_unsaved(
        &self,
        proof: &PaymentProof,
        payload: Vec<NewBooking>,
        reason: String,
    ) -> BookingError {
        tracing::error!(
            order_id = %proof.gateway_order_id,
            payment_id = %proof.payment_id,
            error = %reason,
            "Paid booking could not be saved"
        );

        let entry = RecoveryEntry {
            timestamp: Timestamp::now(),
            payment_id: proof.payment_id.clone(),
            order_id: proof.gateway_order_id.to_string(),
            error: reason.clone(),
            full_booking_payload: payload,
        };
        if let Err(log_err) = self.recovery_log.append(&entry).await {
            tracing::error!(
                order_id = %proof.gateway_order_id,
                payment_id = %proof.payment_id,
                error = %log_err,
                payload = %serde_json::to_string(&entry).unwrap_or_default(),
                "Recovery log write failed"
            );
        }

        BookingError::PersistenceFailed {
            payment_id: proof.payment_id.clone(),
            reason: SUPPORT_MESSAGE.to_string(),
        }
    }
}

fn log_settled_line(line: &SettledLine, payment_id: &str) {
    let order_id = &line.record.order_id;
    match line.path {
        SettlementPath::Promoted => tracing::info!(order_id = %order_id, payment_id, "Pending booking marked paid"),
        SettlementPath::Inserted => tracing::warn!(order_id = %order_id, payment_id, "Pending booking missing, paid booking created from payload"),
        SettlementPath::AlreadyPaid => tracing::debug!(order_id = %order_id, payment_id, "Booking already paid"),
    }

    if let (Some(code), Some(outcome)) = (&line.record.membership_code, line.claim) {
        if outcome == ClaimOutcome::Claimed {
            tracing::info!(order_id = %order_id, code = %code, "Membership code consumed");
        } else {
            tracing::warn!(
                order_id = %order_id,
                code = %code,
                outcome = ?outcome,
                "Membership code not claimed; booking kept as paid"
            );
        }
    }
}
