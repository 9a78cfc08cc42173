//! RegistrationCheckout - Drives a party from quote to paid rows.
//!
//! Steps, each keyed by the draft token:
//! 1. `quote` prices the party and stores a draft
//! 2. `confirm` writes Pending rows for the draft
//! 3. `create_order` opens the gateway order for the draft total
//! 4. `verify_payment` finalizes the rows and discards the draft

use std::sync::Arc;

use crate::domain::booking::{BookingError, PartyMember, RegistrationDraft};
use crate::domain::foundation::DraftToken;
use crate::ports::{DraftStore, GatewayOrder};

use super::{
    BookingReconciler, CreateGatewayOrderCommand, CreateGatewayOrderHandler, FinalizeOutcome,
    PartyLine, PaymentProof, QuotePartyCommand, QuotePartyHandler, QuotePartyResult,
    RegistrationGate,
};

pub const DEFAULT_DRAFT_TTL_MINUTES: i64 = 60;

/// Recovery log reason for a verified payment whose draft is gone.
pub const DRAFT_MISSING: &str = "draft missing";

/// A quote together with the draft that holds it.
#[derive(Debug, Clone)]
pub struct QuotedDraft {
    pub draft: RegistrationDraft,
    pub quote: QuotePartyResult,
}

pub struct RegistrationCheckout {
    quotes: Arc<QuotePartyHandler>,
    orders: Arc<CreateGatewayOrderHandler>,
    reconciler: Arc<BookingReconciler>,
    drafts: Arc<dyn DraftStore>,
    gate: RegistrationGate,
    draft_ttl_minutes: i64,
}

impl RegistrationCheckout {
    pub fn new(
        quotes: Arc<QuotePartyHandler>,
        orders: Arc<CreateGatewayOrderHandler>,
        reconciler: Arc<BookingReconciler>,
        drafts: Arc<dyn DraftStore>,
        gate: RegistrationGate,
    ) -> Self {
        Self {
            quotes,
            orders,
            reconciler,
            drafts,
            gate,
            draft_ttl_minutes: DEFAULT_DRAFT_TTL_MINUTES,
        }
    }

    pub fn with_draft_ttl_minutes(mut self, minutes: i64) -> Self {
        self.draft_ttl_minutes = minutes;
        self
    }

    pub async fn quote(&self, members: Vec<PartyMember>) -> Result<QuotedDraft, BookingError> {
        let quote = self
            .quotes
            .handle(QuotePartyCommand {
                members: members.clone(),
            })
            .await?;
        let draft = RegistrationDraft::new(members, quote.bookings(), self.draft_ttl_minutes);
        self.drafts.put(&draft).await?;

        tracing::info!(draft = %draft.token, travelers = draft.bookings.len(), total = %draft.total, "Registration draft created");
        Ok(QuotedDraft { draft, quote })
    }

    /// Writes Pending rows for the draft. Confirming twice returns the same rows.
    pub async fn confirm(&self, token: &DraftToken) -> Result<RegistrationDraft, BookingError> {
        self.gate.ensure_open()?;
        let mut draft = self.load(token).await?;
        if draft.is_confirmed() {
            return Ok(draft);
        }

        draft.pending_order_ids = self
            .reconciler
            .create_pending_party(draft.bookings.clone())
            .await?;
        self.drafts.put(&draft).await?;
        Ok(draft)
    }

    /// Opens a gateway order for the draft total, reusing one already opened.
    pub async fn create_order(&self, token: &DraftToken) -> Result<GatewayOrder, BookingError> {
        let mut draft = self.load(token).await?;
        if let Some(id) = &draft.gateway_order_id {
            return Ok(GatewayOrder {
                id: id.to_string(),
                amount: draft.total.paise(),
                currency: self.orders.currency().to_string(),
                status: "created".to_string(),
            });
        }

        let order = self
            .orders
            .handle(CreateGatewayOrderCommand {
                amount: draft.total,
                receipt: Some(draft.token.to_string()),
            })
            .await?;
        draft.gateway_order_id = Some(order.id.parse()?);
        self.drafts.put(&draft).await?;
        Ok(order)
    }

    /// Finalizes the draft's travelers against a gateway callback.
    ///
    /// The signature is checked before the draft is read. A verified
    /// callback whose draft is gone (already finalized, or expired) resolves
    /// to the stored Paid rows, or else is written to the recovery log.
    ///
    /// # Errors
    ///
    /// - `VerificationFailed` if the signature does not match or the callback
    ///   is for a different gateway order
    /// - `PersistenceFailed` if the payment could not be stored
    pub async fn verify_payment(
        &self,
        token: &DraftToken,
        proof: &PaymentProof,
    ) -> Result<FinalizeOutcome, BookingError> {
        self.reconciler.verify(proof)?;

        let draft = match self.drafts.get(token).await {
            Ok(Some(draft)) => draft,
            Ok(None) => {
                tracing::warn!(
                    draft = %token,
                    order_id = %proof.gateway_order_id,
                    payment_id = %proof.payment_id,
                    "Payment callback for a missing draft"
                );
                return self.reconciler.resolve_without_payload(proof, DRAFT_MISSING).await;
            }
            Err(err) => {
                tracing::error!(
                    draft = %token,
                    order_id = %proof.gateway_order_id,
                    payment_id = %proof.payment_id,
                    error = %err,
                    "Draft store unavailable during payment callback"
                );
                let reason = format!("draft unavailable: {}", err.message);
                return self.reconciler.resolve_without_payload(proof, &reason).await;
            }
        };

        if draft
            .gateway_order_id
            .as_ref()
            .is_some_and(|id| *id != proof.gateway_order_id)
        {
            tracing::warn!(
                draft = %token,
                order_id = %proof.gateway_order_id,
                "Payment callback does not match the draft's gateway order"
            );
            return Err(BookingError::VerificationFailed);
        }

        let mut pending = draft.pending_order_ids.iter().cloned();
        let lines = draft
            .bookings
            .iter()
            .map(|booking| PartyLine {
                pending_order_id: pending.next(),
                booking: booking.clone(),
            })
            .collect();

        let outcome = self.reconciler.finalize_party(proof, lines).await?;
        if let Err(err) = self.drafts.remove(token).await {
            tracing::warn!(draft = %token, error = %err, "Failed to discard finalized draft");
        }
        Ok(outcome)
    }

    async fn load(&self, token: &DraftToken) -> Result<RegistrationDraft, BookingError> {
        self.drafts.get(token).await?.ok_or_else(|| {
            BookingError::NotFound("Registration has expired. Please start again.".to_string())
        })
    }
}
