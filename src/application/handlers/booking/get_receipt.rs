//! GetReceiptHandler - Rebuilds receipts from stored rows.
//!
//! Travelers look their receipt up by the order ids returned after payment.
//! Administrators regenerate the receipt of any row, optionally mailing it
//! again.

use std::sync::Arc;

use crate::domain::booking::{BookingError, BookingRecord, PaymentStatus, Receipt};
use crate::domain::foundation::OrderId;
use crate::ports::{BookingFilter, BookingRepository, ReceiptAttachment, ReceiptRenderer};

use super::ReceiptDispatcher;

/// Upper bound on ids in one receipt lookup.
pub const MAX_RECEIPT_ORDER_IDS: usize = 20;

#[derive(Debug, Clone)]
pub struct GetReceiptQuery {
    pub order_ids: Vec<OrderId>,
}

impl GetReceiptQuery {
    /// Parses a comma-separated id list such as `order_A_1,order_A_2`.
    pub fn parse(raw: &str) -> Result<Self, BookingError> {
        let order_ids = raw
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(OrderId::new)
            .collect::<Result<Vec<_>, _>>()?;

        if order_ids.is_empty() {
            return Err(BookingError::Validation("No order ids given".to_string()));
        }
        if order_ids.len() > MAX_RECEIPT_ORDER_IDS {
            return Err(BookingError::Validation(format!(
                "At most {} order ids per receipt",
                MAX_RECEIPT_ORDER_IDS
            )));
        }
        Ok(Self { order_ids })
    }
}

pub struct GetReceiptHandler {
    bookings: Arc<dyn BookingRepository>,
    renderer: Arc<dyn ReceiptRenderer>,
    dispatcher: Option<ReceiptDispatcher>,
}

impl GetReceiptHandler {
    pub fn new(bookings: Arc<dyn BookingRepository>, renderer: Arc<dyn ReceiptRenderer>) -> Self {
        Self {
            bookings,
            renderer,
            dispatcher: None,
        }
    }

    /// Enables `resend`.
    pub fn with_dispatcher(mut self, dispatcher: ReceiptDispatcher) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Receipt over the Paid rows among the given ids. Unknown and unpaid
    /// ids are skipped.
    ///
    /// # Errors
    ///
    /// - `NotFound` if none of the ids is a Paid row
    pub async fn handle(&self, query: &GetReceiptQuery) -> Result<Receipt, BookingError> {
        let mut records = Vec::with_capacity(query.order_ids.len());
        for order_id in &query.order_ids {
            match self.bookings.find_by_order_id(order_id).await? {
                Some(record) if record.is_paid() => {
                    if !records.iter().any(|r: &BookingRecord| r.order_id == record.order_id) {
                        records.push(record);
                    }
                }
                _ => {}
            }
        }

        if records.is_empty() {
            return Err(BookingError::NotFound("Receipt not found".to_string()));
        }
        Ok(Receipt::for_bookings(&records))
    }

    /// Rendered document for the same rows as `handle`.
    pub async fn download(&self, query: &GetReceiptQuery) -> Result<ReceiptAttachment, BookingError> {
        let receipt = self.handle(query).await?;
        Ok(self.renderer.render(&receipt)?)
    }

    /// Receipt for the party a row belongs to, in any payment state.
    ///
    /// Rows paid by the same payment are grouped together; a row without a
    /// payment id stands alone.
    pub async fn regenerate(&self, order_id: &OrderId) -> Result<Receipt, BookingError> {
        let record = self
            .bookings
            .find_by_order_id(order_id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("Booking {} not found", order_id)))?;

        let party = match &record.payment_id {
            Some(payment_id) => {
                let paid = self
                    .bookings
                    .list(&BookingFilter {
                        status: Some(PaymentStatus::Paid),
                        has_membership: None,
                    })
                    .await?;
                let mut party: Vec<BookingRecord> = paid
                    .into_iter()
                    .filter(|r| r.payment_id.as_deref() == Some(payment_id.as_str()))
                    .collect();
                if party.is_empty() {
                    party.push(record);
                }
                party
            }
            None => vec![record],
        };

        tracing::info!(order_id = %order_id, rows = party.len(), "Receipt regenerated by admin");
        Ok(Receipt::for_bookings(&party))
    }

    /// Regenerates the party receipt and mails it again. Returns the number
    /// of messages sent.
    pub async fn resend(&self, order_id: &OrderId) -> Result<usize, BookingError> {
        let dispatcher = self
            .dispatcher
            .as_ref()
            .ok_or_else(|| BookingError::Conflict("Receipt email is not configured".to_string()))?;
        let receipt = self.regenerate(order_id).await?;
        let sent = dispatcher.deliver(&receipt).await;
        tracing::info!(order_id = %order_id, sent, "Receipt resent by admin");
        Ok(sent)
    }
}
