//! ReceiptDispatcher - Mails confirmation receipts after payment.
//!
//! Delivery runs on a detached task so the payment response never waits on
//! email. Each distinct address gets its own freshly rendered attachment.
//! Failures are logged and otherwise ignored.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::domain::booking::{BookingRecord, Receipt};
use crate::ports::{ReceiptMailer, ReceiptRenderer};

#[derive(Clone)]
pub struct ReceiptDispatcher {
    renderer: Arc<dyn ReceiptRenderer>,
    mailer: Arc<dyn ReceiptMailer>,
}

impl ReceiptDispatcher {
    pub fn new(renderer: Arc<dyn ReceiptRenderer>, mailer: Arc<dyn ReceiptMailer>) -> Self {
        Self { renderer, mailer }
    }

    /// Spawns delivery for a paid party. The handle resolves to the number of
    /// messages sent.
    pub fn dispatch(&self, records: Vec<BookingRecord>) -> JoinHandle<usize> {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            let receipt = Receipt::for_bookings(&records);
            dispatcher.deliver(&receipt).await
        })
    }

    pub async fn deliver(&self, receipt: &Receipt) -> usize {
        if receipt.recipients().is_empty() {
            tracing::warn!(payment_id = ?receipt.payment_id, "Receipt has no email recipients");
            return 0;
        }

        let mut sent = 0;
        for to in receipt.recipients() {
            let attachment = match self.renderer.render(receipt) {
                Ok(attachment) => attachment,
                Err(err) => {
                    tracing::error!(to = %to, error = %err, "Failed to render receipt");
                    continue;
                }
            };
            match self.mailer.send(to, receipt, &attachment).await {
                Ok(()) => sent += 1,
                Err(err) => {
                    tracing::error!(to = %to, payment_id = ?receipt.payment_id, error = %err, "Failed to send receipt")
                }
            }
        }
        sent
    }
}

impl std::fmt::Debug for ReceiptDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReceiptDispatcher").finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::RecordingMailer;
    use super::*;
    use crate::adapters::email::TextReceiptRenderer;
    use crate::domain::booking::fixtures::new_booking;
    use crate::domain::foundation::{OrderId, Timestamp};

    fn paid(order: &str, email: &str) -> BookingRecord {
        let mut booking = new_booking("Asha", None, 100);
        booking.traveler.email = email.to_string();
        BookingRecord::paid(OrderId::new(order).unwrap(), booking, "pay_1", Timestamp::now())
    }

    #[tokio::test]
    async fn one_message_per_unique_address() {
        let mailer = Arc::new(RecordingMailer::default());
        let dispatcher = ReceiptDispatcher::new(Arc::new(TextReceiptRenderer::default()), mailer.clone());

        let sent = dispatcher
            .dispatch(vec![
                paid("o_1", "Family@Example.com"),
                paid("o_2", "family@example.com "),
                paid("o_3", "ravi@example.com"),
            ])
            .await
            .unwrap();

        assert_eq!(sent, 2);
        assert_eq!(mailer.recipients(), vec!["family@example.com", "ravi@example.com"]);
    }

    #[tokio::test]
    async fn failed_recipient_does_not_stop_others() {
        let mailer = Arc::new(RecordingMailer {
            fail_for: Some("a@example.com".to_string()),
            ..Default::default()
        });
        let dispatcher = ReceiptDispatcher::new(Arc::new(TextReceiptRenderer::default()), mailer.clone());

        let sent = dispatcher
            .dispatch(vec![paid("o_1", "a@example.com"), paid("o_2", "b@example.com")])
            .await
            .unwrap();

        assert_eq!(sent, 1);
        assert_eq!(mailer.recipients(), vec!["b@example.com"]);
    }
}
