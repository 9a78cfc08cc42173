//! Plain-text receipt renderer.

use std::fmt::Write;

use crate::domain::booking::Receipt;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{ReceiptAttachment, ReceiptRenderer};

const TRAVEL_NOTICE: &str =
    "Train and flight tickets are booked separately; our team will contact you with details.";

/// Renders a receipt as a fixed-layout text document.
#[derive(Debug, Clone)]
pub struct TextReceiptRenderer {
    organization: String,
}

impl TextReceiptRenderer {
    pub fn new(organization: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
        }
    }

    fn write_document(&self, receipt: &Receipt) -> Result<String, std::fmt::Error> {
        let mut out = String::new();
        writeln!(out, "{}", self.organization)?;
        writeln!(out, "Booking receipt")?;
        writeln!(out, "Issued: {}", receipt.issued_at.as_datetime().format("%d %b %Y %H:%M UTC"))?;
        if let Some(payment_id) = &receipt.payment_id {
            writeln!(out, "Payment: {}", payment_id)?;
        }
        writeln!(out)?;

        for (i, line) in receipt.lines.iter().enumerate() {
            writeln!(out, "{}. {} (age {})", i + 1, line.name, line.age)?;
            writeln!(out, "   Order:  {}", line.order_id)?;
            writeln!(
                out,
                "   Dates:  {} to {} ({} days)",
                line.start_date.format("%d %b %Y"),
                line.end_date.format("%d %b %Y"),
                line.num_days
            )?;
            writeln!(out, "   Hotel:  {}   Travel: {}", line.hotel_tier, line.travel_mode)?;
            writeln!(out, "   Amount: {}", line.amount)?;
            if let Some(note) = &line.note {
                writeln!(out, "   Note:   {}", note)?;
            }
        }

        writeln!(out)?;
        writeln!(out, "Total paid: {}", receipt.total)?;
        if receipt.has_pending_travel() {
            writeln!(out)?;
            writeln!(out, "{}", TRAVEL_NOTICE)?;
        }
        Ok(out)
    }
}

impl Default for TextReceiptRenderer {
    fn default() -> Self {
        Self::new("Yatra Booking")
    }
}

impl ReceiptRenderer for TextReceiptRenderer {
    fn render(&self, receipt: &Receipt) -> Result<ReceiptAttachment, DomainError> {
        let body = self.write_document(receipt).map_err(|e| {
            DomainError::new(ErrorCode::InternalError, format!("Failed to render receipt: {}", e))
        })?;
        let stem = receipt.payment_id.as_deref().unwrap_or("booking");

        Ok(ReceiptAttachment {
            filename: format!("receipt_{}.txt", stem),
            content_type: "text/plain; charset=utf-8".to_string(),
            bytes: body.into_bytes(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::fixtures::new_booking;
    use crate::domain::booking::BookingRecord;
    use crate::domain::foundation::{OrderId, Timestamp};

    fn receipt() -> Receipt {
        let booking = new_booking("Asha", None, 12000);
        let record = BookingRecord::paid(OrderId::new("order_A").unwrap(), booking, "pay_9", Timestamp::now());
        Receipt::for_bookings(&[record])
    }

    #[test]
    fn attachment_is_named_after_payment() {
        let attachment = TextReceiptRenderer::default().render(&receipt()).unwrap();
        assert_eq!(attachment.filename, "receipt_pay_9.txt");
        assert!(attachment.content_type.starts_with("text/plain"));
    }

    #[test]
    fn document_lists_travelers_and_total() {
        let attachment = TextReceiptRenderer::new("Test Yatra").render(&receipt()).unwrap();
        let text = String::from_utf8(attachment.bytes).unwrap();

        assert!(text.starts_with("Test Yatra"));
        assert!(text.contains("1. Asha"));
        assert!(text.contains("order_A"));
        assert!(text.contains("Total paid: ₹12000.00"));
    }
}
