//! Booking confirmation receipts.

use serde::{Deserialize, Serialize};

use super::BookingRecord;
use crate::domain::foundation::{Money, Timestamp};
use crate::domain::pricing::{AgeBracket, HotelTier, TravelMode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub order_id: String,
    pub name: String,
    pub age: i32,
    pub hotel_tier: HotelTier,
    pub travel_mode: TravelMode,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub num_days: u32,
    pub amount: Money,
    pub note: Option<String>,
}

/// Summary of a paid party, sent to every distinct email address in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub payment_id: Option<String>,
    pub lines: Vec<ReceiptLine>,
    pub total: Money,
    pub issued_at: Timestamp,
    recipients: Vec<String>,
}

impl Receipt {
    /// Builds the receipt for a set of rows. Adults are listed before
    /// minors, each group by name.
    pub fn for_bookings(records: &[BookingRecord]) -> Self {
        let mut lines: Vec<ReceiptLine> = records
            .iter()
            .map(|r| ReceiptLine {
                order_id: r.order_id.to_string(),
                name: r.traveler.name.clone(),
                age: r.traveler.age,
                hotel_tier: r.package.hotel_tier,
                travel_mode: r.package.travel_mode,
                start_date: r.package.start_date,
                end_date: r.package.end_date,
                num_days: r.package.num_days,
                amount: r.amount,
                note: r.note.clone(),
            })
            .collect();
        lines.sort_by(|a, b| {
            let minor = |l: &ReceiptLine| AgeBracket::for_age(l.age).is_minor();
            minor(a).cmp(&minor(b)).then_with(|| a.name.cmp(&b.name))
        });

        let mut recipients: Vec<String> = Vec::new();
        for email in records.iter().filter_map(|r| r.traveler.normalized_email()) {
            if !recipients.contains(&email) {
                recipients.push(email);
            }
        }

        Self {
            payment_id: records.iter().find_map(|r| r.payment_id.clone()),
            total: lines.iter().map(|l| l.amount).sum(),
            lines,
            issued_at: Timestamp::now(),
            recipients,
        }
    }

    /// Distinct addresses (trimmed, lowercased), in first-seen order.
    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    /// Whether any line has a travel mode that is booked separately.
    pub fn has_pending_travel(&self) -> bool {
        self.lines
            .iter()
            .any(|l| matches!(l.travel_mode, TravelMode::Train | TravelMode::Flight))
    }
}
