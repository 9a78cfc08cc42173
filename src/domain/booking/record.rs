//! Booking rows: one per traveler per trip.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{PaymentStatus, ResolvedTraveler, Traveler};
use crate::domain::foundation::{Money, OrderId, StateMachine, Timestamp, ValidationError};
use crate::domain::membership::MembershipCode;
use crate::domain::pricing::{HotelTier, Quote, TravelMode};

/// Package as priced, with any Youth override already applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedPackage {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub num_days: u32,
    pub hotel_tier: HotelTier,
    pub travel_mode: TravelMode,
}

/// Everything needed to write a booking row, independent of its key and status.
///
/// This is also the payload kept in the recovery log when a paid booking
/// cannot be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBooking {
    pub traveler: Traveler,
    pub package: BookedPackage,
    pub membership_code: Option<MembershipCode>,
    pub amount: Money,
    pub note: Option<String>,
}

impl NewBooking {
    /// Combines a resolved traveler with their quote.
    pub fn from_quote(resolved: &ResolvedTraveler, quote: &Quote) -> Self {
        let mut traveler = resolved.traveler.clone();
        traveler.name = resolved.display_name();
        Self {
            traveler,
            package: BookedPackage {
                start_date: resolved.selection.start_date,
                end_date: resolved.selection.end_date,
                num_days: quote.num_days,
                hotel_tier: quote.hotel_tier,
                travel_mode: quote.travel_mode,
            },
            membership_code: resolved.selection.membership_code.clone(),
            amount: quote.amount,
            note: quote.note.clone(),
        }
    }

    pub fn has_membership(&self) -> bool {
        self.membership_code.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub order_id: OrderId,
    pub traveler: Traveler,
    pub package: BookedPackage,
    pub membership_code: Option<MembershipCode>,
    pub amount: Money,
    pub note: Option<String>,
    pub payment_status: PaymentStatus,
    pub payment_id: Option<String>,
    pub created_at: Timestamp,
}

impl BookingRecord {
    /// A reserved row awaiting payment.
    pub fn pending(order_id: OrderId, booking: NewBooking, now: Timestamp) -> Self {
        Self::from_parts(order_id, booking, PaymentStatus::Pending, None, now)
    }

    /// A row created directly in the Paid state.
    pub fn paid(order_id: OrderId, booking: NewBooking, payment_id: impl Into<String>, now: Timestamp) -> Self {
        Self::from_parts(order_id, booking, PaymentStatus::Paid, Some(payment_id.into()), now)
    }

    fn from_parts(
        order_id: OrderId,
        booking: NewBooking,
        payment_status: PaymentStatus,
        payment_id: Option<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            order_id,
            traveler: booking.traveler,
            package: booking.package,
            membership_code: booking.membership_code,
            amount: booking.amount,
            note: booking.note,
            payment_status,
            payment_id,
            created_at,
        }
    }

    pub fn has_membership(&self) -> bool {
        self.membership_code.is_some()
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    /// Promotes a Pending row: new key, payment id, Paid status. Amount is kept.
    pub fn promote(&mut self, order_id: OrderId, payment_id: impl Into<String>) -> Result<(), ValidationError> {
        self.payment_status = self.payment_status.transition_to(PaymentStatus::Paid)?;
        self.order_id = order_id;
        self.payment_id = Some(payment_id.into());
        Ok(())
    }

    /// Returns the payload this row was written from.
    pub fn to_new_booking(&self) -> NewBooking {
        NewBooking {
            traveler: self.traveler.clone(),
            package: self.package.clone(),
            membership_code: self.membership_code.clone(),
            amount: self.amount,
            note: self.note.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::domain::booking::traveler::fixtures::traveler;

    pub fn new_booking(name: &str, code: Option<&str>, rupees: u32) -> NewBooking {
        NewBooking {
            traveler: traveler(name, 35),
            package: BookedPackage {
                start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 3, 3).unwrap(),
                num_days: 3,
                hotel_tier: HotelTier::Standard,
                travel_mode: TravelMode::Train,
            },
            membership_code: code.map(|c| MembershipCode::new(c).unwrap()),
            amount: Money::from_rupees(rupees),
            note: None,
        }
    }
}
