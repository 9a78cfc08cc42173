//! CreateRegistrationHandler - Registrations entered by an administrator.
//!
//! The administrator supplies the base amount and a percentage discount
//! instead of using the calculator. No membership code is claimed.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::booking::{
    BookedPackage, BookingError, BookingRecord, NewBooking, PaymentStatus, Traveler,
};
use crate::domain::foundation::{Money, OrderId, Timestamp};
use crate::domain::membership::MembershipCode;
use crate::domain::pricing::{HotelTier, JourneyDates, TravelMode};
use crate::ports::BookingRepository;

#[derive(Debug, Clone)]
pub struct CreateRegistrationCommand {
    pub traveler: Traveler,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub hotel_tier: HotelTier,
    pub travel_mode: TravelMode,
    pub membership_code: Option<String>,
    pub base_amount: Money,
    /// 0..=100
    pub discount_percent: u8,
    pub payment_status: PaymentStatus,
    /// Defaults to `admin_<12 hex>` when blank.
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
}

pub struct CreateRegistrationHandler {
    bookings: Arc<dyn BookingRepository>,
}

impl CreateRegistrationHandler {
    pub fn new(bookings: Arc<dyn BookingRepository>) -> Self {
        Self { bookings }
    }

    pub async fn handle(&self, cmd: CreateRegistrationCommand) -> Result<BookingRecord, BookingError> {
        cmd.traveler.validate()?;
        let dates = JourneyDates::new(cmd.start_date, cmd.end_date)?;
        let amount = cmd.base_amount.discounted_by(cmd.discount_percent)?;

        let membership_code = cmd
            .membership_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(MembershipCode::new)
            .transpose()?;
        let order_id = match cmd.order_id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => OrderId::new(id)?,
            None => OrderId::admin(),
        };

        let booking = NewBooking {
            traveler: cmd.traveler,
            package: BookedPackage {
                start_date: dates.start(),
                end_date: dates.end(),
                num_days: dates.num_days(),
                hotel_tier: cmd.hotel_tier,
                travel_mode: cmd.travel_mode,
            },
            membership_code,
            amount,
            note: None,
        };
        let mut record = BookingRecord::pending(order_id, booking, Timestamp::now());
        record.payment_status = cmd.payment_status;
        record.payment_id = cmd.payment_id.filter(|p| !p.trim().is_empty());

        self.bookings.insert(&record).await?;
        tracing::info!(
            order_id = %record.order_id,
            amount = %record.amount,
            discount_percent = cmd.discount_percent,
            "Registration created by admin"
        );
        Ok(record)
    }
}
