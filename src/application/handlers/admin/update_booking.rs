//! UpdateBookingHandler - Allow-listed edits to a stored booking.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::booking::{BookingError, BookingRecord, BookingUpdate};
use crate::domain::foundation::OrderId;
use crate::ports::BookingRepository;

#[derive(Debug, Clone)]
pub struct UpdateBookingCommand {
    pub order_id: OrderId,
    pub fields: BTreeMap<String, String>,
}

pub struct UpdateBookingHandler {
    bookings: Arc<dyn BookingRepository>,
}

impl UpdateBookingHandler {
    pub fn new(bookings: Arc<dyn BookingRepository>) -> Self {
        Self { bookings }
    }

    pub async fn handle(&self, cmd: UpdateBookingCommand) -> Result<BookingRecord, BookingError> {
        let update = BookingUpdate::from_fields(&cmd.fields)?;
        if update.is_empty() {
            return Err(BookingError::Validation("No fields to update".to_string()));
        }

        let current = self
            .bookings
            .find_by_order_id(&cmd.order_id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("Booking {} not found", cmd.order_id)))?;

        let updated = update.apply(&current)?;
        self.bookings.update(&updated).await?;

        let fields: Vec<&str> = cmd.fields.keys().map(String::as_str).collect();
        tracing::info!(order_id = %cmd.order_id, fields = ?fields, "Booking updated by admin");
        Ok(updated)
    }
}
