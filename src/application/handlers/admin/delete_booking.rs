//! DeleteBookingHandler - Removes a booking row.

use std::sync::Arc;

use crate::domain::booking::BookingError;
use crate::domain::foundation::OrderId;
use crate::ports::BookingRepository;

pub struct DeleteBookingHandler {
    bookings: Arc<dyn BookingRepository>,
}

impl DeleteBookingHandler {
    pub fn new(bookings: Arc<dyn BookingRepository>) -> Self {
        Self { bookings }
    }

    pub async fn handle(&self, order_id: &OrderId) -> Result<(), BookingError> {
        if !self.bookings.delete(order_id).await? {
            return Err(BookingError::NotFound(format!("Booking {} not found", order_id)));
        }
        tracing::info!(order_id = %order_id, "Booking deleted by admin");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryBookingStore;
    use crate::domain::booking::fixtures::new_booking;
    use crate::domain::booking::BookingRecord;
    use crate::domain::foundation::Timestamp;

    #[tokio::test]
    async fn deletes_existing_then_reports_missing() {
        let store = InMemoryBookingStore::new();
        let order_id = OrderId::new("order_A").unwrap();
        store
            .insert(&BookingRecord::paid(order_id.clone(), new_booking("Asha", None, 1), "pay", Timestamp::now()))
            .await
            .unwrap();
        let handler = DeleteBookingHandler::new(Arc::new(store.clone()));

        handler.handle(&order_id).await.unwrap();
        assert_eq!(store.booking_count().await, 0);
        assert!(matches!(handler.handle(&order_id).await, Err(BookingError::NotFound(_))));
    }
}
