//! ListBookingsHandler - Booking rows for the admin dashboard.

use std::sync::Arc;

use crate::domain::booking::{BookingError, BookingRecord};
use crate::ports::{BookingFilter, BookingRepository};

pub struct ListBookingsHandler {
    bookings: Arc<dyn BookingRepository>,
}

impl ListBookingsHandler {
    pub fn new(bookings: Arc<dyn BookingRepository>) -> Self {
        Self { bookings }
    }

    /// Rows matching the filter, newest first.
    pub async fn handle(&self, filter: &BookingFilter) -> Result<Vec<BookingRecord>, BookingError> {
        let mut records = self.bookings.list(filter).await?;
        records.reverse();
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryBookingStore;
    use crate::domain::booking::fixtures::new_booking;
    use crate::domain::booking::PaymentStatus;
    use crate::domain::foundation::{OrderId, Timestamp};

    #[tokio::test]
    async fn filters_and_orders_newest_first() {
        let store = InMemoryBookingStore::new();
        let older = Timestamp::now().minus_minutes(10);
        store
            .insert(&BookingRecord::paid(OrderId::new("order_A").unwrap(), new_booking("Asha", None, 1), "pay_A", older))
            .await
            .unwrap();
        store
            .insert(&BookingRecord::paid(
                OrderId::new("order_B").unwrap(),
                new_booking("Ravi", Some("GMP11111"), 1),
                "pay_B",
                Timestamp::now(),
            ))
            .await
            .unwrap();
        store
            .insert_pending(&[BookingRecord::pending(OrderId::pending(false), new_booking("Mira", None, 1), Timestamp::now())])
            .await
            .unwrap();
        let handler = ListBookingsHandler::new(Arc::new(store));

        let paid = handler
            .handle(&BookingFilter {
                status: Some(PaymentStatus::Paid),
                has_membership: None,
            })
            .await
            .unwrap();
        let ids: Vec<&str> = paid.iter().map(|r| r.order_id.as_str()).collect();
        assert_eq!(ids, vec!["order_B", "order_A"]);

        let members = handler
            .handle(&BookingFilter {
                status: None,
                has_membership: Some(true),
            })
            .await
            .unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].traveler.name, "Ravi");
    }
}
