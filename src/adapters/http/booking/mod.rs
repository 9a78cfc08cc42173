//! HTTP adapter for booking endpoints.
//!
//! Exposes the registration flow and the operator surface via REST API:
//! - `POST /api/bookings/quote` - Price a party and open a draft
//! - `POST /api/bookings/confirm` - Write Pending rows for a draft
//! - `POST /api/bookings/order` - Open the gateway order
//! - `POST /api/bookings/verify-payment` - Finalize after the gateway callback
//! - `POST /api/memberships/verify` - Check a membership code
//! - `POST /api/admin/memberships/generate` - Bulk-generate codes
//! - `POST /api/admin/bookings` - Admin-entered registration
//! - `POST /api/admin/bookings/cleanup` - Remove stale Pending rows
//! - `PATCH /api/admin/bookings/:order_id` - Edit a booking
//! - `DELETE /api/admin/bookings/:order_id` - Remove a booking

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{BookingApiError, BookingAppState};
pub use routes::booking_router;
