//! Axum router configuration for booking endpoints.

use axum::{
    routing::{get, patch, post},
    Router,
};

use super::handlers::{
    add_code, cleanup_pending, confirm, create_order, create_registration, delete_booking,
    download_receipt, generate_codes, get_receipt, health, list_bookings, list_codes,
    list_recovery, quote, regenerate_receipt, resend_receipt, update_booking, verify_membership,
    verify_payment, BookingAppState,
};

/// Routes used by the registration form.
///
/// # Routes
/// - `POST /bookings/quote` - Price a party and open a draft
/// - `POST /bookings/confirm` - Write Pending rows
/// - `POST /bookings/order` - Open the gateway order
/// - `POST /bookings/verify-payment` - Gateway callback
/// - `POST /memberships/verify` - Check a membership code
/// - `GET /bookings/receipt/:order_ids` - Receipt for paid rows
/// - `GET /bookings/receipt/:order_ids/download` - Same receipt as a file
pub fn public_routes() -> Router<BookingAppState> {
    Router::new()
        .route("/bookings/quote", post(quote))
        .route("/bookings/confirm", post(confirm))
        .route("/bookings/order", post(create_order))
        .route("/bookings/verify-payment", post(verify_payment))
        .route("/bookings/receipt/:order_ids", get(get_receipt))
        .route("/bookings/receipt/:order_ids/download", get(download_receipt))
        .route("/memberships/verify", post(verify_membership))
}

/// Operator routes. Authentication is expected in front of this router.
pub fn admin_routes() -> Router<BookingAppState> {
    Router::new()
        .route("/memberships", get(list_codes).post(add_code))
        .route("/memberships/generate", post(generate_codes))
        .route("/bookings", get(list_bookings).post(create_registration))
        .route("/bookings/cleanup", post(cleanup_pending))
        .route(
            "/bookings/:order_id",
            patch(update_booking).delete(delete_booking),
        )
        .route(
            "/bookings/:order_id/receipt",
            get(regenerate_receipt).post(resend_receipt),
        )
        .route("/recovery", get(list_recovery))
}

/// Complete booking router, mounted at the application root.
///
/// ```ignore
/// let app = booking_router().with_state(state);
/// ```
pub fn booking_router() -> Router<BookingAppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api", public_routes())
        .nest("/api/admin", admin_routes())
}
