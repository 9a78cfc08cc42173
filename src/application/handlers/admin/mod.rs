//! Admin handlers.
//!
//! Record edits, manual registrations, dashboard listings and membership
//! code management.
//! Callers are expected to have authenticated the administrator.

mod create_registration;
mod delete_booking;
mod generate_codes;
mod list_bookings;
mod membership_codes;
mod recovery_entries;
mod update_booking;

pub use create_registration::{CreateRegistrationCommand, CreateRegistrationHandler};
pub use delete_booking::DeleteBookingHandler;
pub use generate_codes::{GenerateCodesCommand, GenerateCodesHandler, GenerateCodesResult};
pub use list_bookings::ListBookingsHandler;
pub use membership_codes::{AddCodeCommand, AddCodeHandler, ListCodesHandler};
pub use recovery_entries::ListRecoveryEntriesHandler;
pub use update_booking::{UpdateBookingCommand, UpdateBookingHandler};
