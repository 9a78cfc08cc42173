//! PostgreSQL adapters.

mod booking_repository;
mod membership_registry;

pub use booking_repository::PostgresBookingRepository;
pub use membership_registry::PostgresMembershipRegistry;
