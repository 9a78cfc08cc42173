//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `BookingRepository` - Booking rows and payment settlement
//! - `MembershipRegistry` - Single-use membership codes
//! - `DraftStore` - Registration drafts with expiry
//! - `RecoveryLog` - Paid-but-unsaved bookings
//!
//! ## External Service Ports
//!
//! - `PaymentGateway` - Order creation
//! - `ReceiptRenderer` / `ReceiptMailer` - Confirmation delivery

mod booking_repository;
mod draft_store;
mod membership_registry;
mod payment_gateway;
mod receipt;
mod recovery_log;

pub use booking_repository::{
    BookingFilter, BookingRepository, SettledLine, Settlement, SettlementLine, SettlementPath,
};
pub use draft_store::DraftStore;
pub use membership_registry::MembershipRegistry;
pub use payment_gateway::{
    CreateOrderRequest, GatewayError, GatewayErrorCode, GatewayOrder, PaymentGateway,
};
pub use receipt::{ReceiptAttachment, ReceiptMailer, ReceiptRenderer};
pub use recovery_log::{RecoveryEntry, RecoveryLog};
