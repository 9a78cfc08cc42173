//! Booking handlers.
//!
//! ## Commands
//! - Quoting a party and keeping it as a draft
//! - Writing Pending rows and opening the gateway order
//! - Finalizing a verified payment
//! - Sweeping stale Pending rows
//!
//! ## Queries
//! - Verifying a membership code
//! - Rebuilding receipts from stored rows

mod checkout;
mod create_gateway_order;
mod get_receipt;
mod quote_party;
mod receipts;
mod reconciler;
mod registration_gate;
mod verify_membership;

pub use checkout::{QuotedDraft, RegistrationCheckout, DEFAULT_DRAFT_TTL_MINUTES, DRAFT_MISSING};
pub use create_gateway_order::{
    CreateGatewayOrderCommand, CreateGatewayOrderHandler, DEFAULT_CURRENCY,
};
pub use get_receipt::{GetReceiptHandler, GetReceiptQuery, MAX_RECEIPT_ORDER_IDS};
pub use quote_party::{QuotePartyCommand, QuotePartyHandler, QuotePartyResult, TravelerQuote};
pub use receipts::ReceiptDispatcher;
pub use reconciler::{
    BookingReconciler, FinalizeOutcome, PartyLine, PaymentProof, DEFAULT_PENDING_TTL_MINUTES,
};
pub use registration_gate::{RegistrationGate, DEFAULT_CLOSED_MESSAGE};
pub use verify_membership::{VerifyMembershipHandler, VerifyMembershipQuery, VerifyMembershipResult};
