//! Booking domain - travelers, parties, booking rows and payment proof.

mod draft;
mod errors;
mod party;
mod receipt;
mod record;
mod signature;
mod status;
mod traveler;
mod update;

pub use draft::RegistrationDraft;
pub use errors::{BookingError, SUPPORT_MESSAGE};
pub use party::{PackageSelection, Party, PartyMember, ResolvedTraveler};
pub use receipt::{Receipt, ReceiptLine};
pub use record::{BookedPackage, BookingRecord, NewBooking};
pub use signature::PaymentSignatureVerifier;
pub use status::PaymentStatus;
pub use traveler::Traveler;
pub use update::{BookingUpdate, EDITABLE_FIELDS};

#[cfg(test)]
pub(crate) mod fixtures {
    pub use super::record::fixtures::new_booking;
    pub use super::traveler::fixtures::traveler;
}
