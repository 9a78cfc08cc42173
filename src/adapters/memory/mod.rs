//! In-memory adapters for tests and local development.

mod draft_store;
mod store;

pub use draft_store::InMemoryDraftStore;
pub use store::InMemoryBookingStore;
