//! Redis adapters.

mod draft_store;

pub use draft_store::RedisDraftStore;
