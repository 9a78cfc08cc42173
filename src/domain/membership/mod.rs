//! Membership domain - single-use codes that unlock member pricing.
//!
//! A code is either Active or Expired. The Active to Expired move happens
//! once, in the same transaction that records the consuming booking.

mod claim;
mod code;
mod generator;
mod record;

pub use claim::{ClaimOutcome, LookupResult};
pub use code::{is_youth_code, MembershipCode};
pub use generator::{CodeGenerator, GenerateRequest, CODE_ALPHABET, CODE_LENGTH, MAX_BATCH};
pub use record::{CodeState, MembershipRecord, STANDARD_CODE_TYPE};
