//! Membership registry port.
//!
//! Holds single-use codes. Lookups are exact and case-sensitive; claiming
//! is a single conditional transition from Active to Expired.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OrderId};
use crate::domain::membership::{
    ClaimOutcome, CodeGenerator, CodeState, GenerateRequest, LookupResult, MembershipCode,
    MembershipRecord,
};

#[async_trait]
pub trait MembershipRegistry: Send + Sync {
    /// Look up a code. Expired codes report `NotFound`.
    async fn lookup(&self, code: &str) -> Result<LookupResult, DomainError>;

    /// Consume a code on behalf of a booking.
    ///
    /// Exactly one of any number of concurrent claims on the same Active code
    /// returns `Claimed`.
    async fn claim(&self, code: &str, consumer: &OrderId) -> Result<ClaimOutcome, DomainError>;

    /// Store a new Active code. Returns false if the code already exists in either state.
    async fn insert_if_absent(&self, record: &MembershipRecord) -> Result<bool, DomainError>;

    /// List codes, optionally restricted to one state.
    async fn list_codes(&self, state: Option<CodeState>) -> Result<Vec<MembershipRecord>, DomainError>;

    /// Generate and store a batch of random codes.
    ///
    /// Each candidate is inserted independently; candidates that collide with
    /// an existing code are skipped, so fewer codes than requested may return.
    async fn generate(&self, request: &GenerateRequest) -> Result<Vec<MembershipCode>, DomainError> {
        let mut created = Vec::with_capacity(request.count());
        for _ in 0..request.count() {
            let candidate = {
                let mut rng = rand::thread_rng();
                CodeGenerator.candidate(request.prefix(), &mut rng)
            };
            let code = MembershipCode::new(candidate)?;
            let record = MembershipRecord::active(code.clone(), request.code_type());
            if self.insert_if_absent(&record).await? {
                created.push(code);
            } else {
                tracing::debug!(code = %code, "Generated code collided, skipping");
            }
        }
        Ok(created)
    }
}
