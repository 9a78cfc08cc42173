//! Server-side registration drafts.
//!
//! A draft holds a party between quoting and payment. It expires after a
//! fixed time; an expired draft behaves as if it did not exist.

use serde::{Deserialize, Serialize};

use super::{NewBooking, PartyMember};
use crate::domain::foundation::{DraftToken, Money, OrderId, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationDraft {
    pub token: DraftToken,
    pub members: Vec<PartyMember>,
    /// Priced rows, one per member, in party order.
    pub bookings: Vec<NewBooking>,
    pub total: Money,
    /// Placeholder ids of the Pending rows, once confirmed.
    #[serde(default)]
    pub pending_order_ids: Vec<OrderId>,
    /// Gateway order created for this draft.
    #[serde(default)]
    pub gateway_order_id: Option<OrderId>,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

impl RegistrationDraft {
    pub fn new(members: Vec<PartyMember>, bookings: Vec<NewBooking>, ttl_minutes: i64) -> Self {
        let created_at = Timestamp::now();
        let total = bookings.iter().map(|b| b.amount).sum();
        Self {
            token: DraftToken::new(),
            members,
            bookings,
            total,
            pending_order_ids: Vec::new(),
            gateway_order_id: None,
            created_at,
            expires_at: created_at.plus_minutes(ttl_minutes),
        }
    }

    pub fn is_expired(&self, now: &Timestamp) -> bool {
        !now.is_before(&self.expires_at)
    }

    pub fn is_confirmed(&self) -> bool {
        !self.pending_order_ids.is_empty()
    }

    /// Seconds until expiry, clamped at zero.
    pub fn remaining_secs(&self, now: &Timestamp) -> u64 {
        self.expires_at.duration_since(now).num_seconds().max(0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::record::fixtures::new_booking;

    #[test]
    fn total_sums_bookings() {
        let draft = RegistrationDraft::new(
            vec![],
            vec![new_booking("A", None, 100), new_booking("B", None, 50)],
            60,
        );
        assert_eq!(draft.total, Money::from_rupees(150));
        assert!(!draft.is_confirmed());
    }

    #[test]
    fn expires_after_ttl() {
        let draft = RegistrationDraft::new(vec![], vec![], 60);
        assert!(!draft.is_expired(&draft.created_at.plus_minutes(59)));
        assert!(draft.is_expired(&draft.created_at.plus_minutes(60)));
        assert_eq!(draft.remaining_secs(&draft.created_at.plus_minutes(61)), 0);
    }
}
