//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Prefix for pending rows of travelers using a membership code.
pub const MEMBER_PENDING_PREFIX: &str = "INS_PENDING_";

/// Prefix for pending rows of travelers without a membership code.
pub const GUEST_PENDING_PREFIX: &str = "OUT_PENDING_";

/// Prefix for rows created directly by an administrator.
pub const ADMIN_PREFIX: &str = "admin_";

fn short_hex() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}

/// Primary key of a booking row.
///
/// Pending rows carry a generated placeholder; paid rows carry the
/// gateway order id (or a suffix of it for multi-traveler parties).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Creates an OrderId, rejecting blank input.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("order_id"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Generates a placeholder id for a Pending row.
    pub fn pending(has_membership: bool) -> Self {
        let prefix = if has_membership {
            MEMBER_PENDING_PREFIX
        } else {
            GUEST_PENDING_PREFIX
        };
        Self(format!("{}{}", prefix, short_hex().to_uppercase()))
    }

    /// Generates an id for a row entered by an administrator.
    pub fn admin() -> Self {
        Self(format!("{}{}", ADMIN_PREFIX, short_hex()))
    }

    /// Derives the row id for the `index`-th (zero-based) traveler of a paid order.
    ///
    /// A single-traveler order uses the gateway order id unchanged, so that
    /// retries of the same payment land on the same key.
    pub fn for_party_member(gateway_order_id: &OrderId, index: usize, party_size: usize) -> Self {
        if party_size <= 1 {
            gateway_order_id.clone()
        } else {
            Self::party_suffixed(gateway_order_id, index)
        }
    }

    /// Row id of the `index`-th (zero-based) traveler of a multi-traveler order.
    pub fn party_suffixed(gateway_order_id: &OrderId, index: usize) -> Self {
        Self(format!("{}_{}", gateway_order_id.0, index + 1))
    }

    /// Returns true for placeholder ids of Pending rows.
    pub fn is_pending_placeholder(&self) -> bool {
        self.0.starts_with(MEMBER_PENDING_PREFIX) || self.0.starts_with(GUEST_PENDING_PREFIX)
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrderId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Token identifying a stored registration draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DraftToken(Uuid);

impl DraftToken {
    /// Creates a new random DraftToken.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DraftToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DraftToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DraftToken {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_ids_carry_membership_prefix() {
        let member = OrderId::pending(true);
        let guest = OrderId::pending(false);

        assert!(member.as_str().starts_with("INS_PENDING_"));
        assert!(guest.as_str().starts_with("OUT_PENDING_"));
        assert_eq!(member.as_str().len(), "INS_PENDING_".len() + 12);
        assert!(member.is_pending_placeholder());
    }

    #[test]
    fn pending_suffix_is_uppercase_hex() {
        let id = OrderId::pending(false);
        let suffix = &id.as_str()["OUT_PENDING_".len()..];
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }

    #[test]
    fn admin_ids_are_not_pending() {
        let id = OrderId::admin();
        assert!(id.as_str().starts_with("admin_"));
        assert!(!id.is_pending_placeholder());
    }

    #[test]
    fn blank_order_id_is_rejected() {
        assert!(OrderId::new("   ").is_err());
        assert_eq!(OrderId::new(" order_1 ").unwrap().as_str(), "order_1");
    }

    #[test]
    fn party_member_ids_are_stable() {
        let gateway = OrderId::new("order_ABC").unwrap();
        assert_eq!(OrderId::for_party_member(&gateway, 0, 1), gateway);
        assert_eq!(
            OrderId::for_party_member(&gateway, 1, 3).as_str(),
            "order_ABC_2"
        );
        assert_eq!(
            OrderId::for_party_member(&gateway, 1, 3),
            OrderId::for_party_member(&gateway, 1, 3)
        );
        assert_eq!(OrderId::party_suffixed(&gateway, 0).as_str(), "order_ABC_1");
    }

    #[test]
    fn draft_token_parses_from_display() {
        let token = DraftToken::new();
        let parsed: DraftToken = token.to_string().parse().unwrap();
        assert_eq!(token, parsed);
    }
}
