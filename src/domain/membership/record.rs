//! Stored membership code and its one-way lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::MembershipCode;
use crate::domain::foundation::{OrderId, StateMachine, Timestamp, ValidationError};

/// Type tag given to codes created without an explicit type.
pub const STANDARD_CODE_TYPE: &str = "standard";

/// Lifecycle state of a membership code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeState {
    Active,
    Expired,
}

impl CodeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeState::Active => "active",
            CodeState::Expired => "expired",
        }
    }
}

impl fmt::Display for CodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodeState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(CodeState::Active),
            "expired" => Ok(CodeState::Expired),
            other => Err(ValidationError::invalid_format(
                "code_state",
                format!("unknown code state '{}'", other),
            )),
        }
    }
}

impl StateMachine for CodeState {
    fn can_transition_to(&self, target: &Self) -> bool {
        matches!((self, target), (CodeState::Active, CodeState::Expired))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            CodeState::Active => vec![CodeState::Expired],
            CodeState::Expired => vec![],
        }
    }
}

/// A membership code as held by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipRecord {
    pub code: MembershipCode,
    /// Free-form tag such as `standard` or `discount`; preserved on expiry.
    pub code_type: String,
    pub state: CodeState,
    pub created_at: Timestamp,
    pub expired_at: Option<Timestamp>,
    /// Booking that consumed the code. Set only when expired.
    pub consumed_by: Option<OrderId>,
}

impl MembershipRecord {
    /// Creates a fresh Active code.
    pub fn active(code: MembershipCode, code_type: impl Into<String>) -> Self {
        let code_type = code_type.into();
        let code_type = if code_type.trim().is_empty() {
            STANDARD_CODE_TYPE.to_string()
        } else {
            code_type.trim().to_string()
        };
        Self {
            code,
            code_type,
            state: CodeState::Active,
            created_at: Timestamp::now(),
            expired_at: None,
            consumed_by: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == CodeState::Active
    }

    /// Moves the code to Expired, recording the consuming booking.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the code is already expired.
    pub fn expire(&mut self, consumer: OrderId, at: Timestamp) -> Result<(), ValidationError> {
        self.state = self.state.transition_to(CodeState::Expired)?;
        self.expired_at = Some(at);
        self.consumed_by = Some(consumer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> MembershipRecord {
        MembershipRecord::active(MembershipCode::new("GMP7QX2A").unwrap(), "discount")
    }

    #[test]
    fn new_record_is_active_without_consumer() {
        let rec = record();
        assert!(rec.is_active());
        assert!(rec.consumed_by.is_none());
        assert!(rec.expired_at.is_none());
    }

    #[test]
    fn blank_type_defaults_to_standard() {
        let rec = MembershipRecord::active(MembershipCode::new("A").unwrap(), " ");
        assert_eq!(rec.code_type, STANDARD_CODE_TYPE);
    }

    #[test]
    fn expire_records_consumer_and_keeps_type() {
        let mut rec = record();
        let order = OrderId::new("order_1").unwrap();
        rec.expire(order.clone(), Timestamp::now()).unwrap();

        assert_eq!(rec.state, CodeState::Expired);
        assert_eq!(rec.consumed_by, Some(order));
        assert_eq!(rec.code_type, "discount");
        assert!(rec.expired_at.is_some());
    }

    #[test]
    fn expire_twice_fails() {
        let mut rec = record();
        rec.expire(OrderId::new("a").unwrap(), Timestamp::now()).unwrap();
        assert!(rec.expire(OrderId::new("b").unwrap(), Timestamp::now()).is_err());
        assert_eq!(rec.consumed_by, Some(OrderId::new("a").unwrap()));
    }

    #[test]
    fn expired_is_terminal() {
        assert!(CodeState::Expired.is_terminal());
        assert!(!CodeState::Active.is_terminal());
    }
}
