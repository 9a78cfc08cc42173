use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

const YOUTH_MARKER: &str = "YOUTH";

/// Returns true when the code buys the fixed Youth package.
///
/// The check is a case-insensitive substring match and does not consult
/// the registry.
pub fn is_youth_code(code: &str) -> bool {
    !code.is_empty() && code.to_ascii_uppercase().contains(YOUTH_MARKER)
}

/// A membership (one-time) code as entered by a traveler.
///
/// Codes are matched case-sensitively; only surrounding whitespace is removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MembershipCode(String);

impl MembershipCode {
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("membership_code"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_youth(&self) -> bool {
        is_youth_code(&self.0)
    }
}

impl fmt::Display for MembershipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MembershipCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
