//! Personal details of one traveler.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;
use crate::domain::pricing::{MAX_AGE, MIN_AGE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Traveler {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub alternative_phone: Option<String>,
    pub age: i32,
    pub gender: String,
    pub city: String,
    pub district: String,
    pub state: String,
    /// 1-based position of the guardian within the party. Required for minors.
    #[serde(default)]
    pub guardian: Option<usize>,
}

impl Traveler {
    /// Checks required fields and the age range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(ValidationError::out_of_range(
                "age",
                MIN_AGE as i64,
                MAX_AGE as i64,
                self.age as i64,
            ));
        }
        let email = self.email.trim();
        if !email.is_empty() && !is_plausible_email(email) {
            return Err(ValidationError::invalid_format("email", "expected name@domain"));
        }
        Ok(())
    }

    /// Lowercased, trimmed email, or None when blank.
    pub fn normalized_email(&self) -> Option<String> {
        let email = self.email.trim();
        if email.is_empty() {
            None
        } else {
            Some(email.to_lowercase())
        }
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.ends_with('.'),
        None => false,
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::Traveler;

    pub fn traveler(name: &str, age: i32) -> Traveler {
        Traveler {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "9876543210".to_string(),
            alternative_phone: None,
            age,
            gender: "female".to_string(),
            city: "Pune".to_string(),
            district: "Pune".to_string(),
            state: "Maharashtra".to_string(),
            guardian: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::traveler;
    use super::*;

    #[test]
    fn valid_traveler_passes() {
        assert!(traveler("Asha", 34).validate().is_ok());
    }

    #[test]
    fn blank_name_rejected() {
        let t = traveler(" ", 34);
        assert_eq!(t.validate(), Err(ValidationError::empty_field("name")));
    }

    #[test]
    fn age_bounds_enforced() {
        assert!(traveler("A", 151).validate().is_err());
        assert!(traveler("A", -1).validate().is_err());
        assert!(traveler("A", 0).validate().is_ok());
    }

    #[test]
    fn malformed_email_rejected() {
        let mut t = traveler("Asha", 34);
        t.email = "asha.example.com".to_string();
        assert!(t.validate().is_err());
        t.email = String::new();
        assert!(t.validate().is_ok());
    }

    #[test]
    fn normalized_email_lowercases_and_trims() {
        let mut t = traveler("Asha", 34);
        t.email = "  Asha@Example.COM ".to_string();
        assert_eq!(t.normalized_email().as_deref(), Some("asha@example.com"));
    }
}
