//! Email configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Email configuration (Resend). Without an API key, receipts are not sent.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Resend API key
    #[serde(default)]
    pub resend_api_key: Option<SecretString>,

    /// From email address
    #[serde(default = "default_from_email")]
    pub from_email: String,

    /// From name, also printed on receipts
    #[serde(default = "default_from_name")]
    pub from_name: String,
}

impl EmailConfig {
    /// Get formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    pub fn is_enabled(&self) -> bool {
        self.resend_api_key.is_some()
    }

    /// Validate email configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let Some(key) = &self.resend_api_key else {
            return Ok(());
        };
        if !key.expose_secret().starts_with("re_") {
            return Err(ValidationError::InvalidResendKey);
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            resend_api_key: None,
            from_email: default_from_email(),
            from_name: default_from_name(),
        }
    }
}

fn default_from_email() -> String {
    "bookings@yatra.example.org".to_string()
}

fn default_from_name() -> String {
    "Yatra Booking".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key(key: &str) -> EmailConfig {
        EmailConfig {
            resend_api_key: Some(SecretString::new(key.to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_email_disabled_without_key() {
        let config = EmailConfig::default();
        assert!(!config.is_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_header() {
        let config = EmailConfig {
            from_email: "office@yatra.example.org".to_string(),
            from_name: "Yatra Office".to_string(),
            ..Default::default()
        };
        assert_eq!(config.from_header(), "Yatra Office <office@yatra.example.org>");
    }

    #[test]
    fn test_validation_invalid_api_key_prefix() {
        assert!(matches!(with_key("sk_xxx").validate(), Err(ValidationError::InvalidResendKey)));
    }

    #[test]
    fn test_validation_invalid_from_email() {
        let config = EmailConfig {
            from_email: "invalid-email".to_string(),
            ..with_key("re_abc")
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(with_key("re_abcd1234").validate().is_ok());
    }
}
