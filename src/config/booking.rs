//! Booking lifecycle configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    /// JSON file receiving paid-but-unsaved bookings
    #[serde(default = "default_recovery_log_path")]
    pub recovery_log_path: PathBuf,

    /// Age after which an unpaid Pending row is swept
    #[serde(default = "default_pending_ttl")]
    pub pending_ttl_minutes: i64,

    /// Lifetime of a registration draft
    #[serde(default = "default_draft_ttl")]
    pub draft_ttl_minutes: i64,

    /// Period of the background cleanup sweep
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,
}

impl BookingConfig {
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.pending_ttl_minutes <= 0 {
            return Err(ValidationError::NonPositiveDuration("pending_ttl_minutes"));
        }
        if self.draft_ttl_minutes <= 0 {
            return Err(ValidationError::NonPositiveDuration("draft_ttl_minutes"));
        }
        if self.cleanup_interval_secs == 0 {
            return Err(ValidationError::NonPositiveDuration("cleanup_interval_secs"));
        }
        if self.recovery_log_path.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("RECOVERY_LOG_PATH"));
        }
        Ok(())
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            recovery_log_path: default_recovery_log_path(),
            pending_ttl_minutes: default_pending_ttl(),
            draft_ttl_minutes: default_draft_ttl(),
            cleanup_interval_secs: default_cleanup_interval(),
        }
    }
}

fn default_recovery_log_path() -> PathBuf {
    PathBuf::from("failed_bookings.json")
}

fn default_pending_ttl() -> i64 {
    30
}

fn default_draft_ttl() -> i64 {
    60
}

fn default_cleanup_interval() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_defaults() {
        let config = BookingConfig::default();
        assert_eq!(config.pending_ttl_minutes, 30);
        assert_eq!(config.draft_ttl_minutes, 60);
        assert_eq!(config.cleanup_interval(), Duration::from_secs(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        let config = BookingConfig {
            pending_ttl_minutes: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
