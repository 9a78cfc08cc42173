//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `YATRA` prefix and
//! nested values are separated by a double underscore.
//!
//! # Example
//!
//! ```no_run
//! use yatra_booking::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod booking;
mod database;
mod email;
mod error;
mod features;
mod payment;
mod pricing;
mod redis;
mod server;

pub use booking::BookingConfig;
pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use features::FeatureFlags;
pub use payment::PaymentConfig;
pub use pricing::PricingConfig;
pub use redis::RedisConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Redis configuration (registration drafts)
    #[serde(default)]
    pub redis: RedisConfig,

    /// Payment configuration (Razorpay)
    pub payment: PaymentConfig,

    /// Email configuration (Resend)
    #[serde(default)]
    pub email: EmailConfig,

    /// Daily rates
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Booking lifecycle timings and the recovery log
    #[serde(default)]
    pub booking: BookingConfig,

    /// Feature flags
    #[serde(default)]
    pub features: FeatureFlags,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `YATRA` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `YATRA__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `YATRA__PAYMENT__RAZORPAY_KEY_ID=...` -> `payment.razorpay_key_id = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or
    /// values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("YATRA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.redis.validate()?;
        self.payment.validate()?;
        self.email.validate()?;
        self.pricing.validate()?;
        self.booking.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "YATRA__DATABASE__URL",
        "YATRA__PAYMENT__RAZORPAY_KEY_ID",
        "YATRA__PAYMENT__RAZORPAY_KEY_SECRET",
        "YATRA__SERVER__PORT",
        "YATRA__SERVER__ENVIRONMENT",
        "YATRA__FEATURES__REGISTRATION_ENABLED",
        "YATRA__BOOKING__PENDING_TTL_MINUTES",
    ];

    fn set_minimal_env() {
        env::set_var("YATRA__DATABASE__URL", "postgresql://test@localhost/yatra");
        env::set_var("YATRA__PAYMENT__RAZORPAY_KEY_ID", "rzp_test_xxx");
        env::set_var("YATRA__PAYMENT__RAZORPAY_KEY_SECRET", "secret");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/yatra");
        assert_eq!(config.payment.currency, "INR");
        assert!(config.redis.url().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let config = AppConfig::load().unwrap();
        clear_env();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.booking.pending_ttl_minutes, 30);
    }

    #[test]
    fn test_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("YATRA__SERVER__ENVIRONMENT", "production");
        env::set_var("YATRA__SERVER__PORT", "3000");
        env::set_var("YATRA__FEATURES__REGISTRATION_ENABLED", "false");
        env::set_var("YATRA__BOOKING__PENDING_TTL_MINUTES", "45");
        let config = AppConfig::load().unwrap();
        clear_env();

        assert!(config.is_production());
        assert_eq!(config.server.port, 3000);
        assert!(!config.features.registration_enabled);
        assert_eq!(config.booking.pending_ttl_minutes, 45);
    }

    #[test]
    fn test_missing_payment_fails() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("YATRA__DATABASE__URL", "postgresql://test@localhost/yatra");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_err());
    }
}
