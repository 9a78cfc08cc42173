//! Feature flags configuration

use serde::Deserialize;

use crate::application::handlers::booking::{RegistrationGate, DEFAULT_CLOSED_MESSAGE};

/// Feature flags for enabling/disabling functionality
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    /// Accept new registrations
    #[serde(default = "default_registration_enabled")]
    pub registration_enabled: bool,

    /// Shown to travelers while registration is closed
    #[serde(default = "default_closed_message")]
    pub registration_closed_message: String,
}

impl FeatureFlags {
    pub fn registration_gate(&self) -> RegistrationGate {
        RegistrationGate::new(self.registration_enabled, self.registration_closed_message.clone())
    }
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            registration_enabled: default_registration_enabled(),
            registration_closed_message: default_closed_message(),
        }
    }
}

fn default_registration_enabled() -> bool {
    true
}

fn default_closed_message() -> String {
    DEFAULT_CLOSED_MESSAGE.to_string()
}
