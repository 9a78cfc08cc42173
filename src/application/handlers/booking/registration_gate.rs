//! Registration open/closed switch.

use crate::domain::booking::BookingError;

/// Message shown when registrations are switched off without a custom text.
pub const DEFAULT_CLOSED_MESSAGE: &str = "Registrations are currently closed.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationGate {
    enabled: bool,
    closed_message: String,
}

impl RegistrationGate {
    pub fn new(enabled: bool, closed_message: impl Into<String>) -> Self {
        Self {
            enabled,
            closed_message: closed_message.into(),
        }
    }

    pub fn open() -> Self {
        Self::new(true, DEFAULT_CLOSED_MESSAGE)
    }

    pub fn closed(message: impl Into<String>) -> Self {
        Self::new(false, message)
    }

    pub fn is_open(&self) -> bool {
        self.enabled
    }

    pub fn ensure_open(&self) -> Result<(), BookingError> {
        if self.enabled {
            Ok(())
        } else {
            Err(BookingError::RegistrationClosed(self.closed_message.clone()))
        }
    }
}

impl Default for RegistrationGate {
    fn default() -> Self {
        Self::open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_gate_carries_message() {
        let gate = RegistrationGate::closed("See you next season");
        match gate.ensure_open() {
            Err(BookingError::RegistrationClosed(msg)) => assert_eq!(msg, "See you next season"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn default_is_open() {
        assert!(RegistrationGate::default().ensure_open().is_ok());
    }
}
