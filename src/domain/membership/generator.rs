//! Random membership code generation.

use rand::Rng;

use super::STANDARD_CODE_TYPE;
use crate::domain::foundation::ValidationError;

/// Characters drawn for the random part of a code.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of the random part of a code.
pub const CODE_LENGTH: usize = 5;

/// Largest batch accepted by a single generation request.
pub const MAX_BATCH: usize = 100;

/// A validated request for a batch of new codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    count: usize,
    prefix: String,
    code_type: String,
}

impl GenerateRequest {
    /// Validates quantity (1..=100) and trims the prefix.
    pub fn new(count: usize, prefix: impl Into<String>) -> Result<Self, ValidationError> {
        if count == 0 || count > MAX_BATCH {
            return Err(ValidationError::out_of_range(
                "quantity",
                1,
                MAX_BATCH as i64,
                count as i64,
            ));
        }
        Ok(Self {
            count,
            prefix: prefix.into().trim().to_string(),
            code_type: STANDARD_CODE_TYPE.to_string(),
        })
    }

    /// Sets the type tag stored on every generated code.
    pub fn with_code_type(mut self, code_type: impl Into<String>) -> Self {
        let code_type = code_type.into();
        if !code_type.trim().is_empty() {
            self.code_type = code_type.trim().to_string();
        }
        self
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn code_type(&self) -> &str {
        &self.code_type
    }
}

/// Produces candidate codes: the prefix followed directly by five random
/// characters. Uniqueness is enforced by the registry on insert.
#[derive(Debug, Default, Clone, Copy)]
pub struct CodeGenerator;

impl CodeGenerator {
    pub fn candidate<R: Rng + ?Sized>(&self, prefix: &str, rng: &mut R) -> String {
        let mut code = String::with_capacity(prefix.len() + CODE_LENGTH);
        code.push_str(prefix);
        for _ in 0..CODE_LENGTH {
            let idx = rng.gen_range(0..CODE_ALPHABET.len());
            code.push(CODE_ALPHABET[idx] as char);
        }
        code
    }
}
