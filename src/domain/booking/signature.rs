//! Payment callback signature verification.
//!
//! The gateway signs `"{order_id}|{payment_id}"` with HMAC-SHA256 under the
//! merchant key secret and sends the lowercase hex digest.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Verifier for payment callback signatures.
#[derive(Clone)]
pub struct PaymentSignatureVerifier {
    secret: SecretString,
}

impl PaymentSignatureVerifier {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Returns the expected hex signature for an order/payment pair.
    pub fn sign(&self, order_id: &str, payment_id: &str) -> String {
        hex::encode(self.mac(order_id, payment_id))
    }

    /// Returns true when `signature` matches exactly.
    pub fn verify(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        let expected = self.sign(order_id, payment_id);
        constant_time_compare(expected.as_bytes(), signature.as_bytes())
    }

    fn mac(&self, order_id: &str, payment_id: &str) -> Vec<u8> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts any key");
        mac.update(order_id.as_bytes());
        mac.update(b"|");
        mac.update(payment_id.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

impl std::fmt::Debug for PaymentSignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentSignatureVerifier").finish_non_exhaustive()
    }
}

fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "rzp_test_secret_12345";

    fn verifier() -> PaymentSignatureVerifier {
        PaymentSignatureVerifier::new(SecretString::new(TEST_SECRET.to_string()))
    }

    fn reference_signature(order: &str, payment: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(TEST_SECRET.as_bytes()).unwrap();
        mac.update(format!("{}|{}", order, payment).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn signature_matches_reference_construction() {
        assert_eq!(
            verifier().sign("order_1", "pay_1"),
            reference_signature("order_1", "pay_1")
        );
    }

    #[test]
    fn valid_signature_verifies() {
        let sig = reference_signature("order_1", "pay_1");
        assert!(verifier().verify("order_1", "pay_1", &sig));
    }

    #[test]
    fn any_single_character_change_fails() {
        let sig = reference_signature("order_1", "pay_1");
        for i in 0..sig.len() {
            let mut bytes = sig.clone().into_bytes();
            bytes[i] = if bytes[i] == b'0' { b'1' } else { b'0' };
            let mutated = String::from_utf8(bytes).unwrap();
            assert!(!verifier().verify("order_1", "pay_1", &mutated));
        }
    }

    #[test]
    fn uppercase_hex_rejected() {
        let sig = reference_signature("order_1", "pay_1").to_uppercase();
        assert!(!verifier().verify("order_1", "pay_1", &sig));
    }

    #[test]
    fn swapped_ids_fail() {
        let sig = reference_signature("order_1", "pay_1");
        assert!(!verifier().verify("pay_1", "order_1", &sig));
        assert!(!verifier().verify("order_1", "pay_1", ""));
    }

    #[test]
    fn debug_hides_secret() {
        assert!(!format!("{:?}", verifier()).contains(TEST_SECRET));
    }
}
