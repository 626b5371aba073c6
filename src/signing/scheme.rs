//! Signing capability seam.
//!
//! The protocol only needs "sign these bytes" and "does this signature match
//! these bytes". Both are traits so that keys held elsewhere (an agent, a
//! hardware token) can stand in for in-memory Ed25519 keys.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

use crate::error::Result;

/// Size of an Ed25519 signature in bytes
pub const SIGNATURE_LENGTH: usize = ed25519_dalek::SIGNATURE_LENGTH;

/// Raw signature bytes as embedded in audio
pub type SignatureBytes = [u8; SIGNATURE_LENGTH];

/// Produces 64-byte signatures over arbitrary messages
pub trait SignatureSigner {
    /// Sign the given message bytes.
    fn sign_message(&self, message: &[u8]) -> Result<SignatureBytes>;
}

/// Checks 64-byte signatures over arbitrary messages
pub trait SignatureVerifier {
    /// `Ok(false)` for a signature that does not match; `Err` only when the
    /// primitive itself cannot run.
    fn verify_message(&self, signature: &SignatureBytes, message: &[u8]) -> Result<bool>;
}

impl SignatureSigner for SigningKey {
    fn sign_message(&self, message: &[u8]) -> Result<SignatureBytes> {
        Ok(self.try_sign(message)?.to_bytes())
    }
}

impl SignatureVerifier for VerifyingKey {
    fn verify_message(&self, signature: &SignatureBytes, message: &[u8]) -> Result<bool> {
        // A non-canonical scalar in the embedded bytes is indistinguishable
        // from tampering, so it reads as a mismatch.
        let signature = Signature::from_bytes(signature);
        Ok(self.verify(message, &signature).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(seed: u8) -> SigningKey {
        SigningKey::from_bytes(&[seed; 32])
    }

    #[test]
    fn test_sign_then_verify() {
        let sk = key(7);
        let signature = sk.sign_message(b"pcm bytes").unwrap();

        assert!(sk.verifying_key().verify_message(&signature, b"pcm bytes").unwrap());
        assert!(!sk.verifying_key().verify_message(&signature, b"pcm bytez").unwrap());
    }

    #[test]
    fn test_wrong_key_is_false_not_error() {
        let signature = key(1).sign_message(b"message").unwrap();
        assert!(!key(2).verifying_key().verify_message(&signature, b"message").unwrap());
    }

    #[test]
    fn test_garbage_signature_is_false() {
        let garbage = [0xFF; SIGNATURE_LENGTH];
        assert!(!key(3).verifying_key().verify_message(&garbage, b"message").unwrap());
    }

    #[test]
    fn test_ed25519_is_deterministic() {
        let sk = key(9);
        assert_eq!(
            sk.sign_message(b"same").unwrap(),
            sk.sign_message(b"same").unwrap()
        );
    }
}
