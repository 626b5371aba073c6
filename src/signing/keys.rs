//! Ed25519 key management
//!
//! Keys are stored as raw bytes: the 32-byte seed for a signing key and the
//! 32-byte compressed point for a verifying key.

use std::fs;
use std::path::Path;

use ed25519_dalek::{SigningKey, VerifyingKey, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{Result, SignerError};

/// Hex characters shown for a key fingerprint
const FINGERPRINT_HEX_LEN: usize = 16;

/// Generate a fresh key pair from the operating system RNG
pub fn generate_keypair() -> (SigningKey, VerifyingKey) {
    let signing_key = SigningKey::generate(&mut OsRng);
    let verifying_key = signing_key.verifying_key();
    (signing_key, verifying_key)
}

/// Rebuild a signing key from its 32-byte seed
pub fn signing_key_from_bytes(bytes: &[u8]) -> Result<SigningKey> {
    let seed: [u8; SECRET_KEY_LENGTH] =
        bytes.try_into().map_err(|_| SignerError::MalformedKey {
            reason: format!(
                "signing key must be {} bytes, found {}",
                SECRET_KEY_LENGTH,
                bytes.len()
            ),
        })?;
    Ok(SigningKey::from_bytes(&seed))
}

/// Rebuild a verifying key from its 32-byte compressed point
pub fn verifying_key_from_bytes(bytes: &[u8]) -> Result<VerifyingKey> {
    let point: [u8; PUBLIC_KEY_LENGTH] =
        bytes.try_into().map_err(|_| SignerError::MalformedKey {
            reason: format!(
                "verifying key must be {} bytes, found {}",
                PUBLIC_KEY_LENGTH,
                bytes.len()
            ),
        })?;
    VerifyingKey::from_bytes(&point).map_err(|e| SignerError::MalformedKey {
        reason: format!("not a valid Ed25519 point: {}", e),
    })
}

/// Load a signing key file
pub fn load_signing_key(path: &Path) -> Result<SigningKey> {
    debug!(path = %path.display(), "loading signing key");
    signing_key_from_bytes(&read_key_file(path)?)
}

/// Load a verifying key file
pub fn load_verifying_key(path: &Path) -> Result<VerifyingKey> {
    debug!(path = %path.display(), "loading verifying key");
    verifying_key_from_bytes(&read_key_file(path)?)
}

/// Write a signing key's seed to disk
pub fn save_signing_key(key: &SigningKey, path: &Path) -> Result<()> {
    fs::write(path, key.to_bytes())?;
    debug!(path = %path.display(), "saved signing key");
    Ok(())
}

/// Write a verifying key to disk
pub fn save_verifying_key(key: &VerifyingKey, path: &Path) -> Result<()> {
    fs::write(path, key.as_bytes())?;
    debug!(path = %path.display(), "saved verifying key");
    Ok(())
}

/// Short SHA-256 fingerprint of a verifying key, for display
pub fn fingerprint(key: &VerifyingKey) -> String {
    let digest = Sha256::digest(key.as_bytes());
    let mut hex = format!("{:x}", digest);
    hex.truncate(FINGERPRINT_HEX_LEN);
    hex
}

fn read_key_file(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(SignerError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(fs::read(path)?)
}
