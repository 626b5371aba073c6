//! Signing Module
//!
//! Ed25519 signatures carried inside the audio they authenticate:
//! - Signing capability traits and their Ed25519 implementations
//! - Key generation and key files
//! - The normalize/sign/verify protocol over a sample buffer

pub mod keys;
pub mod protocol;
pub mod scheme;

pub use keys::{
    fingerprint, generate_keypair, load_signing_key, load_verifying_key, save_signing_key,
    save_verifying_key,
};
pub use protocol::{
    extract_signature, normalize, sign, sign_file, verify, verify_file, SIGNATURE_SLOT_BYTES,
};
pub use scheme::{SignatureBytes, SignatureSigner, SignatureVerifier, SIGNATURE_LENGTH};
