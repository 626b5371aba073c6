//! Embedded signature protocol.
//!
//! The signature lives in the first [`SIGNATURE_SLOT_BYTES`] embedding slots
//! of the sample buffer. Before hashing, both signer and verifier zero those
//! slots, so the signed content never depends on whatever signature bytes
//! were already present. Signing is therefore idempotent on its own output,
//! and verification sees exactly the bytes the signer saw.

use std::path::Path;

use ed25519_dalek::{SigningKey, VerifyingKey};
use tracing::{info, warn};

use crate::engine::buffer::{PcmFormat, SampleBuffer};
use crate::engine::io::{load_audio, save_audio};
use crate::error::{Result, SignerError};
use crate::signing::scheme::{
    SignatureBytes, SignatureSigner, SignatureVerifier, SIGNATURE_LENGTH,
};
use crate::stego::lsb;

/// Payload bytes reserved for the embedded signature
pub const SIGNATURE_SLOT_BYTES: usize = SIGNATURE_LENGTH;

/// Written over the signature slots before hashing
const NORMALIZER: [u8; SIGNATURE_SLOT_BYTES] = [0; SIGNATURE_SLOT_BYTES];

/// Zero the signature slots. Only bit 0 of the slot bytes changes.
pub fn normalize(buffer: &mut SampleBuffer) -> Result<()> {
    lsb::encode_bounded(buffer, &NORMALIZER)
}

/// Read the embedded signature without modifying the buffer
pub fn extract_signature(buffer: &SampleBuffer) -> Result<SignatureBytes> {
    let bytes = lsb::decode(buffer, Some(SIGNATURE_SLOT_BYTES))?;
    bytes
        .try_into()
        .map_err(|bytes: Vec<u8>| SignerError::CapacityExceeded {
            needed: SIGNATURE_SLOT_BYTES,
            available: bytes.len(),
        })
}

/// Sign the buffer in place and return the embedded signature.
///
/// # Errors
/// * `CapacityExceeded` - If the buffer cannot hold a signature; the buffer
///   is left untouched
/// * `Crypto` - If the signing primitive fails
pub fn sign<S: SignatureSigner + ?Sized>(
    buffer: &mut SampleBuffer,
    signer: &S,
) -> Result<SignatureBytes> {
    normalize(buffer)?;
    let signature = signer.sign_message(buffer.as_bytes())?;
    lsb::encode_bounded(buffer, &signature)?;

    info!(
        bytes = buffer.len(),
        sample_width = buffer.format().sample_width(),
        "embedded signature"
    );
    Ok(signature)
}

/// Check the embedded signature.
///
/// The buffer is normalized in place as part of the check. A mismatch is
/// `Ok(false)`, never an error.
///
/// # Errors
/// * `CapacityExceeded` - If the buffer is too small to carry a signature
/// * `Crypto` - If the verification primitive cannot run
pub fn verify<V: SignatureVerifier + ?Sized>(
    buffer: &mut SampleBuffer,
    verifier: &V,
) -> Result<bool> {
    let signature = extract_signature(buffer)?;
    normalize(buffer)?;
    let authentic = verifier.verify_message(&signature, buffer.as_bytes())?;

    if authentic {
        info!(bytes = buffer.len(), "signature valid");
    } else {
        warn!(bytes = buffer.len(), "signature mismatch");
    }
    Ok(authentic)
}

/// Sign an audio file and write the signed copy to `output`
///
/// `raw_layout` describes headerless `.pcm`/`.raw` inputs and is ignored
/// for WAV files.
pub fn sign_file(
    input: &Path,
    output: &Path,
    signing_key: &SigningKey,
    raw_layout: &PcmFormat,
) -> Result<SignatureBytes> {
    let mut buffer = load_audio(input, raw_layout)?;
    let signature = sign(&mut buffer, signing_key)?;
    save_audio(&buffer, output)?;
    Ok(signature)
}

/// Verify an audio file against a verifying key. Nothing is written.
pub fn verify_file(
    input: &Path,
    verifying_key: &VerifyingKey,
    raw_layout: &PcmFormat,
) -> Result<bool> {
    let mut buffer = load_audio(input, raw_layout)?;
    verify(&mut buffer, verifying_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::buffer::ByteOrder;

    fn noise_buffer(len: usize, width: usize, order: ByteOrder) -> SampleBuffer {
        let format = PcmFormat::new(width, 1, 8000, order).unwrap();
        let bytes = (0..len)
            .map(|i| ((i * 7919) ^ (i >> 3)) as u8)
            .collect::<Vec<_>>();
        SampleBuffer::new(bytes, format).unwrap()
    }

    fn key() -> SigningKey {
        SigningKey::from_bytes(&[5; 32])
    }

    #[test]
    fn test_sign_embeds_returned_signature() {
        let mut buffer = noise_buffer(4096, 2, ByteOrder::Little);
        let signature = sign(&mut buffer, &key()).unwrap();

        assert_eq!(extract_signature(&buffer).unwrap(), signature);
    }

    #[test]
    fn test_sign_verify_round_trip() {
        let mut buffer = noise_buffer(2048, 4, ByteOrder::Big);
        sign(&mut buffer, &key()).unwrap();

        assert!(verify(&mut buffer, &key().verifying_key()).unwrap());
    }

    #[test]
    fn test_signature_covers_normalized_content() {
        let mut buffer = noise_buffer(1024, 1, ByteOrder::Little);
        let mut normalized = buffer.clone();
        normalize(&mut normalized).unwrap();

        let signature = sign(&mut buffer, &key()).unwrap();
        assert!(key()
            .verifying_key()
            .verify_message(&signature, normalized.as_bytes())
            .unwrap());
    }

    #[test]
    fn test_normalize_only_touches_signature_slots() {
        let mut buffer = noise_buffer(2048, 1, ByteOrder::Little);
        let before = buffer.clone();
        normalize(&mut buffer).unwrap();

        let region = SIGNATURE_SLOT_BYTES * 8;
        assert_eq!(&buffer.as_bytes()[region..], &before.as_bytes()[region..]);
        assert!(buffer.as_bytes()[..region].iter().all(|b| b & 1 == 0));
    }

    #[test]
    fn test_too_small_buffer_fails_without_mutation() {
        // One byte short of a full signature region at 16-bit
        let mut buffer = noise_buffer(SIGNATURE_SLOT_BYTES * 16 - 2, 2, ByteOrder::Little);
        let before = buffer.clone();

        assert!(matches!(
            sign(&mut buffer, &key()),
            Err(SignerError::CapacityExceeded { needed: 64, available: 63 })
        ));
        assert_eq!(buffer, before);

        assert!(matches!(
            verify(&mut buffer, &key().verifying_key()),
            Err(SignerError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_exactly_sized_buffer() {
        let mut buffer = noise_buffer(SIGNATURE_SLOT_BYTES * 8 * 3, 3, ByteOrder::Big);
        sign(&mut buffer, &key()).unwrap();
        assert!(verify(&mut buffer, &key().verifying_key()).unwrap());
    }
}
