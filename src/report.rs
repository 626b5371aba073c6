//! Verification reports
//!
//! Machine-readable result of checking one file, printed by `verify --json`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};

use crate::engine::buffer::{ByteOrder, SampleBuffer};
use crate::error::Result;
use crate::signing::keys::fingerprint;
use crate::stego::lsb::capacity;

/// Outcome of verifying a single file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub path: PathBuf,
    pub authentic: bool,
    /// Fingerprint of the key the file was checked against
    pub signer_fingerprint: String,
    pub sample_width: usize,
    pub byte_order: ByteOrder,
    /// LSB capacity of the file in payload bytes
    pub capacity_bytes: usize,
    pub checked_at: DateTime<Utc>,
}

impl VerificationReport {
    /// Build a report for a buffer that has just been verified
    pub fn new(
        path: &Path,
        buffer: &SampleBuffer,
        verifying_key: &VerifyingKey,
        authentic: bool,
    ) -> Self {
        VerificationReport {
            path: path.to_path_buf(),
            authentic,
            signer_fingerprint: fingerprint(verifying_key),
            sample_width: buffer.format().sample_width(),
            byte_order: buffer.format().byte_order(),
            capacity_bytes: capacity(buffer),
            checked_at: Utc::now(),
        }
    }

    /// Single-line JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
