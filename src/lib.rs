//! lsbsign - Lossless Audio Signing
//!
//! Embeds an Ed25519 signature in the least significant bits of PCM audio,
//! producing a file that plays like the original yet carries a
//! tamper-evident proof of authorship.
//!
//! # Architecture
//!
//! - `engine`: raw PCM sample buffers and the WAV / raw codecs that fill them
//! - `stego`: the LSB bit channel mapping byte payloads onto samples
//! - `signing`: keys and the normalize/sign/verify protocol over the channel
//!
//! Every operation works on the whole buffer in memory, so memory use grows
//! with the length of the recording.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod report;
pub mod signing;
pub mod stego;

pub use engine::{ByteOrder, PcmFormat, SampleBuffer};
pub use error::{Result, SignerError};
pub use signing::{sign, verify};
