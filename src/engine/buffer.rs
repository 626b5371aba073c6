//! Sample Buffer Management
//!
//! Holds raw PCM sample bytes exactly as the audio container stores them,
//! together with the layout needed to address individual samples.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SignerError};

// ============================================================================
// Constants
// ============================================================================

/// Smallest supported sample width in bytes (8-bit PCM)
pub const MIN_SAMPLE_WIDTH: usize = 1;

/// Largest supported sample width in bytes (32-bit PCM)
pub const MAX_SAMPLE_WIDTH: usize = 4;

// ============================================================================
// Layout types
// ============================================================================

/// Byte order of the samples as stored in the audio file.
///
/// This is the file's order, never the host's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteOrder::Little => write!(f, "little"),
            ByteOrder::Big => write!(f, "big"),
        }
    }
}

impl FromStr for ByteOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "little" | "le" => Ok(ByteOrder::Little),
            "big" | "be" => Ok(ByteOrder::Big),
            other => Err(format!("unknown byte order '{}' (expected little or big)", other)),
        }
    }
}

/// How the sample bits are interpreted by the container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SampleEncoding {
    /// Two's complement integers (unsigned for 8-bit WAV)
    #[default]
    Int,
    /// IEEE-754 single precision
    Float,
}

/// Layout of a raw PCM buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcmFormat {
    sample_width: usize,
    channels: u16,
    frame_rate: u32,
    byte_order: ByteOrder,
    encoding: SampleEncoding,
}

impl PcmFormat {
    /// Create an integer PCM layout
    ///
    /// # Errors
    /// * `InvalidSampleWidth` - If `sample_width` is not in 1..=4
    /// * `InvalidChannelCount` - If `channels` is zero
    pub fn new(
        sample_width: usize,
        channels: u16,
        frame_rate: u32,
        byte_order: ByteOrder,
    ) -> Result<Self> {
        if !(MIN_SAMPLE_WIDTH..=MAX_SAMPLE_WIDTH).contains(&sample_width) {
            return Err(SignerError::InvalidSampleWidth {
                width: sample_width,
            });
        }

        if channels == 0 {
            return Err(SignerError::InvalidChannelCount { channels });
        }

        Ok(PcmFormat {
            sample_width,
            channels,
            frame_rate,
            byte_order,
            encoding: SampleEncoding::Int,
        })
    }

    /// Same layout with a different sample encoding
    pub fn with_encoding(mut self, encoding: SampleEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Bytes per sample
    pub fn sample_width(&self) -> usize {
        self.sample_width
    }

    /// Number of interleaved channels
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Frames per second
    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    /// Byte order of the stored samples
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Integer or float samples
    pub fn encoding(&self) -> SampleEncoding {
        self.encoding
    }

    /// Offset of a sample's low-order byte within the sample
    #[inline]
    pub fn lsb_offset(&self) -> usize {
        match self.byte_order {
            ByteOrder::Big => self.sample_width - 1,
            ByteOrder::Little => 0,
        }
    }

    /// Bit depth (sample width in bits)
    pub fn bits_per_sample(&self) -> u16 {
        (self.sample_width * 8) as u16
    }
}

// ============================================================================
// SampleBuffer
// ============================================================================

/// Raw PCM sample bytes plus their layout.
///
/// Invariant: `bytes.len() % format.sample_width() == 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleBuffer {
    bytes: Vec<u8>,
    format: PcmFormat,
}

impl SampleBuffer {
    /// Wrap raw sample bytes
    ///
    /// # Errors
    /// * `MisalignedBuffer` - If the byte count is not a whole number of samples
    pub fn new(bytes: Vec<u8>, format: PcmFormat) -> Result<Self> {
        if bytes.len() % format.sample_width() != 0 {
            return Err(SignerError::MisalignedBuffer {
                len: bytes.len(),
                sample_width: format.sample_width(),
            });
        }
        Ok(SampleBuffer { bytes, format })
    }

    /// Create a zero-filled buffer holding `num_samples` samples
    pub fn silent(num_samples: usize, format: PcmFormat) -> Self {
        SampleBuffer {
            bytes: vec![0; num_samples * format.sample_width()],
            format,
        }
    }

    /// Layout of the samples
    pub fn format(&self) -> &PcmFormat {
        &self.format
    }

    /// Raw sample bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutable raw sample bytes. The length cannot change through this view.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Consume the buffer and return the raw bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if the buffer has no samples
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Total samples across all channels
    pub fn num_samples(&self) -> usize {
        self.bytes.len() / self.format.sample_width()
    }

    /// Samples per channel
    pub fn num_frames(&self) -> usize {
        self.num_samples() / self.format.channels() as usize
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.format.frame_rate() == 0 {
            return 0.0;
        }
        self.num_frames() as f64 / self.format.frame_rate() as f64
    }
}

// ============================================================================
// Tests
// ============================================================================
