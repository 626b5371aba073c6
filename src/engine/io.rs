//! Audio file I/O for lsbsign
//!
//! Converts WAV files to and from the raw byte layout of their data chunk,
//! so that a load/save round trip is bit-for-bit exact. WAV samples are
//! always little-endian; 8-bit WAV samples are unsigned.
//!
//! Files ending in `.pcm` or `.raw` carry no header and are delegated to
//! [`crate::engine::raw`] with a caller-supplied layout.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tracing::debug;

use crate::engine::buffer::{ByteOrder, PcmFormat, SampleBuffer, SampleEncoding};
use crate::engine::raw;
use crate::error::{Result, SignerError};

/// Extensions handled by the headerless raw codec
pub const RAW_EXTENSIONS: [&str; 2] = ["pcm", "raw"];

/// Extensions treated as audio when scanning directories
pub const AUDIO_EXTENSIONS: [&str; 3] = ["wav", "pcm", "raw"];

/// True if the path names a headerless raw PCM file
pub fn is_raw_pcm(path: &Path) -> bool {
    extension_of(path)
        .map(|ext| RAW_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// True if the path has an extension lsbsign can read
pub fn is_supported_audio(path: &Path) -> bool {
    extension_of(path)
        .map(|ext| AUDIO_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Load any supported audio file.
///
/// `raw_layout` is only consulted for headerless raw PCM files.
pub fn load_audio(path: &Path, raw_layout: &PcmFormat) -> Result<SampleBuffer> {
    if is_raw_pcm(path) {
        raw::read_raw_pcm(path, *raw_layout)
    } else {
        import_wav(path)
    }
}

/// Save a buffer using the codec matching the path's extension
pub fn save_audio(buffer: &SampleBuffer, path: &Path) -> Result<()> {
    if is_raw_pcm(path) {
        raw::write_raw_pcm(buffer, path)
    } else {
        export_wav(buffer, path)
    }
}

/// Import a WAV file as raw little-endian sample bytes
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `InvalidAudio` - If the file is not a valid WAV file
/// * `UnsupportedFormat` - If the bit depth is not 8, 16, 24 or 32
pub fn import_wav(path: &Path) -> Result<SampleBuffer> {
    if !path.exists() {
        return Err(SignerError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let mut reader = WavReader::open(path).map_err(|e| SignerError::InvalidAudio {
        reason: format!("Failed to open WAV file: {}", e),
        source: Some(e),
    })?;

    let spec = reader.spec();
    let sample_width = match spec.bits_per_sample {
        8 | 16 | 24 | 32 => spec.bits_per_sample as usize / 8,
        bits => {
            return Err(SignerError::UnsupportedFormat {
                format: format!("{}-bit WAV", bits),
            })
        }
    };

    let mut bytes = Vec::with_capacity(reader.len() as usize * sample_width);

    match (spec.sample_format, sample_width) {
        (SampleFormat::Float, 4) => {
            for sample in reader.samples::<f32>() {
                bytes.extend_from_slice(&sample.map_err(read_error)?.to_bits().to_le_bytes());
            }
        }
        (SampleFormat::Float, _) => {
            return Err(SignerError::UnsupportedFormat {
                format: format!("{}-bit float WAV", spec.bits_per_sample),
            })
        }
        (SampleFormat::Int, 1) => {
            for sample in reader.samples::<i8>() {
                bytes.push((sample.map_err(read_error)? as u8).wrapping_add(128));
            }
        }
        (SampleFormat::Int, 2) => {
            for sample in reader.samples::<i16>() {
                bytes.extend_from_slice(&sample.map_err(read_error)?.to_le_bytes());
            }
        }
        (SampleFormat::Int, _) => {
            for sample in reader.samples::<i32>() {
                let le = sample.map_err(read_error)?.to_le_bytes();
                bytes.extend_from_slice(&le[..sample_width]);
            }
        }
    }

    let encoding = match spec.sample_format {
        SampleFormat::Float => SampleEncoding::Float,
        SampleFormat::Int => SampleEncoding::Int,
    };
    let format = PcmFormat::new(sample_width, spec.channels, spec.sample_rate, ByteOrder::Little)?
        .with_encoding(encoding);

    debug!(
        path = %path.display(),
        sample_width,
        channels = spec.channels,
        frame_rate = spec.sample_rate,
        bytes = bytes.len(),
        "imported WAV"
    );

    SampleBuffer::new(bytes, format)
}

/// Export raw sample bytes to a WAV file
///
/// The buffer must be little-endian, as WAV requires.
pub fn export_wav(buffer: &SampleBuffer, path: &Path) -> Result<()> {
    let format = buffer.format();

    if format.byte_order() != ByteOrder::Little {
        return Err(SignerError::UnsupportedFormat {
            format: "big-endian samples in a WAV container".to_string(),
        });
    }

    let sample_format = match (format.encoding(), format.sample_width()) {
        (SampleEncoding::Float, 4) => SampleFormat::Float,
        (SampleEncoding::Float, width) => {
            return Err(SignerError::UnsupportedFormat {
                format: format!("{}-bit float WAV", width * 8),
            })
        }
        (SampleEncoding::Int, _) => SampleFormat::Int,
    };

    let spec = WavSpec {
        channels: format.channels(),
        sample_rate: format.frame_rate(),
        bits_per_sample: format.bits_per_sample(),
        sample_format,
    };

    let mut writer = WavWriter::create(path, spec).map_err(write_error)?;

    for chunk in buffer.as_bytes().chunks_exact(format.sample_width()) {
        match (sample_format, chunk.len()) {
            (SampleFormat::Float, _) => {
                let bits = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                writer.write_sample(f32::from_bits(bits)).map_err(write_error)?;
            }
            (SampleFormat::Int, 1) => {
                writer
                    .write_sample(chunk[0].wrapping_sub(128) as i8)
                    .map_err(write_error)?;
            }
            (SampleFormat::Int, 2) => {
                writer
                    .write_sample(i16::from_le_bytes([chunk[0], chunk[1]]))
                    .map_err(write_error)?;
            }
            (SampleFormat::Int, 3) => {
                // Sign-extend the 24-bit value into an i32
                let extension = if chunk[2] & 0x80 != 0 { 0xFF } else { 0x00 };
                writer
                    .write_sample(i32::from_le_bytes([chunk[0], chunk[1], chunk[2], extension]))
                    .map_err(write_error)?;
            }
            (SampleFormat::Int, _) => {
                writer
                    .write_sample(i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
                    .map_err(write_error)?;
            }
        }
    }

    writer.finalize().map_err(write_error)?;

    debug!(path = %path.display(), bytes = buffer.len(), "exported WAV");
    Ok(())
}

/// Generate a sine tone serialized in the given layout
///
/// Useful for tests and benchmarks that need realistic sample data.
pub fn generate_test_tone(
    frequency: f32,
    duration_secs: f32,
    format: PcmFormat,
) -> Result<SampleBuffer> {
    let frames = (duration_secs * format.frame_rate() as f32) as usize;
    let channels = format.channels() as usize;
    let angular_freq = 2.0 * std::f32::consts::PI * frequency / format.frame_rate() as f32;

    let mut bytes = Vec::with_capacity(frames * channels * format.sample_width());
    for i in 0..frames {
        let value = 0.5 * (angular_freq * i as f32).sin();
        for _ in 0..channels {
            bytes.extend_from_slice(&encode_sample(value, &format));
        }
    }

    SampleBuffer::new(bytes, format)
}

// ============================================================================
// Internal helper functions
// ============================================================================

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

fn read_error(e: hound::Error) -> SignerError {
    SignerError::InvalidAudio {
        reason: format!("Failed to read samples: {}", e),
        source: Some(e),
    }
}

fn write_error(e: hound::Error) -> SignerError {
    match e {
        hound::Error::IoError(io) => SignerError::Io(io),
        other => SignerError::InvalidAudio {
            reason: format!("Failed to write WAV file: {}", other),
            source: Some(other),
        },
    }
}

/// Encode one normalized sample (-1.0..=1.0) in the layout's width and order
fn encode_sample(value: f32, format: &PcmFormat) -> Vec<u8> {
    let width = format.sample_width();

    let le: [u8; 4] = match (format.encoding(), width) {
        (SampleEncoding::Float, _) => value.to_bits().to_le_bytes(),
        // 8-bit PCM is unsigned with a 128 midpoint
        (SampleEncoding::Int, 1) => [((value * 127.0) as i32 + 128) as u8, 0, 0, 0],
        (SampleEncoding::Int, _) => {
            let max = ((1i64 << (width * 8 - 1)) - 1) as f64;
            ((value as f64 * max) as i32).to_le_bytes()
        }
    };

    let mut sample = le[..width].to_vec();
    if format.byte_order() == ByteOrder::Big {
        sample.reverse();
    }
    sample
}

// ============================================================================
// Tests
// ============================================================================
