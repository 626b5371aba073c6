//! Headerless raw PCM files
//!
//! The file content is the sample buffer. The layout cannot be discovered
//! from the file and must be supplied by the caller, including the byte
//! order the samples were written in.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::engine::buffer::{PcmFormat, SampleBuffer};
use crate::error::{Result, SignerError};

/// Read a raw PCM file with an explicit layout
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `MisalignedBuffer` - If the file size is not a whole number of samples
pub fn read_raw_pcm(path: &Path, format: PcmFormat) -> Result<SampleBuffer> {
    if !path.exists() {
        return Err(SignerError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let bytes = fs::read(path)?;
    debug!(
        path = %path.display(),
        bytes = bytes.len(),
        sample_width = format.sample_width(),
        byte_order = %format.byte_order(),
        "read raw PCM"
    );

    SampleBuffer::new(bytes, format)
}

/// Write the buffer's bytes verbatim
pub fn write_raw_pcm(buffer: &SampleBuffer, path: &Path) -> Result<()> {
    fs::write(path, buffer.as_bytes())?;
    debug!(path = %path.display(), bytes = buffer.len(), "wrote raw PCM");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::buffer::ByteOrder;
    use tempfile::tempdir;

    #[test]
    fn test_raw_round_trip_keeps_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clip.pcm");
        let format = PcmFormat::new(3, 2, 96000, ByteOrder::Big).unwrap();
        let bytes: Vec<u8> = (0..=255u8).cycle().take(600).collect();
        let buffer = SampleBuffer::new(bytes, format).unwrap();

        write_raw_pcm(&buffer, &path).unwrap();
        let loaded = read_raw_pcm(&path, format).unwrap();

        assert_eq!(loaded, buffer);
    }

    #[test]
    fn test_raw_rejects_partial_sample() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("odd.raw");
        fs::write(&path, [0u8; 7]).unwrap();

        let format = PcmFormat::new(2, 1, 8000, ByteOrder::Little).unwrap();
        assert!(matches!(
            read_raw_pcm(&path, format),
            Err(SignerError::MisalignedBuffer { len: 7, .. })
        ));
    }

    #[test]
    fn test_raw_missing_file() {
        let format = PcmFormat::new(2, 1, 8000, ByteOrder::Little).unwrap();
        assert!(matches!(
            read_raw_pcm(Path::new("/nonexistent/clip.pcm"), format),
            Err(SignerError::FileNotFound { .. })
        ));
    }
}
