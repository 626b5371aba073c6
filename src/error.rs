//! Error handling for lsbsign
//!
//! A failed signature check is not an error: `verify` reports it as `Ok(false)`.

use thiserror::Error;

/// Result type alias for lsbsign operations
pub type Result<T> = std::result::Result<T, SignerError>;

/// Main error type for lsbsign operations
#[derive(Error, Debug)]
pub enum SignerError {
    // Bit channel errors
    #[error("Payload needs {needed} bytes of LSB capacity but the buffer holds {available}")]
    CapacityExceeded { needed: usize, available: usize },

    #[error("No terminator byte found after scanning {scanned} bytes")]
    UnterminatedPayload { scanned: usize },

    #[error("Message contains a zero byte at index {index}")]
    EmbeddedTerminator { index: usize },

    #[error("Extracted message is not valid UTF-8")]
    InvalidUtf8(#[source] std::string::FromUtf8Error),

    // Buffer layout errors
    #[error("Invalid sample width: {width} bytes (expected 1-4)")]
    InvalidSampleWidth { width: usize },

    #[error("Invalid channel count: {channels} (expected at least 1)")]
    InvalidChannelCount { channels: u16 },

    #[error("Buffer length {len} is not a multiple of the sample width {sample_width}")]
    MisalignedBuffer { len: usize, sample_width: usize },

    // Key and signature errors
    #[error("Malformed key: {reason}")]
    MalformedKey { reason: String },

    #[error("No {role} key given: pass --{flag} or set it in the config file")]
    MissingKey {
        role: &'static str,
        flag: &'static str,
    },

    #[error("Signature primitive failed: {0}")]
    Crypto(#[from] ed25519_dalek::SignatureError),

    // File errors
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid audio file: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<hound::Error>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SignerError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            SignerError::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            SignerError::UnterminatedPayload { .. } => "UNTERMINATED_PAYLOAD",
            SignerError::EmbeddedTerminator { .. } => "EMBEDDED_TERMINATOR",
            SignerError::InvalidUtf8(_) => "INVALID_UTF8",
            SignerError::InvalidSampleWidth { .. } => "INVALID_SAMPLE_WIDTH",
            SignerError::InvalidChannelCount { .. } => "INVALID_CHANNEL_COUNT",
            SignerError::MisalignedBuffer { .. } => "MISALIGNED_BUFFER",
            SignerError::MalformedKey { .. } => "MALFORMED_KEY",
            SignerError::MissingKey { .. } => "MISSING_KEY",
            SignerError::Crypto(_) => "CRYPTO_PRIMITIVE_ERROR",
            SignerError::FileNotFound { .. } => "FILE_NOT_FOUND",
            SignerError::InvalidAudio { .. } => "INVALID_AUDIO",
            SignerError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            SignerError::Io(_) => "IO_ERROR",
            SignerError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            SignerError::CapacityExceeded { .. } => vec![
                "Use a longer audio clip",
                "Shorten the message",
            ],
            SignerError::UnterminatedPayload { .. } => vec![
                "The file probably carries no text message",
                "Signed files hold a fixed-size signature: use 'inspect' instead",
            ],
            SignerError::EmbeddedTerminator { .. } => {
                vec!["Remove NUL characters from the message"]
            }
            SignerError::MisalignedBuffer { .. } | SignerError::InvalidSampleWidth { .. } => vec![
                "Check --sample-width matches the raw PCM file",
                "Convert the audio to WAV so the layout is read from its header",
            ],
            SignerError::InvalidChannelCount { .. } => {
                vec!["Pass --channels 1 or more for raw PCM input"]
            }
            SignerError::MalformedKey { .. } => vec![
                "Key files hold exactly 32 raw bytes",
                "Regenerate the key pair with 'lsbsign keys'",
            ],
            SignerError::MissingKey { .. } => vec![
                "Generate a key pair with 'lsbsign keys --sk sk.pri --vk vk.pub'",
                "Point the config file at your default keys",
            ],
            SignerError::FileNotFound { .. } => vec![
                "Check the file path is correct",
                "Verify the file hasn't been moved or deleted",
            ],
            SignerError::InvalidAudio { .. } | SignerError::UnsupportedFormat { .. } => vec![
                "Convert the file to uncompressed PCM WAV",
                "Supported formats: 8/16/24/32-bit integer WAV, 32-bit float WAV, raw PCM",
            ],
            _ => vec![],
        }
    }
}
