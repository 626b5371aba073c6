//! Audio Engine Module
//!
//! Raw PCM sample storage and the codecs that fill it:
//! - Sample buffer and layout types
//! - WAV import/export
//! - Headerless raw PCM files

pub mod buffer;
pub mod io;
pub mod raw;

pub use buffer::{ByteOrder, PcmFormat, SampleBuffer, SampleEncoding};
pub use io::{export_wav, generate_test_tone, import_wav, load_audio, save_audio};
pub use raw::{read_raw_pcm, write_raw_pcm};
