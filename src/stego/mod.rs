//! Steganography Module
//!
//! Carries byte payloads in the least significant bits of PCM samples.

pub mod lsb;

pub use lsb::{
    capacity, decode, embed_message, embedding_offset, embedding_slot, encode, encode_bounded,
    extract_message,
};
