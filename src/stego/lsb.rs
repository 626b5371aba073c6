//! LSB bit channel.
//!
//! Payload byte `i`, bit `j` (0 = most significant) lives in bit 0 of the
//! buffer byte at
//!
//! ```text
//! addr(i, j) = i * 8 * sample_width + j * sample_width + lsb_offset
//! ```
//!
//! where `lsb_offset` selects the low-order byte of the sample: `0` for
//! little-endian files, `sample_width - 1` for big-endian ones. One payload
//! byte therefore spans eight consecutive samples (its embedding slot), and
//! only the least significant bit of each sample changes.
//!
//! Two read modes exist. Bounded reads return exactly the requested number
//! of bytes and may contain zeros (signatures). Sentinel reads stop at the
//! first all-zero byte (text messages).

use tracing::debug;

use crate::engine::buffer::{PcmFormat, SampleBuffer};
use crate::error::{Result, SignerError};

/// Bits per payload byte, and therefore samples per embedding slot
pub const BITS_PER_BYTE: usize = 8;

/// Mask selecting payload bit `j`, most significant first
pub const BIT_MASKS: [u8; BITS_PER_BYTE] = [0x80, 0x40, 0x20, 0x10, 0x08, 0x04, 0x02, 0x01];

/// Value of the byte that ends a sentinel payload
pub const TERMINATOR: u8 = 0x00;

/// Buffer offset carrying bit `bit_index` of payload byte `byte_index`
#[inline]
pub fn embedding_offset(format: &PcmFormat, byte_index: usize, bit_index: usize) -> usize {
    let width = format.sample_width();
    byte_index * BITS_PER_BYTE * width + bit_index * width + format.lsb_offset()
}

/// The eight buffer offsets forming the embedding slot of one payload byte
pub fn embedding_slot(format: &PcmFormat, byte_index: usize) -> [usize; BITS_PER_BYTE] {
    let mut slot = [0; BITS_PER_BYTE];
    for (bit_index, offset) in slot.iter_mut().enumerate() {
        *offset = embedding_offset(format, byte_index, bit_index);
    }
    slot
}

/// Number of payload bytes the buffer can carry
pub fn capacity(buffer: &SampleBuffer) -> usize {
    buffer.len() / (BITS_PER_BYTE * buffer.format().sample_width())
}

/// Embed `payload` into the buffer's LSBs, starting at the first slot.
///
/// A zero terminator byte is written into the slot after the payload when
/// the buffer has room for it. Nothing is modified if the payload does not
/// fit.
///
/// # Errors
/// * `CapacityExceeded` - If the payload is longer than [`capacity`]
pub fn encode(buffer: &mut SampleBuffer, payload: &[u8]) -> Result<()> {
    write_payload(buffer, payload, true)
}

/// Embed a fixed-size payload without a terminator.
///
/// Exactly `payload.len()` slots are touched; the rest of the buffer is left
/// as it was. Use this when the reader knows the length in advance.
pub fn encode_bounded(buffer: &mut SampleBuffer, payload: &[u8]) -> Result<()> {
    write_payload(buffer, payload, false)
}

/// Extract a payload from the buffer's LSBs.
///
/// With `Some(length)` exactly `length` bytes are returned, zeros included.
/// With `None` bytes are read up to, and excluding, the first zero byte.
///
/// # Errors
/// * `CapacityExceeded` - If `length` is larger than [`capacity`]
/// * `UnterminatedPayload` - If a sentinel read reaches the end of the buffer
pub fn decode(buffer: &SampleBuffer, length: Option<usize>) -> Result<Vec<u8>> {
    let available = capacity(buffer);
    let format = buffer.format();
    let bytes = buffer.as_bytes();

    match length {
        Some(length) => {
            if length > available {
                return Err(SignerError::CapacityExceeded {
                    needed: length,
                    available,
                });
            }
            Ok((0..length)
                .map(|byte_index| read_byte(bytes, format, byte_index))
                .collect())
        }
        None => {
            let mut message = Vec::new();
            for byte_index in 0..available {
                let value = read_byte(bytes, format, byte_index);
                if value == TERMINATOR {
                    return Ok(message);
                }
                message.push(value);
            }
            Err(SignerError::UnterminatedPayload { scanned: available })
        }
    }
}

/// Embed a text message in sentinel mode.
///
/// The message plus its terminator must fit in the buffer.
///
/// # Errors
/// * `EmbeddedTerminator` - If the message contains a NUL character
/// * `CapacityExceeded` - If the message and terminator do not fit
pub fn embed_message(buffer: &mut SampleBuffer, message: &str) -> Result<()> {
    if let Some(index) = message.bytes().position(|b| b == TERMINATOR) {
        return Err(SignerError::EmbeddedTerminator { index });
    }

    let available = capacity(buffer);
    let needed = message.len() + 1;
    if needed > available {
        return Err(SignerError::CapacityExceeded { needed, available });
    }

    encode(buffer, message.as_bytes())
}

/// Extract a text message written by [`embed_message`]
pub fn extract_message(buffer: &SampleBuffer) -> Result<String> {
    let bytes = decode(buffer, None)?;
    String::from_utf8(bytes).map_err(SignerError::InvalidUtf8)
}

fn write_payload(buffer: &mut SampleBuffer, payload: &[u8], terminate: bool) -> Result<()> {
    let available = capacity(buffer);
    if payload.len() > available {
        return Err(SignerError::CapacityExceeded {
            needed: payload.len(),
            available,
        });
    }

    let format = *buffer.format();
    let bytes = buffer.as_bytes_mut();

    for (byte_index, &value) in payload.iter().enumerate() {
        write_byte(bytes, &format, byte_index, value);
    }

    let terminated = terminate && payload.len() < available;
    if terminated {
        write_byte(bytes, &format, payload.len(), TERMINATOR);
    }

    debug!(
        payload_len = payload.len(),
        sample_width = format.sample_width(),
        lsb_offset = format.lsb_offset(),
        terminated,
        "embedded payload"
    );
    Ok(())
}

fn write_byte(bytes: &mut [u8], format: &PcmFormat, byte_index: usize, value: u8) {
    for (bit_index, mask) in BIT_MASKS.iter().enumerate() {
        let offset = embedding_offset(format, byte_index, bit_index);
        if value & mask != 0 {
            bytes[offset] |= 1;
        } else {
            bytes[offset] &= !1;
        }
    }
}

fn read_byte(bytes: &[u8], format: &PcmFormat, byte_index: usize) -> u8 {
    BIT_MASKS
        .iter()
        .enumerate()
        .filter(|(bit_index, _)| bytes[embedding_offset(format, byte_index, *bit_index)] & 1 == 1)
        .fold(0, |acc, (_, mask)| acc | mask)
}
