//! SysEx framing, checksums and the per-vendor codecs.
//!
//! Every codec works on complete buffers as delivered by the transport,
//! `F0 .. F7` framing included.

mod addressed;
mod identity;
mod patch;
mod protocol;

pub use addressed::{AddressedCodec, CMD_READ, CMD_WRITE};
pub use identity::{IdentityResponse, IDENTITY_REQUEST};
pub use patch::{PatchCodec, ShapedMessage, FULL_PATCH_LEN, FULL_PATCH_SIZE, PARAMETER_UPDATE_LEN};
pub use protocol::{Decoded, SysexProtocol};

use crate::error::{Error, Result};
use std::fmt::Write;

pub const SYSEX_START: u8 = 0xf0;
pub const SYSEX_END: u8 = 0xf7;
/// Universal non-real-time SysEx ID.
pub const UNIVERSAL_NON_REALTIME: u8 = 0x7e;

/// Roland-style checksum: the 7-bit value that brings the byte sum to 0 mod 128.
pub fn checksum(bytes: &[u8]) -> u8 {
    let sum = bytes.iter().fold(0u32, |acc, &b| acc + u32::from(b));
    ((128 - sum % 128) % 128) as u8
}

/// Check `payload` against a received checksum byte.
pub fn verify(payload: &[u8], received: u8) -> Result<()> {
    if let Some(&bad) = payload.iter().find(|&&b| b > 0x7f) {
        return Err(Error::MalformedSysex(format!(
            "data byte {bad:#04x} has the status bit set"
        )));
    }
    let expected = checksum(payload);
    if expected != received {
        return Err(Error::ChecksumMismatch {
            expected,
            actual: received,
        });
    }
    Ok(())
}

/// True when every byte of `word` is a 7-bit data byte.
#[inline]
pub fn is_encodable(word: u32) -> bool {
    word & 0x8080_8080 == 0
}

/// Reject outgoing data bytes that would read as MIDI status bytes.
pub fn ensure_data(start: u32, data: &[u8]) -> Result<()> {
    match data.iter().position(|&b| b > 0x7f) {
        Some(i) => Err(Error::UnencodableData {
            address: start.wrapping_add(i as u32),
            value: data[i],
        }),
        None => Ok(()),
    }
}

/// True for a buffer framed `F0 .. F7`.
#[inline]
pub fn is_sysex(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == SYSEX_START && bytes[bytes.len() - 1] == SYSEX_END
}

/// Lower-case hex bytes separated by spaces.
pub fn hexdump(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{byte:02x}");
    }
    out
}
