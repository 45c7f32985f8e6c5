//! Addressed read/write data messages (Roland "RQ1"/"DT1" style).
//!
//! `F0 <mfr> <ch> 00 <model> <cmd> <payload..> <checksum> F7` where the
//! checksum covers the payload only.

use super::protocol::Decoded;
use super::{checksum, ensure_data, is_encodable, verify, SYSEX_END, SYSEX_START};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Read-data request; payload is `address:4 length:4`, both big-endian.
pub const CMD_READ: u8 = 0x11;
/// Write-data / data-set; payload is `address:4 data..`.
pub const CMD_WRITE: u8 = 0x12;

const HEADER_LEN: usize = 6;
const ADDRESS_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressedCodec {
    pub manufacturer: u8,
    pub model_id: u8,
}

impl AddressedCodec {
    pub const fn new(manufacturer: u8, model_id: u8) -> Self {
        Self {
            manufacturer,
            model_id,
        }
    }

    fn header(&self, channel: u8, command: u8) -> [u8; HEADER_LEN] {
        [SYSEX_START, self.manufacturer, channel, 0x00, self.model_id, command]
    }

    fn framed(&self, channel: u8, command: u8, payload: &[u8]) -> Vec<u8> {
        let mut frame = Vec::with_capacity(HEADER_LEN + payload.len() + 2);
        frame.extend_from_slice(&self.header(channel, command));
        frame.extend_from_slice(payload);
        frame.push(checksum(payload));
        frame.push(SYSEX_END);
        frame
    }

    /// One read request for `start..start + length`.
    ///
    /// Both words travel as four 7-bit bytes; a word with a high bit set in
    /// any byte is rejected.
    pub fn read_request(&self, channel: u8, start: u32, length: u32) -> Result<Vec<u8>> {
        for word in [start, length] {
            if !is_encodable(word) {
                return Err(Error::UnencodableAddress(word));
            }
        }
        let mut payload = [0u8; 2 * ADDRESS_LEN];
        payload[..ADDRESS_LEN].copy_from_slice(&start.to_be_bytes());
        payload[ADDRESS_LEN..].copy_from_slice(&length.to_be_bytes());
        Ok(self.framed(channel, CMD_READ, &payload))
    }

    /// Read requests covering `start..start + length`, split so every length
    /// stays encodable.
    pub fn read_requests(&self, channel: u8, start: u32, length: u32) -> Result<Vec<Vec<u8>>> {
        let mut frames = Vec::new();
        let mut address = start;
        let mut remaining = length;
        while remaining > 0 {
            let chunk = encodable_floor(remaining);
            frames.push(self.read_request(channel, address, chunk)?);
            remaining -= chunk;
            if remaining > 0 {
                address = address
                    .checked_add(chunk)
                    .ok_or(Error::UnencodableAddress(address))?;
            }
        }
        Ok(frames)
    }

    pub fn write_request(&self, channel: u8, start: u32, data: &[u8]) -> Result<Vec<u8>> {
        if !is_encodable(start) {
            return Err(Error::UnencodableAddress(start));
        }
        ensure_data(start, data)?;
        let mut payload = Vec::with_capacity(ADDRESS_LEN + data.len());
        payload.extend_from_slice(&start.to_be_bytes());
        payload.extend_from_slice(data);
        Ok(self.framed(channel, CMD_WRITE, &payload))
    }

    /// Channel of any message from this model, whatever its command.
    pub fn match_channel(&self, bytes: &[u8]) -> Option<u8> {
        match bytes {
            [SYSEX_START, m, channel, 0x00, model, _, ..]
                if *m == self.manufacturer && *model == self.model_id =>
            {
                Some(*channel)
            }
            _ => None,
        }
    }

    /// True when `bytes` is traffic from this model on `channel`.
    pub fn claims(&self, channel: u8, bytes: &[u8]) -> bool {
        self.match_channel(bytes) == Some(channel)
    }

    /// Decode a write-data message into its address and payload.
    ///
    /// Messages with another header or command are [`Decoded::NotThisFormat`];
    /// framing and checksum faults are [`Decoded::Discarded`].
    pub fn parse(&self, bytes: &[u8]) -> Decoded {
        if self.match_channel(bytes).is_none() || bytes[HEADER_LEN - 1] != CMD_WRITE {
            return Decoded::NotThisFormat;
        }
        match self.parse_write(bytes) {
            Ok((address, payload)) => Decoded::Data { address, payload },
            Err(error) => Decoded::Discarded(error),
        }
    }

    fn parse_write(&self, bytes: &[u8]) -> Result<(u32, Vec<u8>)> {
        let Some((&SYSEX_END, body)) = bytes.split_last() else {
            return Err(Error::MalformedSysex("missing F7 terminator".into()));
        };
        let Some((&received, payload)) = body.get(HEADER_LEN..).and_then(<[u8]>::split_last) else {
            return Err(Error::MalformedSysex("missing checksum".into()));
        };
        if payload.len() <= ADDRESS_LEN {
            return Err(Error::MalformedSysex(format!(
                "{} payload bytes, need an address and data",
                payload.len()
            )));
        }
        verify(payload, received)?;
        let (address, data) = payload.split_at(ADDRESS_LEN);
        let address = u32::from_be_bytes([address[0], address[1], address[2], address[3]]);
        Ok((address, data.to_vec()))
    }
}

/// Largest length not above `length` whose bytes are all 7-bit.
fn encodable_floor(length: u32) -> u32 {
    let mut bytes = length.to_be_bytes();
    if let Some(high) = bytes.iter().position(|b| b & 0x80 != 0) {
        for byte in &mut bytes[high..] {
            *byte = 0x7f;
        }
    }
    u32::from_be_bytes(bytes)
}
