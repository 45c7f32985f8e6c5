use super::addressed::AddressedCodec;
use super::patch::{PatchCodec, ShapedMessage};
use crate::error::{Error, Result};

/// Outcome of offering an inbound buffer to a codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// Addressed data: write `payload` at `address..`.
    Data { address: u32, payload: Vec<u8> },
    /// Fixed-shape message; the address is implied by the shape.
    Shaped(ShapedMessage),
    /// Ours, but unusable (bad checksum, truncated). Nothing is applied.
    Discarded(Error),
    /// Someone else's traffic.
    NotThisFormat,
}

impl Decoded {
    /// `(address, bytes)` to store, when there is anything to store.
    pub fn into_data(self) -> Option<(u32, Vec<u8>)> {
        match self {
            Decoded::Data { address, payload } => Some((address, payload)),
            Decoded::Shaped(message) => Some(message.into_data()),
            Decoded::Discarded(_) | Decoded::NotThisFormat => None,
        }
    }
}

/// Framing strategy of one device model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SysexProtocol {
    /// Random-access memory behind read/write data requests.
    Addressed(AddressedCodec),
    /// Address-less fixed-shape patch messages.
    FixedShape(PatchCodec),
    /// Answers the identity handshake and nothing else we understand.
    IdentityOnly,
}

impl SysexProtocol {
    /// Read requests for `start..start + length`; empty when the protocol
    /// cannot read.
    pub fn read_requests(&self, channel: u8, start: u32, length: u32) -> Result<Vec<Vec<u8>>> {
        match self {
            SysexProtocol::Addressed(codec) => codec.read_requests(channel, start, length),
            SysexProtocol::FixedShape(_) | SysexProtocol::IdentityOnly => Ok(Vec::new()),
        }
    }

    /// Frames storing `data` at `start` on the device.
    pub fn write_requests(&self, channel: u8, start: u32, data: &[u8]) -> Result<Vec<Vec<u8>>> {
        match self {
            SysexProtocol::Addressed(codec) => Ok(vec![codec.write_request(channel, start, data)?]),
            SysexProtocol::FixedShape(codec) => codec.write_requests(channel, start, data),
            SysexProtocol::IdentityOnly => Err(Error::UnsupportedWrite {
                start,
                len: data.len(),
            }),
        }
    }

    /// True when `bytes` is non-identity traffic for a device on `channel`.
    pub fn claims(&self, channel: u8, bytes: &[u8]) -> bool {
        match self {
            SysexProtocol::Addressed(codec) => codec.claims(channel, bytes),
            SysexProtocol::FixedShape(codec) => codec.claims(channel, bytes),
            SysexProtocol::IdentityOnly => false,
        }
    }

    /// Channel of session-less traffic that identifies its sender by shape.
    ///
    /// Only fixed-shape devices qualify: they cannot be asked for identity.
    pub fn match_channel(&self, bytes: &[u8]) -> Option<u8> {
        match self {
            SysexProtocol::FixedShape(codec) => codec.match_channel(bytes),
            SysexProtocol::Addressed(_) | SysexProtocol::IdentityOnly => None,
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> Decoded {
        match self {
            SysexProtocol::Addressed(codec) => codec.parse(bytes),
            SysexProtocol::FixedShape(codec) => codec.parse(bytes),
            SysexProtocol::IdentityOnly => Decoded::NotThisFormat,
        }
    }

    pub fn supports_read(&self) -> bool {
        matches!(self, SysexProtocol::Addressed(_))
    }
}
