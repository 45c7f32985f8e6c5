//! Universal identity request / response.

use super::{SYSEX_END, SYSEX_START, UNIVERSAL_NON_REALTIME};
use smallvec::SmallVec;

/// Broadcast identity request, addressed to every device ID.
pub const IDENTITY_REQUEST: [u8; 6] = [SYSEX_START, UNIVERSAL_NON_REALTIME, 0x7f, 0x06, 0x01, SYSEX_END];

const GENERAL_INFORMATION: u8 = 0x06;
const IDENTITY_REPLY: u8 = 0x02;

/// Decoded `F0 7E <ch> 06 02 <mfr> <family:2> <model:2> <version:4> F7`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityResponse {
    pub channel: u8,
    /// One byte, or three bytes when the first is `00`.
    pub manufacturer: SmallVec<[u8; 3]>,
    pub family: [u8; 2],
    pub model: [u8; 2],
    pub version: [u8; 4],
}

impl IdentityResponse {
    /// Parse an identity response; `None` for any other message.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let [SYSEX_START, UNIVERSAL_NON_REALTIME, channel, GENERAL_INFORMATION, IDENTITY_REPLY, rest @ ..] =
            bytes
        else {
            return None;
        };
        let manufacturer_len = match rest.first()? {
            0x00 => 3,
            _ => 1,
        };
        let body = rest.get(manufacturer_len..)?;
        let [f0, f1, m0, m1, v0, v1, v2, v3, SYSEX_END] = *body else {
            return None;
        };
        Some(Self {
            channel: *channel,
            manufacturer: SmallVec::from_slice(&rest[..manufacturer_len]),
            family: [f0, f1],
            model: [m0, m1],
            version: [v0, v1, v2, v3],
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![
            SYSEX_START,
            UNIVERSAL_NON_REALTIME,
            self.channel,
            GENERAL_INFORMATION,
            IDENTITY_REPLY,
        ];
        bytes.extend_from_slice(&self.manufacturer);
        bytes.extend_from_slice(&self.family);
        bytes.extend_from_slice(&self.model);
        bytes.extend_from_slice(&self.version);
        bytes.push(SYSEX_END);
        bytes
    }

    /// True when `bytes` has the identity-response shape, whatever its content.
    #[inline]
    pub fn is_identity_response(bytes: &[u8]) -> bool {
        Self::parse(bytes).is_some()
    }
}
