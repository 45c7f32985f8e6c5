//! Fixed-shape patch messages without an embedded address.
//!
//! Used by Alpha Juno class devices, which send two kinds of tone traffic:
//!
//! - `F0 41 35 <ch> 23 20 01 <46 data bytes> F7` (all parameters, "APR")
//! - `F0 41 36 <ch> 23 20 01 <param> <value> F7` (one parameter, "IPR")
//!
//! The shape is told apart by the discriminator byte and total length. The
//! parameter index of an update doubles as its address in the tone map.

use super::protocol::Decoded;
use super::{ensure_data, SYSEX_END, SYSEX_START};
use crate::error::{Error, Result};

const ROLAND: u8 = 0x41;
const ALL_PARAMETERS: u8 = 0x35;
const INDIVIDUAL_PARAMETER: u8 = 0x36;
const FORMAT_TAIL: [u8; 3] = [0x23, 0x20, 0x01];
const HEADER_LEN: usize = 7;

/// Data bytes carried by a full patch message.
pub const FULL_PATCH_SIZE: usize = 46;
/// Total frame length of a full patch message.
pub const FULL_PATCH_LEN: usize = HEADER_LEN + FULL_PATCH_SIZE + 1;
/// Total frame length of a single-parameter update.
pub const PARAMETER_UPDATE_LEN: usize = HEADER_LEN + 3;

/// Message recognised purely by its shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapedMessage {
    ParameterUpdate { index: u8, value: u8 },
    FullPatch(Vec<u8>),
}

impl ShapedMessage {
    /// Address and bytes this message writes in the tone map.
    pub fn into_data(self) -> (u32, Vec<u8>) {
        match self {
            ShapedMessage::ParameterUpdate { index, value } => (u32::from(index), vec![value]),
            ShapedMessage::FullPatch(data) => (0, data),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PatchCodec;

impl PatchCodec {
    fn header(kind: u8, channel: u8) -> [u8; HEADER_LEN] {
        [
            SYSEX_START,
            ROLAND,
            kind,
            channel,
            FORMAT_TAIL[0],
            FORMAT_TAIL[1],
            FORMAT_TAIL[2],
        ]
    }

    /// Channel of either message shape, from its header alone.
    pub fn match_channel(&self, bytes: &[u8]) -> Option<u8> {
        match bytes {
            [SYSEX_START, ROLAND, ALL_PARAMETERS | INDIVIDUAL_PARAMETER, channel, a, b, c, ..]
                if [*a, *b, *c] == FORMAT_TAIL =>
            {
                Some(*channel)
            }
            _ => None,
        }
    }

    pub fn claims(&self, channel: u8, bytes: &[u8]) -> bool {
        self.match_channel(bytes) == Some(channel)
    }

    pub fn parse(&self, bytes: &[u8]) -> Decoded {
        if self.match_channel(bytes).is_none() {
            return Decoded::NotThisFormat;
        }
        match (bytes[2], bytes.len(), bytes.last()) {
            (ALL_PARAMETERS, FULL_PATCH_LEN, Some(&SYSEX_END)) => {
                let data = &bytes[HEADER_LEN..HEADER_LEN + FULL_PATCH_SIZE];
                match data.iter().find(|&&b| b > 0x7f) {
                    Some(bad) => Decoded::Discarded(Error::MalformedSysex(format!(
                        "status byte {bad:#04x} inside patch data"
                    ))),
                    None => Decoded::Shaped(ShapedMessage::FullPatch(data.to_vec())),
                }
            }
            (INDIVIDUAL_PARAMETER, PARAMETER_UPDATE_LEN, Some(&SYSEX_END)) => {
                let (index, value) = (bytes[HEADER_LEN], bytes[HEADER_LEN + 1]);
                if index > 0x7f || value > 0x7f {
                    return Decoded::Discarded(Error::MalformedSysex(
                        "status byte inside parameter update".into(),
                    ));
                }
                Decoded::Shaped(ShapedMessage::ParameterUpdate { index, value })
            }
            (kind, len, _) => Decoded::Discarded(Error::MalformedSysex(format!(
                "{len}-byte message of kind {kind:#04x} fits no patch shape"
            ))),
        }
    }

    /// Frames writing `data` at `start` in the tone map.
    ///
    /// The whole tone goes out as one full patch; anything else as one
    /// parameter update per byte.
    pub fn write_requests(&self, channel: u8, start: u32, data: &[u8]) -> Result<Vec<Vec<u8>>> {
        ensure_data(start, data)?;
        if start == 0 && data.len() == FULL_PATCH_SIZE {
            let mut frame = Vec::with_capacity(FULL_PATCH_LEN);
            frame.extend_from_slice(&Self::header(ALL_PARAMETERS, channel));
            frame.extend_from_slice(data);
            frame.push(SYSEX_END);
            return Ok(vec![frame]);
        }

        let unsupported = Error::UnsupportedWrite {
            start,
            len: data.len(),
        };
        let mut frames = Vec::with_capacity(data.len());
        for (address, &value) in (start..).zip(data) {
            let index = u8::try_from(address)
                .ok()
                .filter(|&i| i <= 0x7f)
                .ok_or_else(|| unsupported.clone())?;
            let mut frame = Vec::with_capacity(PARAMETER_UPDATE_LEN);
            frame.extend_from_slice(&Self::header(INDIVIDUAL_PARAMETER, channel));
            frame.extend_from_slice(&[index, value, SYSEX_END]);
            frames.push(frame);
        }
        if frames.is_empty() {
            return Err(unsupported);
        }
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sysex::hexdump;

    fn full_patch(channel: u8) -> Vec<u8> {
        let mut frame = PatchCodec::header(ALL_PARAMETERS, channel).to_vec();
        frame.extend((0..FULL_PATCH_SIZE as u8).map(|i| i % 64));
        frame.push(SYSEX_END);
        frame
    }

    #[test]
    fn test_frame_lengths() {
        assert_eq!(FULL_PATCH_LEN, 54);
        assert_eq!(PARAMETER_UPDATE_LEN, 10);
        assert_eq!(full_patch(0).len(), FULL_PATCH_LEN);
    }

    #[test]
    fn test_parse_full_patch() {
        let frame = full_patch(2);
        assert_eq!(PatchCodec.match_channel(&frame), Some(2));
        match PatchCodec.parse(&frame) {
            Decoded::Shaped(message) => {
                let (address, data) = message.into_data();
                assert_eq!(address, 0);
                assert_eq!(data.len(), FULL_PATCH_SIZE);
                assert_eq!(data[45], 45);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_parameter_update() {
        let frame = [0xf0, 0x41, 0x36, 0x00, 0x23, 0x20, 0x01, 0x10, 0x55, 0xf7];
        assert_eq!(
            PatchCodec.parse(&frame),
            Decoded::Shaped(ShapedMessage::ParameterUpdate {
                index: 0x10,
                value: 0x55
            })
        );
    }

    #[test]
    fn test_wrong_length_is_discarded() {
        let mut frame = full_patch(0);
        frame.remove(10);
        assert!(matches!(
            PatchCodec.parse(&frame),
            Decoded::Discarded(Error::MalformedSysex(_))
        ));
        assert_eq!(PatchCodec.parse(&[0xf0, 0x41, 0x10, 0x00, 0xf7]), Decoded::NotThisFormat);
    }

    #[test]
    fn test_write_requests() {
        let tone: Vec<u8> = vec![0; FULL_PATCH_SIZE];
        let frames = PatchCodec.write_requests(1, 0, &tone).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0], {
            let mut expected = PatchCodec::header(ALL_PARAMETERS, 1).to_vec();
            expected.extend_from_slice(&tone);
            expected.push(SYSEX_END);
            expected
        });

        let frames = PatchCodec.write_requests(0, 0x0b, &[0x20, 0x21]).unwrap();
        assert_eq!(frames.len(), 2);
        insta::assert_snapshot!(hexdump(&frames[1]), @"f0 41 36 00 23 20 01 0c 21 f7");

        assert!(matches!(
            PatchCodec.write_requests(0, 0x7f, &[1, 2]),
            Err(Error::UnsupportedWrite { start: 0x7f, len: 2 })
        ));
        assert!(PatchCodec.write_requests(0, 0, &[]).is_err());
    }

    #[test]
    fn test_status_bytes_are_never_written() {
        assert_eq!(
            PatchCodec.write_requests(0, 0x10, &[0x90]),
            Err(Error::UnencodableData {
                address: 0x10,
                value: 0x90
            })
        );
        let mut tone = vec![0; FULL_PATCH_SIZE];
        tone[45] = 0xff;
        assert!(matches!(
            PatchCodec.write_requests(0, 0, &tone),
            Err(Error::UnencodableData { address: 45, .. })
        ));
    }
}
