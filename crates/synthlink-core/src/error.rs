//! Error types for the parameter model and SysEx codecs.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Address {0:#010x} is unmapped")]
    UnmappedAddress(u32),

    #[error("Region {start:#x}..{end:#x} overlaps {other_start:#x}..{other_end:#x}")]
    Overlap {
        start: u32,
        end: u32,
        other_start: u32,
        other_end: u32,
    },

    #[error("Submap based at {actual:#x} appended at {expected:#x}")]
    MisplacedSubmap { expected: u32, actual: u32 },

    #[error("Parameter '{name}' value {value} out of range {min}..={max}")]
    ValueOutOfRange {
        name: String,
        value: u8,
        min: u8,
        max: u8,
    },

    #[error("Checksum mismatch: expected {expected:#04x}, got {actual:#04x}")]
    ChecksumMismatch { expected: u8, actual: u8 },

    #[error("Malformed SysEx: {0}")]
    MalformedSysex(String),

    #[error("Write of {len} bytes at {start:#x} fits no message shape of this device")]
    UnsupportedWrite { start: u32, len: usize },

    #[error("Address or length {0:#010x} does not fit in 7-bit SysEx bytes")]
    UnencodableAddress(u32),

    #[error("Value {value:#04x} at {address:#x} does not fit in a 7-bit SysEx data byte")]
    UnencodableData { address: u32, value: u8 },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
