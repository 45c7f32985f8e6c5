//! Transport boundary: raw SysEx buffers in, raw SysEx buffers out.
//!
//! A transport never blocks the poll loop. Inbound buffers arrive complete,
//! `F0 .. F7` included, tagged with the endpoint they came from.

mod memory;
#[cfg(feature = "midi-io")]
mod midir;

pub use memory::{MemoryHandle, MemoryTransport};
#[cfg(feature = "midi-io")]
pub use self::midir::{MidiPortInfo, MidirTransport};

use crate::Result;
use std::fmt;

/// One bidirectional connection to a device (an input/output port pair).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EndpointId(pub u32);

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointInfo {
    pub id: EndpointId,
    pub name: String,
}

/// A complete SysEx message received on `endpoint`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundSysex {
    pub endpoint: EndpointId,
    pub bytes: Vec<u8>,
}

pub trait SysexTransport {
    /// Everything received since the last call. Never blocks; an empty
    /// result is not an error.
    fn poll(&mut self) -> Vec<InboundSysex>;

    fn send(&mut self, endpoint: EndpointId, bytes: &[u8]) -> Result<()>;

    fn endpoints(&self) -> Vec<EndpointInfo>;

    /// Send `bytes` to every endpoint, stopping at the first failure.
    fn broadcast(&mut self, bytes: &[u8]) -> Result<()> {
        for endpoint in self.endpoints() {
            self.send(endpoint.id, bytes)?;
        }
        Ok(())
    }
}
