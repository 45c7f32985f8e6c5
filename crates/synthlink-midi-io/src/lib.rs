//! Device sessions for hardware synthesizer editors.
//!
//! A [`SessionManager`] drains a [`SysexTransport`], matches unknown traffic
//! against a [`ProfileRegistry`](synthlink_devices::ProfileRegistry), and keeps
//! one [`DeviceSession`] per identified device.
//!
//! # Feature Flags
//!
//! - `midi-io` (default): hardware transport via `midir`

pub mod config;
pub mod error;
pub mod manager;
pub mod session;
pub mod transport;

pub use config::{EditorConfig, DEFAULT_MAX_INBOUND_LEN};
pub use error::{Error, Result};
pub use manager::{SessionCallback, SessionManager, SessionManagerBuilder};
pub use session::{DeviceSession, SessionId, SessionState, SysexOutcome};
pub use transport::{
    EndpointId, EndpointInfo, InboundSysex, MemoryHandle, MemoryTransport, SysexTransport,
};

#[cfg(feature = "midi-io")]
pub use transport::{MidiPortInfo, MidirTransport};
