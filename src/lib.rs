//! # Synthlink - Hardware Synthesizer Editor Core
//!
//! Keeps a live mirror of a synthesizer's parameter memory in sync over MIDI
//! System Exclusive.
//!
//! ## Architecture
//!
//! Synthlink is an umbrella crate that coordinates:
//! - **synthlink-core** - Sparse address spaces, parameter schemas and instances, SysEx codecs
//! - **synthlink-devices** - Device profiles, identity matching, built-in catalog
//! - **synthlink-midi-io** - Transports, device sessions and the poll loop
//!
//! ## Quick Start
//!
//! ```ignore
//! use synthlink::prelude::*;
//!
//! let mut editor = synthlink::hardware_editor(EditorConfig::default(), &["D2"])?;
//!
//! loop {
//!     editor.poll();
//!     if let Some(instance) = editor.focused_session().and_then(|s| s.instance()) {
//!         for (category, entry) in instance.list_entries() {
//!             // build navigation ...
//!         }
//!     }
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Hardware MIDI I/O
//! - `midi-io` - `midir` transport

pub mod error;

mod editor;

/// Re-export of synthlink-core for direct access
pub use synthlink_core as core;
pub use synthlink_devices as devices;
pub use synthlink_midi_io as midi_io;

pub use error::{Error, Result};

pub use editor::offline_editor;
#[cfg(feature = "midi-io")]
pub use editor::hardware_editor;

pub use synthlink_core::{
    AddressSpace, Category, InstanceNode, ParameterDescriptor, ParameterInstance, ParameterSchema,
    ParameterValue, SyncPolicy, SysexProtocol, ValueChange, WriteReport,
};
pub use synthlink_devices::{DeviceIdentity, DeviceProfile, ProfileRegistry};
pub use synthlink_midi_io::{
    DeviceSession, EditorConfig, EndpointId, SessionId, SessionManager, SessionState,
    SysexOutcome, SysexTransport,
};

#[cfg(feature = "midi-io")]
pub use synthlink_midi_io::MidirTransport;

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{
        DeviceSession, EditorConfig, ParameterInstance, SessionId, SessionManager, SyncPolicy,
    };

    pub use crate::core::{Category, InstanceNode, ValueChange};
    pub use crate::devices::ProfileRegistry;
}
