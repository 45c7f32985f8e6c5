//! Parameter memory model and SysEx codecs for hardware synthesizer editors.
//!
//! A device's parameter memory is described once per model as a sparse
//! [`ParameterSchema`], instantiated per connected device as a
//! [`ParameterInstance`], and kept in sync through the codecs in [`sysex`].

pub mod address_space;
pub mod error;
pub mod instance;
pub mod parameter;
pub mod policy;
pub mod schema;
pub mod sysex;

pub use address_space::{AddressSpace, ContiguousRun, Submap};
pub use error::{Error, Result};
pub use instance::{InstanceNode, ParameterInstance, PolicyRun, WriteReport};
pub use parameter::{choices, Choices, ObserverId, ParameterDescriptor, ParameterValue, ValueChange};
pub use policy::SyncPolicy;
pub use schema::{
    Category, Charset, GroupBuilder, NodeInfo, NodeKind, ParameterSchema, SchemaNode,
    ALPHA_JUNO_CHARACTERS, WAVE_COUNT, WAVE_GROUP_SIZE,
};
pub use sysex::{
    AddressedCodec, Decoded, IdentityResponse, PatchCodec, ShapedMessage, SysexProtocol,
    IDENTITY_REQUEST,
};
