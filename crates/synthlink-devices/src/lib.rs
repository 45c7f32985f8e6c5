//! Device profiles: identity rules, protocol and schema of each supported
//! synthesizer model, and the registry sessions are matched against.

pub mod catalog;
pub mod error;
pub mod profile;
pub mod registry;

pub use error::{Error, Result};
pub use profile::{
    DeviceIdentity, DeviceProfile, DeviceProfileBuilder, IdentityMatch, SchemaFactory,
    DEFAULT_PRIORITY,
};
pub use registry::{ProfileMatch, ProfileRegistry};
