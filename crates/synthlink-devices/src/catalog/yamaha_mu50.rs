//! Yamaha MU50 tone generator. Identified, but no parameters are mapped.

use super::YAMAHA;
use crate::profile::{DeviceIdentity, DeviceProfile};
use synthlink_core::{SyncPolicy, SysexProtocol};

pub const NAME: &str = "Yamaha MU50";

pub fn profile() -> DeviceProfile {
    DeviceProfile::builder(NAME)
        .identity(DeviceIdentity::new(&[YAMAHA], [0x00, 0x41], [0x46, 0x01], [0x00, 0x00, 0x00, 0x01]))
        .protocol(SysexProtocol::IdentityOnly)
        .sync(SyncPolicy::BulkOnly)
        .build()
}
