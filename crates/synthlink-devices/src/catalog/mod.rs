//! Built-in device profiles.

pub mod alpha_juno;
pub mod pcr_a30;
pub mod roland_d2;
pub mod yamaha_mu50;

use crate::profile::DeviceProfile;

/// Roland manufacturer ID.
pub const ROLAND: u8 = 0x41;
/// Yamaha manufacturer ID.
pub const YAMAHA: u8 = 0x43;

/// Every built-in profile, in registration order.
pub fn builtin_profiles() -> Vec<DeviceProfile> {
    vec![
        pcr_a30::profile(),
        alpha_juno::profile(),
        roland_d2::profile(),
        yamaha_mu50::profile(),
    ]
}

/// `labels` as a shared choice list.
pub(crate) fn labels(labels: &[&str]) -> synthlink_core::Choices {
    synthlink_core::choices(labels)
}
