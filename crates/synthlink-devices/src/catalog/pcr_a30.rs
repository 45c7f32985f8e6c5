//! Roland PCR-A30 MIDI keyboard controller.
//!
//! Each memory set holds 27 controller assignments of 128 bytes. The byte
//! layout inside an assignment is not documented, so every byte is exposed
//! as a raw value. Transfers are bulk only.

use super::ROLAND;
use crate::profile::{DeviceIdentity, DeviceProfile};
use std::time::Duration;
use synthlink_core::{AddressedCodec, Category, ParameterSchema, SyncPolicy, SysexProtocol};

pub const NAME: &str = "PCR-A30";

pub const MEMORY_SET_STRIDE: u32 = 0x0001_0000;
pub const MEMORY_SETS: u32 = 15;
pub const CONTROL_STRIDE: u32 = 0x100;
pub const CONTROL_SIZE: usize = 128;

/// Controller names in assignment order.
pub const CONTROLS: [&str; 27] = [
    "R1", "R2", "R3", "R4", "R5", "R6", "R7", "R8", "S1", "S2", "S3", "S4", "S5", "S6", "S7", "S8",
    "B1", "B2", "B3", "B4", "B5", "B6", "L1", "L2", "L3", "P1", "P2",
];

pub fn profile() -> DeviceProfile {
    DeviceProfile::builder(NAME)
        .identity(DeviceIdentity::new(&[ROLAND], [0x62, 0x01], [0x00, 0x00], [0x01, 0x01, 0x00, 0x00]))
        .protocol(SysexProtocol::Addressed(AddressedCodec::new(ROLAND, 0x62)))
        .sync(SyncPolicy::BulkOnly)
        .icon(Category::Patch)
        .schema(schema)
        .build()
}

/// Base address of memory set `n` (1-based).
pub fn memory_set_base(n: u32) -> u32 {
    MEMORY_SET_STRIDE * n
}

pub fn schema() -> synthlink_core::Result<ParameterSchema> {
    ParameterSchema::build(|root| {
        root.request_delay(Duration::from_millis(500));
        for n in 1..=MEMORY_SETS {
            root.group(memory_set_base(n), format!("Memory set {n:X}"), |set| {
                set.list_entry(Category::Group)
                    .request_delay(Duration::from_millis(40));
                for (i, control) in (0u32..).zip(CONTROLS) {
                    set.group(CONTROL_STRIDE * i, control, |assignment| {
                        assignment.list_entry(Category::Group);
                        assignment.group(0, "Unknown", |raw| {
                            raw.page_entry();
                            for _ in 0..CONTROL_SIZE {
                                raw.param("Unknown", 0..=127)?;
                            }
                            Ok(())
                        })
                    })?;
                }
                Ok(())
            })?;
        }
        Ok(())
    })
}
