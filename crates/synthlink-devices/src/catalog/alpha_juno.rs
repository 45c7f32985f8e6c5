//! Roland Alpha Juno (1/2, HS-60, MKS-50 tone section).
//!
//! The Alpha Juno has no identity reply and no addressed memory. It pushes
//! its edit buffer as fixed-shape tone messages, which is also how it is
//! recognised.

use super::labels;
use crate::profile::DeviceProfile;
use synthlink_core::{Category, Charset, ParameterSchema, PatchCodec, SyncPolicy, SysexProtocol};

pub const NAME: &str = "Alpha Juno";

/// Address of the 10-character tone name.
pub const TONE_NAME: u32 = 36;

pub fn profile() -> DeviceProfile {
    DeviceProfile::builder(NAME)
        .protocol(SysexProtocol::FixedShape(PatchCodec))
        .sync(SyncPolicy::PushOnly)
        .priority(1)
        .icon(Category::Patch)
        .schema(schema)
        .build()
}

pub fn schema() -> synthlink_core::Result<ParameterSchema> {
    ParameterSchema::build(|root| {
        root.group(0, "Tone", |tone| {
            tone.list_entry(Category::Tone);
            tone.group(0, "Parameters", |g| {
                g.page_entry();
                g.param_with(
                    "DCO Env Mode",
                    0..=3,
                    &labels(&[
                        "Env normal",
                        "Env inverted",
                        "Env normal with velocity",
                        "Env inverted with velocity",
                    ]),
                )?;
                g.param_with(
                    "VCF Env Mode",
                    0..=3,
                    &labels(&[
                        "Env normal",
                        "Env inverted",
                        "Env normal with velocity",
                        "Velocity",
                    ]),
                )?;
                g.param_with(
                    "VCA Env Mode",
                    0..=3,
                    &labels(&["Env", "Gate", "Env with velocity", "Gate with velocity"]),
                )?;
                g.param("DCO Waveform Pulse", 0..=3)?;
                g.param("DCO Waveform Sawtooth", 0..=5)?;
                g.param("DCO Waveform Sub", 0..=5)?;
                g.param_with("DCO Range", 0..=3, &labels(&["4'", "8'", "16'", "32'"]))?;
                g.param("DCO Sub Level", 0..=3)?;
                g.param("DCO Noise Level", 0..=3)?;
                g.param("HPF Cutoff Freq", 0..=3)?;
                g.param_with("Chorus", 0..=1, &labels(&["Off", "On"]))?;
                for name in [
                    "DCO LFO Mod Depth",
                    "DCO Env Mod Depth",
                    "DCO After Depth",
                    "DCO PW/PWM Depth",
                    "DCO PWM Rate",
                    "VCF Cutoff Freq",
                    "VCF Resonance",
                    "VCF LFO Mod Depth",
                    "VCF Env Mod Depth",
                    "VCF Key Follow",
                    "VCF After Depth",
                    "VCA Level",
                    "VCA After Depth",
                    "LFO Rate",
                    "LFO Delay Time",
                ] {
                    g.param(name, 0..=127)?;
                }
                for n in 1..=4 {
                    g.param(format!("Env T{n}"), 0..=127)?;
                    if n < 4 {
                        g.param(format!("Env L{n}"), 0..=127)?;
                    }
                }
                g.param("Env Key Follow", 0..=127)?;
                g.param("Chorus Rate", 0..=127)?;
                g.param("Bender Range", 0..=12)?;
                g.text(TONE_NAME, "Tone name", 10, Charset::AlphaJuno)
            })
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthlink_core::sysex::FULL_PATCH_SIZE;

    #[test]
    fn test_tone_map_matches_full_patch() {
        let schema = schema().unwrap();
        assert_eq!(schema.parameter_count(), FULL_PATCH_SIZE);
        assert_eq!(schema.root().end(), FULL_PATCH_SIZE as u32);
        assert_eq!(schema.descriptor(35).unwrap().name(), "Bender Range");
        assert_eq!(schema.descriptor(TONE_NAME).unwrap().name(), "Tone name 1");
    }

    #[test]
    fn test_tone_name_uses_juno_charset() {
        let mut instance = schema().unwrap().instantiate();
        instance.write_bytes(TONE_NAME, &[1, 26, 52, 62, 63]);
        assert_eq!(instance.node_text(TONE_NAME).unwrap(), "Ba0 -AAAAA");
        assert_eq!(instance.entry_name(TONE_NAME), "Tone");
    }
}
