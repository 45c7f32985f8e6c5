//! Roland D2 groovebox (MC-307 sound engine).
//!
//! Addressed random-access memory: seven patches of one common block and four
//! tones at `02 0p 00 00`, and the rhythm set at `02 09 00 00` with one block
//! per drum note.

mod waves;

pub use waves::WAVE_NAMES;

use super::{labels, ROLAND};
use crate::profile::{DeviceIdentity, DeviceProfile};
use synthlink_core::{
    choices, AddressedCodec, Category, Charset, Choices, GroupBuilder, ParameterSchema, SyncPolicy,
    SysexProtocol, WAVE_GROUP_SIZE,
};

pub const NAME: &str = "Roland D2";

pub const PATCHES: u32 = 0x0200_0000;
pub const PATCH_STRIDE: u32 = 0x0001_0000;
pub const PATCH_COUNT: u32 = 7;
pub const TONE_OFFSET: u32 = 0x1000;
pub const TONE_STRIDE: u32 = 0x200;
pub const RHYTHM_SET: u32 = 0x0209_0000;
/// Drum notes covered by the rhythm set.
pub const DRUM_NOTES: std::ops::RangeInclusive<u8> = 35..=98;

pub fn profile() -> DeviceProfile {
    DeviceProfile::builder(NAME)
        .identity(DeviceIdentity::new(&[ROLAND], [0x0b, 0x01], [0x03, 0x00], [0x00, 0x03, 0x00, 0x00]))
        .protocol(SysexProtocol::Addressed(AddressedCodec::new(ROLAND, 0x0b)))
        .sync(SyncPolicy::RandomAccess)
        .priority(1)
        .icon(Category::Tone)
        .schema(schema)
        .build()
}

/// Wave list label, `"<group>-<number> <name>"` as printed on the panel.
pub fn wave_label(wave: u16) -> Option<String> {
    let name = WAVE_NAMES.get(usize::from(wave))?;
    let (group, number) = if wave >= WAVE_GROUP_SIZE {
        (2, wave - WAVE_GROUP_SIZE)
    } else {
        (1, wave)
    };
    Some(format!("{group}-{} {name}", number + 1))
}

fn wave_labels() -> Choices {
    let labels: Vec<String> = (0..WAVE_NAMES.len() as u16).filter_map(wave_label).collect();
    choices(&labels)
}

struct Labels {
    waves: Choices,
    off_on: Choices,
    key_follow: Choices,
    key_follow2: Choices,
    wave_gain: Choices,
    random_pitch: Choices,
    filter_type: Choices,
}

impl Labels {
    fn new() -> Self {
        Self {
            waves: wave_labels(),
            off_on: labels(&["Off", "On"]),
            key_follow: labels(&[
                "-100", "-70", "-50", "-30", "-10", "0", "+10", "+20", "+30", "+40", "+50", "+70",
                "+100", "+120", "+150", "+200",
            ]),
            key_follow2: labels(&[
                "-100", "-70", "-50", "-40", "-30", "-20", "-10", "0", "+10", "+20", "+30", "+40",
                "+50", "+70", "+100",
            ]),
            wave_gain: labels(&["-6", "0", "+6", "+12"]),
            random_pitch: labels(&[
                "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "20", "30", "40", "50", "60",
                "70", "80", "90", "100", "200", "300", "400", "500", "600", "700", "800", "900",
                "1000", "1100", "1200",
            ]),
            filter_type: labels(&["Off", "LPF", "BPF", "HPF", "PKG"]),
        }
    }
}

pub fn schema() -> synthlink_core::Result<ParameterSchema> {
    let l = Labels::new();
    ParameterSchema::build(|root| {
        root.group(PATCHES, "Patches", |patches| {
            for n in 0..PATCH_COUNT {
                patches.group(PATCH_STRIDE * n, format!("Patch {}", n + 1), |patch| {
                    patch.list_entry(Category::Patch).midi_channel(n as u8);
                    patch_common(patch, &l)?;
                    for t in 0..4 {
                        patch.group(TONE_OFFSET + TONE_STRIDE * t, format!("Tone {}", t + 1), |tone| {
                            tone.list_entry(Category::Tone);
                            patch_tone(tone, &l)
                        })?;
                    }
                    Ok(())
                })?;
            }
            Ok(())
        })?;
        root.group(RHYTHM_SET, "Rhythm Set", |rhythm| {
            rhythm.list_entry(Category::RhythmSet);
            rhythm.group(0, "Rhythm common", |common| {
                common.page_entry();
                common.text(0, "Patch name", 12, Charset::Ascii)
            })?;
            for note in DRUM_NOTES {
                rhythm.group(0x100 * u32::from(note), format!("Note {}", note_name(note)), |drum| {
                    drum.list_entry(Category::Drum).midi_channel(9).midi_note(note);
                    drum_note(drum, &l)
                })?;
            }
            Ok(())
        })
    })
}

fn note_name(note: u8) -> String {
    const NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];
    format!("{}{}", NAMES[usize::from(note % 12)], note / 12)
}

fn patch_common(patch: &mut GroupBuilder, l: &Labels) -> synthlink_core::Result<()> {
    patch.group(0, "Patch common", |g| {
        g.page_entry();
        g.text(0, "Patch name", 12, Charset::Ascii)?;
        g.region(0x31, |r| {
            r.param("Bend range up", 0..=12)?;
            r.param("Bend range down", 0..=48)?;
            r.param_with("Solo switch", 0..=1, &l.off_on)?;
            r.param_with("Solo legato switch", 0..=1, &l.off_on)?;
            r.param_with("Portamento switch", 0..=1, &l.off_on)?;
            r.param_with("Portamento mode", 0..=1, &labels(&["Normal", "Legato"]))?;
            r.param_with("Portamento type", 0..=1, &labels(&["Rate", "Time"]))?;
            r.param_with("Portamento start", 0..=1, &labels(&["Pitch", "Note"]))?;
            r.param("Portamento time", 0..=127)?;
            Ok(())
        })?;
        g.region(0x40, |r| {
            r.param_with("Velocity range switch", 0..=1, &l.off_on)?;
            Ok(())
        })?;
        g.region(0x42, |r| {
            let booster = labels(&["0", "+6", "+12", "+18"]);
            r.param_with("Stretch tune depth", 0..=3, &labels(&["Off", "1", "2", "3"]))?;
            r.param_with("Voice priority", 0..=1, &labels(&["Last", "Loudest"]))?;
            r.param("Structure type 1/2", 0..=9)?;
            r.param_with("Booster 1/2", 0..=3, &booster)?;
            r.param("Structure type 3/4", 0..=9)?;
            r.param_with("Booster 3/4", 0..=3, &booster)?;
            Ok(())
        })
    })
}

/// Switch, wave select and wave gain at the start of every tone block.
fn tone_head(g: &mut GroupBuilder, l: &Labels) -> synthlink_core::Result<()> {
    g.region(0, |r| {
        r.param_with("Tone switch", 0..=1, &l.off_on)?;
        Ok(())
    })?;
    g.wave_with(1, &l.waves)
}

fn envelope(
    r: &mut GroupBuilder,
    prefix: &str,
    level_max: u8,
    levels: u8,
) -> synthlink_core::Result<()> {
    for n in 0..4 {
        r.param(format!("{prefix} envelope time {n}"), 0..=127)?;
    }
    for n in 0..levels {
        r.param(format!("{prefix} envelope level {n}"), 0..=level_max)?;
    }
    Ok(())
}

fn patch_tone(tone: &mut GroupBuilder, l: &Labels) -> synthlink_core::Result<()> {
    tone.group(0, "Tone", |g| {
        g.page_entry();
        tone_head(g, l)?;
        g.region(5, |r| {
            r.param_with("Wave gain", 0..=3, &l.wave_gain)?;
            r.param_with("FXM switch", 0..=1, &l.off_on)?;
            r.param("FXM color", 0..=3)?;
            r.param("FXM depth", 0..=15)?;
            Ok(())
        })
    })?;
    tone.group(0, "Control", |g| {
        g.page_entry();
        g.region(0x0b, |r| {
            r.param("Velocity crossfade", 0..=127)?;
            r.param("Velocity range lower", 1..=127)?;
            r.param("Velocity range upper", 1..=127)?;
            r.param("Keyboard range lower", 0..=127)?;
            r.param("Keyboard range upper", 0..=127)?;
            Ok(())
        })?;
        g.region(0x15, |r| {
            let destinations = labels(&[
                "Off", "PCH", "CUT", "RES", "LEV", "PAN", "L1P", "L2P", "L1F", "L2F", "L1A", "L2A",
                "PL1", "PL2", "L1R", "L2R",
            ]);
            for source in ["Modulation", "Pitch bend", "Aftertouch"] {
                for n in 1..=4 {
                    r.param_with(format!("{source} {n} destination"), 0..=15, &destinations)?;
                    r.param(format!("{source} {n} depth"), 0..=127)?;
                }
            }
            Ok(())
        })
    })?;
    tone.group(0x2d, "Low frequency oscillators", |r| {
        r.page_entry();
        let waveforms = labels(&["TRI", "SIN", "SAW", "SQR", "TRP", "S&H", "RND", "CHS"]);
        let offsets = labels(&["-100", "-50", "0", "+50", "+100"]);
        let fades = labels(&["ON-IN", "ON-OUT", "OFF-IN", "OFF-OUT"]);
        for n in 1..=2 {
            r.param_with(format!("LFO{n} waveform"), 0..=7, &waveforms)?;
            r.param(format!("LFO{n} key sync"), 0..=1)?;
            r.param(format!("LFO{n} rate"), 0..=127)?;
            r.param_with(format!("LFO{n} offset"), 0..=4, &offsets)?;
            r.param(format!("LFO{n} delay time"), 0..=127)?;
            r.param_with(format!("LFO{n} fade mode"), 0..=3, &fades)?;
            r.param(format!("LFO{n} fade time"), 0..=127)?;
            r.param_with(format!("LFO{n} tempo sync"), 0..=1, &l.off_on)?;
        }
        Ok(())
    })?;
    tone.group(0x3d, "Pitch", |r| {
        r.page_entry();
        r.param("Coarse tune", 0..=96)?;
        r.param("Fine tune", 0..=100)?;
        r.param_with("Random pitch depth", 0..=30, &l.random_pitch)?;
        r.param_with("Pitch key follow", 0..=15, &l.key_follow)?;
        r.param("Pitch envelope depth", 0..=24)?;
        r.param("Pitch envelope velocity sens", 0..=125)?;
        r.param_with("Pitch envelope velocity time 1", 0..=14, &l.key_follow2)?;
        r.param_with("Pitch envelope velocity time 4", 0..=14, &l.key_follow2)?;
        r.param_with("Pitch envelope time key follow", 0..=14, &l.key_follow2)?;
        envelope(r, "Pitch", 126, 4)?;
        r.param("Pitch LFO1 depth", 0..=126)?;
        r.param("Pitch LFO2 depth", 0..=126)?;
        Ok(())
    })?;
    tone.group(0x50, "Filter", |r| {
        r.page_entry();
        r.param_with("Filter type", 0..=4, &l.filter_type)?;
        r.param("Cutoff frequency", 0..=127)?;
        r.param_with("Cutoff key follow", 0..=15, &l.key_follow)?;
        r.param("Resonance", 0..=127)?;
        r.param("Resonance velocity sens", 0..=125)?;
        r.param("Filter envelope depth", 0..=126)?;
        r.param("Filter envelope velocity curve", 0..=6)?;
        r.param("Filter envelope velocity sens", 0..=125)?;
        r.param_with("Filter envelope velocity time 1", 0..=14, &l.key_follow2)?;
        r.param_with("Filter envelope velocity time 4", 0..=14, &l.key_follow2)?;
        r.param_with("Filter envelope time key follow", 0..=14, &l.key_follow2)?;
        envelope(r, "Filter", 127, 4)?;
        r.param("Filter LFO1 depth", 0..=126)?;
        r.param("Filter LFO2 depth", 0..=126)?;
        Ok(())
    })?;
    tone.group(0x65, "Amplification", |r| {
        r.page_entry();
        r.param("Tone level", 0..=127)?;
        r.param_with("Bias direction", 0..=3, &labels(&["Lower", "Upper", "Low&Up", "All"]))?;
        r.param("Bias point", 0..=127)?;
        r.param_with("Bias level", 0..=14, &l.key_follow2)?;
        r.param("Amp envelope velocity curve", 0..=6)?;
        r.param("Amp envelope velocity sens", 0..=125)?;
        r.param_with("Amp envelope velocity time 1", 0..=14, &l.key_follow2)?;
        r.param_with("Amp envelope velocity time 4", 0..=14, &l.key_follow2)?;
        r.param_with("Amp envelope time key follow", 0..=14, &l.key_follow2)?;
        envelope(r, "Amp", 127, 3)?;
        r.param("Amp LFO1 depth", 0..=126)?;
        r.param("Amp LFO2 depth", 0..=126)?;
        r.param("Tone pan", 0..=127)?;
        r.param_with("Pan key follow", 0..=14, &l.key_follow2)?;
        r.param("Random pan", 0..=63)?;
        r.param("Alternate pan depth", 1..=127)?;
        r.param("Pan LFO1 depth", 0..=126)?;
        r.param("Pan LFO2 depth", 0..=126)?;
        Ok(())
    })
}

fn drum_note(drum: &mut GroupBuilder, l: &Labels) -> synthlink_core::Result<()> {
    drum.group(0, "Tone", |g| {
        g.page_entry();
        tone_head(g, l)?;
        g.region(5, |r| {
            let mute_groups: Vec<String> = std::iter::once("Off".to_string())
                .chain((1..=31).map(|n: u8| n.to_string()))
                .collect();
            r.param_with("Wave gain", 0..=3, &l.wave_gain)?;
            r.param("Bend range", 0..=12)?;
            r.param_with("Mute group", 0..=32, &labels(&mute_groups.iter().map(String::as_str).collect::<Vec<_>>()))?;
            r.param_with("Envelope mode", 0..=1, &labels(&["No sustain", "Sustain"]))?;
            Ok(())
        })
    })?;
    drum.group(0x0c, "Pitch", |r| {
        r.page_entry();
        r.param("Coarse tune", 0..=96)?;
        r.param("Fine tune", 0..=100)?;
        r.param_with("Random pitch depth", 0..=30, &l.random_pitch)?;
        r.param("Pitch envelope depth", 0..=24)?;
        r.param("Pitch envelope velocity sens", 0..=125)?;
        r.param_with("Pitch envelope velocity time", 0..=14, &l.key_follow2)?;
        envelope(r, "Pitch", 126, 4)
    })?;
    drum.group(0x1a, "Filter", |r| {
        r.page_entry();
        r.param_with("Filter type", 0..=4, &l.filter_type)?;
        r.param("Cutoff frequency", 0..=127)?;
        r.param("Resonance", 0..=127)?;
        r.param("Resonance velocity sens", 0..=125)?;
        r.param("Filter envelope depth", 0..=126)?;
        r.param("Filter envelope velocity sens", 0..=125)?;
        r.param_with("Filter envelope velocity time", 0..=14, &l.key_follow2)?;
        envelope(r, "Filter", 127, 4)
    })?;
    drum.group(0x29, "Amplification", |r| {
        r.page_entry();
        r.param("Tone level", 0..=127)?;
        r.param("Amp envelope velocity sens", 0..=125)?;
        r.param_with("Amp envelope velocity time", 0..=14, &l.key_follow2)?;
        envelope(r, "Amp", 127, 3)?;
        r.param("Tone pan", 0..=127)?;
        r.param("Random pan", 0..=63)?;
        r.param("Alternate pan depth", 1..=127)?;
        Ok(())
    })?;
    drum.group(0x36, "Output", |g| {
        g.page_entry();
        g.param_with("MFX switch", 0..=1, &l.off_on)?;
        g.region(0x02, |r| {
            r.param("Delay send level", 0..=127)?;
            r.param("Reverb send level", 0..=127)?;
            Ok(())
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthlink_core::{NodeKind, WAVE_COUNT};

    fn tone_base(patch: u32, tone: u32) -> u32 {
        PATCHES + PATCH_STRIDE * patch + TONE_OFFSET + TONE_STRIDE * tone
    }

    #[test]
    fn test_schema_layout() {
        let schema = schema().unwrap();
        assert_eq!(schema.descriptor(PATCHES).unwrap().name(), "Patch name 1");
        assert_eq!(schema.descriptor(PATCHES + 0x31).unwrap().name(), "Bend range up");
        assert_eq!(schema.descriptor(PATCHES + 0x47).unwrap().name(), "Booster 3/4");
        assert!(schema.descriptor(PATCHES + 0x20).is_err());

        let tone = tone_base(6, 3);
        assert_eq!(schema.descriptor(tone).unwrap().name(), "Tone switch");
        assert_eq!(schema.descriptor(tone + 0x0b).unwrap().name(), "Velocity crossfade");
        assert_eq!(schema.descriptor(tone + 0x2c).unwrap().name(), "Aftertouch 4 depth");
        assert_eq!(schema.descriptor(tone + 0x65).unwrap().name(), "Tone level");
        assert_eq!(schema.descriptor(tone + 0x7c).unwrap().name(), "Pan LFO2 depth");
        assert!(schema.descriptor(tone + 0x7d).is_err());
        assert!(schema.descriptor(tone + 0x09).is_err());

        let snare = RHYTHM_SET + 0x100 * 38;
        assert_eq!(schema.descriptor(snare + 0x39).unwrap().name(), "Reverb send level");
        assert_eq!(schema.root().end(), RHYTHM_SET + 0x100 * 98 + 0x3a);
    }

    #[test]
    fn test_list_entries() {
        let instance = schema().unwrap().instantiate();
        let entries = instance.list_entries();
        let count = |c: Category| entries.iter().filter(|(cat, _)| *cat == c).count();
        assert_eq!(count(Category::Patch), 7);
        assert_eq!(count(Category::Tone), 28);
        assert_eq!(count(Category::RhythmSet), 1);
        assert_eq!(count(Category::Drum), 64);

        let drum = entries.iter().find(|(c, _)| *c == Category::Drum).unwrap().1;
        assert_eq!(drum.meta().name.as_deref(), Some("Note B2"));
        assert_eq!(drum.meta().midi_note, Some(35));
        assert_eq!(drum.meta().midi_channel, Some(9));

        let pages = instance.pages(entries[1].1);
        assert_eq!(pages.len(), 6);
    }

    #[test]
    fn test_tone_and_control_share_a_base() {
        let schema = schema().unwrap();
        let tone = tone_base(0, 0);
        let shared: Vec<_> = schema
            .root()
            .nodes()
            .map(|(_, n)| n)
            .filter(|n| n.base() == tone && n.meta().page_entry)
            .map(|n| n.meta().name.clone().unwrap())
            .collect();
        assert_eq!(shared, vec!["Tone", "Control"]);

        let waves = schema
            .root()
            .nodes()
            .filter(|(_, n)| n.meta().kind == NodeKind::WaveSelect)
            .count();
        assert_eq!(waves, 28 + 64);
    }

    #[test]
    fn test_entry_names() {
        let instance = schema().unwrap().instantiate();
        assert_eq!(instance.entry_name(tone_base(2, 1) + 0x50), "Tone 2");
        assert_eq!(instance.entry_name(PATCHES + PATCH_STRIDE * 2 + 0x31), "Patch 3");
        assert_eq!(instance.entry_name(RHYTHM_SET + 3), "Rhythm Set");
    }

    #[test]
    fn test_wave_labels_cover_both_groups() {
        assert_eq!(WAVE_NAMES.len(), usize::from(WAVE_COUNT));
        assert_eq!(wave_label(0).as_deref(), Some("1-1 TB Dst Saw"));
        assert_eq!(wave_label(253).as_deref(), Some("1-254 Triangle 2"));
        assert_eq!(wave_label(254).as_deref(), Some("2-1 SHKR+ Menu"));
        assert_eq!(wave_label(WAVE_COUNT - 1).as_deref(), Some("2-251 Roll Kick"));
        assert_eq!(wave_label(WAVE_COUNT), None);
    }

    #[test]
    fn test_wave_field_shows_names() {
        let mut instance = schema().unwrap().instantiate();
        let wave = tone_base(0, 0) + 1;
        assert_eq!(instance.wave_label(wave).unwrap(), "1-1 TB Dst Saw");

        instance.set_wave_number(wave, 254).unwrap();
        assert_eq!(instance.wave_label(wave).unwrap(), "2-1 SHKR+ Menu");

        let drum_wave = RHYTHM_SET + 0x100 * 35 + 1;
        instance.set_wave_number(drum_wave, 12).unwrap();
        assert_eq!(instance.wave_label(drum_wave).unwrap(), "1-13 JP8000 Saw 1");
    }
}
