//! Static per-model parameter description.
//!
//! A [`ParameterSchema`] is an [`AddressSpace`] whose leaves are
//! [`ParameterDescriptor`]s and whose nodes carry [`NodeInfo`]. It is built
//! once through nested [`GroupBuilder`] closures, validated as it grows, and
//! then shared read-only by every session of the same device model.
//!
//! ```
//! use synthlink_core::{Category, ParameterSchema};
//!
//! let schema = ParameterSchema::build(|root| {
//!     root.group(0x1000, "Patch 1", |patch| {
//!         patch.list_entry(Category::Patch);
//!         patch.group(0, "Common", |common| {
//!             common.page_entry();
//!             common.param("Level", 0..=127)?;
//!             common.param("Pan", 0..=127)?;
//!             Ok(())
//!         })
//!     })
//! })?;
//! assert_eq!(schema.root().end(), 0x1002);
//! # Ok::<(), synthlink_core::Error>(())
//! ```

use crate::address_space::AddressSpace;
use crate::error::Result;
use crate::parameter::{Choices, ParameterDescriptor};
use crate::policy::SyncPolicy;
use serde::Serialize;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

/// Node of a built schema.
pub type SchemaNode = AddressSpace<Arc<ParameterDescriptor>, Arc<NodeInfo>>;

/// What a list-entry node represents in a navigation tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Group,
    Patch,
    Tone,
    RhythmSet,
    Drum,
}

/// Character table for name fields stored one character per byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Charset {
    /// Byte is the ASCII code, printable range 32..=125.
    Ascii,
    /// Byte indexes [`ALPHA_JUNO_CHARACTERS`].
    AlphaJuno,
}

pub const ALPHA_JUNO_CHARACTERS: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789 -";

impl Charset {
    pub fn value_range(self) -> RangeInclusive<u8> {
        match self {
            Charset::Ascii => 32..=125,
            Charset::AlphaJuno => 0..=63,
        }
    }

    pub fn decode(self, byte: u8) -> char {
        match self {
            Charset::Ascii if self.value_range().contains(&byte) => byte as char,
            Charset::Ascii => '?',
            Charset::AlphaJuno => ALPHA_JUNO_CHARACTERS
                .as_bytes()
                .get(byte as usize)
                .map(|&b| b as char)
                .unwrap_or('?'),
        }
    }

    /// Unknown characters encode as a space.
    pub fn encode(self, c: char) -> u8 {
        match self {
            Charset::Ascii if c.is_ascii() && self.value_range().contains(&(c as u8)) => c as u8,
            Charset::Ascii => b' ',
            Charset::AlphaJuno => ALPHA_JUNO_CHARACTERS
                .find(c)
                .or_else(|| ALPHA_JUNO_CHARACTERS.find(' '))
                .unwrap_or(0) as u8,
        }
    }
}

/// How a node's bytes combine into one logical value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case", tag = "type")]
pub enum NodeKind {
    /// Each byte is an independent parameter.
    #[default]
    Plain,
    /// Fixed-width name, one character per byte.
    Text { charset: Charset },
    /// Four bytes `[0, group, high nibble, low nibble]` selecting a wave.
    WaveSelect,
}

/// Number of waves in the first wave group; later waves live in group 2.
pub const WAVE_GROUP_SIZE: u16 = 254;

/// Wave numbers run `0..WAVE_COUNT`.
pub const WAVE_COUNT: u16 = WAVE_GROUP_SIZE + 251;

/// Metadata attached to every schema node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeInfo {
    pub name: Option<String>,
    /// Selectable unit in a navigation tree.
    pub list_entry: Option<Category>,
    /// Unit that groups controls visually.
    pub page_entry: bool,
    /// Overrides the device's sync policy below this node.
    pub sync: Option<SyncPolicy>,
    pub midi_channel: Option<u8>,
    pub midi_note: Option<u8>,
    /// Suggested spacing between requests for this region.
    pub request_delay: Option<Duration>,
    pub kind: NodeKind,
    /// Display labels of the composite value, indexed by that value.
    pub labels: Option<Choices>,
}

impl NodeInfo {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Immutable parameter tree for one device model.
#[derive(Debug, Clone)]
pub struct ParameterSchema {
    root: SchemaNode,
}

impl ParameterSchema {
    /// Build a schema rooted at address 0.
    ///
    /// Fails on the first overlapping region.
    pub fn build<F>(define: F) -> Result<Self>
    where
        F: FnOnce(&mut GroupBuilder) -> Result<()>,
    {
        let mut root = GroupBuilder::new(0, NodeInfo::default());
        define(&mut root)?;
        Ok(Self {
            root: root.finish(),
        })
    }

    #[inline]
    pub fn root(&self) -> &SchemaNode {
        &self.root
    }

    pub fn descriptor(&self, address: u32) -> Result<&Arc<ParameterDescriptor>> {
        self.root.get(address)
    }

    /// Number of declared parameters.
    pub fn parameter_count(&self) -> usize {
        self.root.element_runs().map(|(_, run)| run.len()).sum()
    }

    /// Log the tree at debug level.
    pub fn dump(&self) {
        for (depth, node) in self.root.nodes() {
            let indent = "  ".repeat(depth);
            if let Some(name) = &node.meta().name {
                tracing::debug!("{indent}{name}");
            }
            for descriptor in node.elements() {
                tracing::debug!("{indent}{descriptor}");
            }
        }
    }
}

/// Mutable node handed to schema-definition closures.
pub struct GroupBuilder {
    space: AddressSpace<Arc<ParameterDescriptor>, NodeInfo>,
}

impl GroupBuilder {
    fn new(base: u32, info: NodeInfo) -> Self {
        Self {
            space: AddressSpace::with_meta(base, info),
        }
    }

    fn finish(self) -> SchemaNode {
        self.space
            .map_nodes(&mut |d: &Arc<ParameterDescriptor>| Arc::clone(d), &mut |info: &NodeInfo| {
                Arc::new(info.clone())
            })
    }

    /// Absolute address of this node.
    #[inline]
    pub fn base(&self) -> u32 {
        self.space.base()
    }

    /// Address the next `param` call will occupy.
    #[inline]
    pub fn next_address(&self) -> u32 {
        self.space.base() + self.space.elements().len() as u32
    }

    pub fn list_entry(&mut self, category: Category) -> &mut Self {
        self.space.meta_mut().list_entry = Some(category);
        self
    }

    pub fn page_entry(&mut self) -> &mut Self {
        self.space.meta_mut().page_entry = true;
        self
    }

    pub fn sync(&mut self, policy: SyncPolicy) -> &mut Self {
        self.space.meta_mut().sync = Some(policy);
        self
    }

    pub fn midi_channel(&mut self, channel: u8) -> &mut Self {
        self.space.meta_mut().midi_channel = Some(channel);
        self
    }

    pub fn midi_note(&mut self, note: u8) -> &mut Self {
        self.space.meta_mut().midi_note = Some(note);
        self
    }

    pub fn request_delay(&mut self, delay: Duration) -> &mut Self {
        self.space.meta_mut().request_delay = Some(delay);
        self
    }

    pub fn param(&mut self, name: impl Into<String>, range: RangeInclusive<u8>) -> Result<u32> {
        self.push(ParameterDescriptor::new(
            name,
            range,
            None,
            None,
            self.next_address(),
        ))
    }

    pub fn param_with(
        &mut self,
        name: impl Into<String>,
        range: RangeInclusive<u8>,
        choices: &Choices,
    ) -> Result<u32> {
        self.push(ParameterDescriptor::new(
            name,
            range,
            Some(Arc::clone(choices)),
            None,
            self.next_address(),
        ))
    }

    pub fn param_default(
        &mut self,
        name: impl Into<String>,
        range: RangeInclusive<u8>,
        default: u8,
    ) -> Result<u32> {
        self.push(ParameterDescriptor::new(
            name,
            range,
            None,
            Some(default),
            self.next_address(),
        ))
    }

    fn push(&mut self, descriptor: ParameterDescriptor) -> Result<u32> {
        self.space.append_element(Arc::new(descriptor))
    }

    /// Named child node at `offset` bytes from this node's base.
    pub fn group<F>(&mut self, offset: u32, name: impl Into<String>, define: F) -> Result<()>
    where
        F: FnOnce(&mut GroupBuilder) -> Result<()>,
    {
        self.child(offset, NodeInfo::named(name), define)
    }

    /// Anonymous child node at `offset`; used to place parameters after a gap.
    pub fn region<F>(&mut self, offset: u32, define: F) -> Result<()>
    where
        F: FnOnce(&mut GroupBuilder) -> Result<()>,
    {
        self.child(offset, NodeInfo::default(), define)
    }

    fn child<F>(&mut self, offset: u32, info: NodeInfo, define: F) -> Result<()>
    where
        F: FnOnce(&mut GroupBuilder) -> Result<()>,
    {
        let mut child = GroupBuilder::new(self.space.base() + offset, info);
        define(&mut child)?;
        self.space.append_submap(offset, child.space)
    }

    /// Fixed-width name field of `width` characters.
    pub fn text(&mut self, offset: u32, label: &str, width: u8, charset: Charset) -> Result<()> {
        let info = NodeInfo {
            name: Some(label.to_string()),
            kind: NodeKind::Text { charset },
            ..NodeInfo::default()
        };
        self.child(offset, info, |field| {
            for n in 1..=width {
                field.param(format!("{label} {n}"), charset.value_range())?;
            }
            Ok(())
        })
    }

    /// Four-byte wave selector.
    pub fn wave(&mut self, offset: u32) -> Result<()> {
        self.wave_node(offset, None)
    }

    /// Four-byte wave selector whose waves display as `labels`.
    pub fn wave_with(&mut self, offset: u32, labels: &Choices) -> Result<()> {
        self.wave_node(offset, Some(Arc::clone(labels)))
    }

    fn wave_node(&mut self, offset: u32, labels: Option<Choices>) -> Result<()> {
        let info = NodeInfo {
            name: Some("Wave".to_string()),
            kind: NodeKind::WaveSelect,
            labels,
            ..NodeInfo::default()
        };
        self.child(offset, info, |wave| {
            wave.param("Wave group type", 0..=0)?;
            wave.param("Wave group ID", 1..=2)?;
            wave.param("Wave number (high nibble)", 0..=15)?;
            wave.param("Wave number (low nibble)", 0..=15)?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::parameter::choices;

    fn sample() -> ParameterSchema {
        ParameterSchema::build(|root| {
            root.group(0x0200_0000, "Patches", |patches| {
                patches.group(0, "Patch 1", |patch| {
                    patch.list_entry(Category::Patch).midi_channel(0);
                    patch.group(0, "Common", |common| {
                        common.page_entry();
                        common.text(0, "Patch name", 12, Charset::Ascii)?;
                        common.region(0x31, |r| {
                            r.param("Bend range up", 0..=12)?;
                            r.param_with("Solo switch", 0..=1, &choices(&["Off", "On"]))?;
                            Ok(())
                        })
                    })
                })
            })
        })
        .unwrap()
    }

    #[test]
    fn test_build_assigns_absolute_addresses() {
        let schema = sample();
        let name_start = schema.descriptor(0x0200_0000).unwrap();
        assert_eq!(name_start.name(), "Patch name 1");
        assert_eq!(name_start.range(), 32..=125);

        let solo = schema.descriptor(0x0200_0032).unwrap();
        assert_eq!(solo.address(), 0x0200_0032);
        assert_eq!(solo.display(1), "On");

        assert_eq!(schema.root().end(), 0x0200_0033);
        assert_eq!(schema.parameter_count(), 14);
    }

    #[test]
    fn test_gap_is_unmapped() {
        let schema = sample();
        assert_eq!(
            schema.descriptor(0x0200_0020).unwrap_err(),
            Error::UnmappedAddress(0x0200_0020)
        );
    }

    #[test]
    fn test_overlap_aborts_build() {
        let result = ParameterSchema::build(|root| {
            root.group(0, "A", |a| {
                a.param("x", 0..=127)?;
                a.param("y", 0..=127)?;
                Ok(())
            })?;
            root.group(1, "B", |b| {
                b.param("z", 0..=127)?;
                Ok(())
            })
        });
        assert!(matches!(result, Err(Error::Overlap { start: 1, .. })));
    }

    #[test]
    fn test_node_info_survives_build() {
        let schema = sample();
        let entries: Vec<_> = schema
            .root()
            .nodes()
            .filter(|(_, n)| n.meta().list_entry.is_some())
            .map(|(_, n)| (n.meta().name.clone(), n.meta().midi_channel))
            .collect();
        assert_eq!(entries, vec![(Some("Patch 1".to_string()), Some(0))]);

        let text_nodes = schema
            .root()
            .nodes()
            .filter(|(_, n)| matches!(n.meta().kind, NodeKind::Text { .. }))
            .count();
        assert_eq!(text_nodes, 1);
    }

    #[test]
    fn test_charsets() {
        assert_eq!(Charset::Ascii.decode(b'A'), 'A');
        assert_eq!(Charset::Ascii.encode('~'), b' ');
        assert_eq!(Charset::AlphaJuno.decode(0), 'A');
        assert_eq!(Charset::AlphaJuno.decode(63), '-');
        assert_eq!(Charset::AlphaJuno.encode('z'), 51);
        assert_eq!(Charset::AlphaJuno.encode('!'), 62);
    }
}
