//! Live parameter values for one connected device.
//!
//! A [`ParameterInstance`] mirrors a [`ParameterSchema`] node for node. Each
//! instance node keeps an `Arc` to the [`NodeInfo`] of the schema node it was
//! derived from, so names and markers are looked up rather than copied.

use crate::address_space::{AddressSpace, ContiguousRun};
use crate::error::{Error, Result};
use crate::parameter::{ObserverId, ParameterDescriptor, ParameterValue, ValueChange};
use crate::policy::SyncPolicy;
use crate::schema::{Category, NodeInfo, NodeKind, ParameterSchema, WAVE_COUNT, WAVE_GROUP_SIZE};
use std::sync::Arc;

/// Node of a live instance tree.
pub type InstanceNode = AddressSpace<ParameterValue, Arc<NodeInfo>>;

/// Outcome of applying a block of bytes received from a device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    /// Bytes whose value actually changed.
    pub changed: usize,
    /// Bytes stored despite falling outside their descriptor's range.
    pub out_of_range: usize,
    /// Addresses no declared parameter covers.
    pub unmapped: Vec<u32>,
}

impl WriteReport {
    pub fn is_clean(&self) -> bool {
        self.out_of_range == 0 && self.unmapped.is_empty()
    }
}

/// Declared bytes of one window under a single effective sync policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyRun {
    pub start: u32,
    pub bytes: Vec<u8>,
    pub policy: SyncPolicy,
}

impl PolicyRun {
    pub fn end(&self) -> u64 {
        u64::from(self.start) + self.bytes.len() as u64
    }
}

pub struct ParameterInstance {
    root: InstanceNode,
}

impl ParameterInstance {
    pub fn from_schema(schema: &ParameterSchema) -> Self {
        let root = schema.root().map_nodes(
            &mut |descriptor: &Arc<ParameterDescriptor>| ParameterValue::new(Arc::clone(descriptor)),
            &mut |info: &Arc<NodeInfo>| Arc::clone(info),
        );
        Self { root }
    }

    #[inline]
    pub fn root(&self) -> &InstanceNode {
        &self.root
    }

    pub fn get(&self, address: u32) -> Result<&ParameterValue> {
        self.root.get(address)
    }

    pub fn get_mut(&mut self, address: u32) -> Result<&mut ParameterValue> {
        self.root.get_mut(address)
    }

    pub fn value(&self, address: u32) -> Result<u8> {
        self.get(address).map(ParameterValue::value)
    }

    /// Store one byte; see [`ParameterValue::set`] for the lenient range policy.
    pub fn set(&mut self, address: u32, value: u8) -> Result<bool> {
        self.get_mut(address)?.set(value)
    }

    /// Store `bytes` at `start..`, continuing past bad addresses.
    pub fn write_bytes(&mut self, start: u32, bytes: &[u8]) -> WriteReport {
        let mut report = WriteReport::default();
        for (address, &byte) in (start..).zip(bytes) {
            match self.set(address, byte) {
                Ok(true) => report.changed += 1,
                Ok(false) => {}
                Err(Error::ValueOutOfRange { .. }) => {
                    report.changed += 1;
                    report.out_of_range += 1;
                }
                Err(_) => report.unmapped.push(address),
            }
        }
        report
    }

    pub fn observe<F>(&mut self, address: u32, observer: F) -> Result<ObserverId>
    where
        F: FnMut(&ValueChange) + Send + 'static,
    {
        Ok(self.get_mut(address)?.observe(observer))
    }

    pub fn unobserve(&mut self, address: u32, id: ObserverId) -> bool {
        self.get_mut(address)
            .map(|value| value.unobserve(id))
            .unwrap_or(false)
    }

    pub fn contiguous_runs_in(
        &self,
        start: u32,
        length: u32,
    ) -> impl Iterator<Item = ContiguousRun<'_, ParameterValue>> {
        self.root.contiguous_runs_in(start, length)
    }

    /// Current bytes of every maximal declared run inside the window.
    pub fn snapshot_runs(&self, start: u32, length: u32) -> Vec<(u32, Vec<u8>)> {
        self.contiguous_runs_in(start, length)
            .map(|run| (run.start(), run.iter().map(ParameterValue::value).collect()))
            .collect()
    }

    /// Like [`snapshot_runs`](Self::snapshot_runs), but runs also break
    /// where the effective sync policy changes. Nodes without an override
    /// inherit their parent's policy; the root inherits `default`.
    pub fn policy_runs(&self, start: u32, length: u32, default: SyncPolicy) -> Vec<PolicyRun> {
        let lo = u64::from(start);
        let hi = lo + u64::from(length);
        let mut runs: Vec<PolicyRun> = Vec::new();
        let mut stack = vec![(&self.root, self.root.meta().sync.unwrap_or(default))];
        while let Some((node, policy)) = stack.pop() {
            let children: Vec<_> = node.children().collect();
            stack.extend(
                children
                    .into_iter()
                    .rev()
                    .map(|child| (child, child.meta().sync.unwrap_or(policy))),
            );

            let base = u64::from(node.base());
            let first = lo.max(base);
            let last = hi.min(base + node.elements().len() as u64);
            if first >= last {
                continue;
            }
            let values = node.elements()[(first - base) as usize..(last - base) as usize]
                .iter()
                .map(ParameterValue::value);
            match runs.last_mut() {
                Some(run) if run.end() == first && run.policy == policy => run.bytes.extend(values),
                _ => runs.push(PolicyRun {
                    start: first as u32,
                    bytes: values.collect(),
                    policy,
                }),
            }
        }
        runs
    }

    /// Name of the nearest list entry enclosing `address`, or `"?"`.
    pub fn entry_name(&self, address: u32) -> String {
        self.root
            .path_to(address)
            .and_then(|path| {
                path.into_iter()
                    .rev()
                    .find(|node| node.meta().list_entry.is_some())
                    .and_then(|node| node.meta().name.clone())
            })
            .unwrap_or_else(|| "?".to_string())
    }

    /// Policy override of the nearest enclosing node that declares one.
    pub fn sync_override(&self, address: u32) -> Option<SyncPolicy> {
        self.root
            .path_to(address)?
            .into_iter()
            .rev()
            .find_map(|node| node.meta().sync)
    }

    /// Every list-entry node in address order, with its category.
    pub fn list_entries(&self) -> Vec<(Category, &InstanceNode)> {
        self.root
            .nodes()
            .filter_map(|(_, node)| node.meta().list_entry.map(|c| (c, node)))
            .collect()
    }

    /// Page nodes at or below `node`, not descending into nested pages.
    pub fn pages<'a>(&'a self, node: &'a InstanceNode) -> Vec<&'a InstanceNode> {
        let mut pages = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if current.meta().page_entry {
                pages.push(current);
                continue;
            }
            stack.extend(current.children().collect::<Vec<_>>().into_iter().rev());
        }
        pages
    }

    /// Node whose base is `base` and whose info is `kind`-tagged.
    fn composite(&self, base: u32, want: fn(&NodeKind) -> bool) -> Result<&InstanceNode> {
        self.root
            .nodes()
            .map(|(_, node)| node)
            .find(|node| node.base() == base && want(&node.meta().kind))
            .ok_or(Error::UnmappedAddress(base))
    }

    /// Decoded text of the name field based at `base`, trailing blanks trimmed.
    pub fn node_text(&self, base: u32) -> Result<String> {
        let node = self.composite(base, |k| matches!(k, NodeKind::Text { .. }))?;
        let NodeKind::Text { charset } = node.meta().kind else {
            return Err(Error::UnmappedAddress(base));
        };
        let text: String = node
            .elements()
            .iter()
            .map(|v| charset.decode(v.value()))
            .collect();
        Ok(text.trim().to_string())
    }

    /// Write `text` into the name field at `base`, padded or cut to its width.
    ///
    /// Returns the written `(start, length)` so the caller can push it to the device.
    pub fn set_node_text(&mut self, base: u32, text: &str) -> Result<(u32, u32)> {
        let node = self.composite(base, |k| matches!(k, NodeKind::Text { .. }))?;
        let NodeKind::Text { charset } = node.meta().kind else {
            return Err(Error::UnmappedAddress(base));
        };
        let width = node.elements().len();
        let bytes: Vec<u8> = text
            .chars()
            .chain(std::iter::repeat(' '))
            .take(width)
            .map(|c| charset.encode(c))
            .collect();
        self.write_bytes(base, &bytes);
        Ok((base, width as u32))
    }

    /// Wave number selected by the wave field at `base`.
    pub fn wave_number(&self, base: u32) -> Result<u16> {
        let node = self.composite(base, |k| matches!(k, NodeKind::WaveSelect))?;
        let bytes: Vec<u16> = node.elements().iter().map(|v| u16::from(v.value())).collect();
        let [_, group, high, low] = bytes[..] else {
            return Err(Error::UnmappedAddress(base));
        };
        let offset = if group == 2 { WAVE_GROUP_SIZE } else { 0 };
        Ok(offset + (high << 4) + low)
    }

    /// Display label of the selected wave, or its number when the field
    /// carries no labels.
    pub fn wave_label(&self, base: u32) -> Result<String> {
        let wave = self.wave_number(base)?;
        let node = self.composite(base, |k| matches!(k, NodeKind::WaveSelect))?;
        Ok(node
            .meta()
            .labels
            .as_ref()
            .and_then(|labels| labels.get(usize::from(wave)))
            .cloned()
            .unwrap_or_else(|| wave.to_string()))
    }

    pub fn set_wave_number(&mut self, base: u32, wave: u16) -> Result<(u32, u32)> {
        self.composite(base, |k| matches!(k, NodeKind::WaveSelect))?;
        let wave = wave.min(WAVE_COUNT - 1);
        let (group, number) = if wave >= WAVE_GROUP_SIZE {
            (2, wave - WAVE_GROUP_SIZE)
        } else {
            (1, wave)
        };
        let bytes = [0, group, (number >> 4) as u8, (number & 0x0f) as u8];
        self.write_bytes(base, &bytes);
        Ok((base, bytes.len() as u32))
    }

    /// Log every value at debug level.
    pub fn dump(&self) {
        for (depth, node) in self.root.nodes() {
            let indent = "  ".repeat(depth);
            if let Some(name) = &node.meta().name {
                tracing::debug!("{indent}{name}");
            }
            for value in node.elements() {
                tracing::debug!(
                    "{indent}{:8x} | {:2x} | {} ({:?})",
                    value.address(),
                    value.value(),
                    value.descriptor().name(),
                    value.descriptor().range()
                );
            }
        }
    }
}

impl std::fmt::Debug for ParameterInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterInstance")
            .field("base", &self.root.base())
            .field("end", &self.root.end())
            .finish()
    }
}

impl ParameterSchema {
    /// Fresh value tree with every parameter at its default.
    pub fn instantiate(&self) -> ParameterInstance {
        ParameterInstance::from_schema(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Charset;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn schema() -> ParameterSchema {
        ParameterSchema::build(|root| {
            root.group(0x100, "Tone 1", |tone| {
                tone.list_entry(Category::Tone).sync(SyncPolicy::PushOnly);
                tone.group(0, "Name", |page| {
                    page.page_entry();
                    page.text(0, "Tone name", 4, Charset::Ascii)
                })?;
                tone.group(0x10, "Osc", |page| {
                    page.page_entry();
                    page.param("Switch", 0..=1)?;
                    page.wave(1)?;
                    page.region(5, |r| {
                        r.param("Level", 0..=127)?;
                        Ok(())
                    })
                })
            })?;
            root.group(0x200, "Loose", |g| {
                g.param("Tempo", 0..=127)?;
                Ok(())
            })
        })
        .unwrap()
    }

    #[test]
    fn test_instance_mirrors_schema() {
        let schema = schema();
        let instance = schema.instantiate();
        assert_eq!(instance.root().end(), schema.root().end());
        assert_eq!(instance.value(0x100).unwrap(), 32);
        assert_eq!(instance.value(0x112).unwrap(), 1);

        let schema_tone = schema.root().children().next().unwrap();
        let instance_tone = instance.root().children().next().unwrap();
        assert!(Arc::ptr_eq(schema_tone.meta(), instance_tone.meta()));
    }

    #[test]
    fn test_write_bytes_reports_problems_and_continues() {
        let mut instance = schema().instantiate();
        let report = instance.write_bytes(0x114, &[9, 100, 7]);
        assert_eq!(report.changed, 2);
        assert_eq!(report.unmapped, vec![0x116]);
        assert!(!report.is_clean());
        assert_eq!(instance.value(0x115).unwrap(), 100);

        let report = instance.write_bytes(0x110, &[5]);
        assert_eq!(report.out_of_range, 1);
        assert_eq!(report.changed, 1);
        assert_eq!(instance.value(0x110).unwrap(), 5);
    }

    #[test]
    fn test_observer_fires_on_device_write() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut instance = schema().instantiate();
        let seen = Arc::clone(&calls);
        instance
            .observe(0x115, move |change| {
                assert_eq!(change.new, 64);
                seen.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        instance.write_bytes(0x115, &[64]);
        instance.write_bytes(0x115, &[64]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_navigation() {
        let instance = schema().instantiate();
        assert_eq!(instance.entry_name(0x113), "Tone 1");
        assert_eq!(instance.entry_name(0x200), "?");
        assert_eq!(instance.sync_override(0x111), Some(SyncPolicy::PushOnly));
        assert_eq!(instance.sync_override(0x200), None);

        let entries = instance.list_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, Category::Tone);

        let pages: Vec<_> = instance
            .pages(entries[0].1)
            .iter()
            .map(|p| p.meta().name.clone().unwrap())
            .collect();
        assert_eq!(pages, vec!["Name", "Osc"]);
    }

    #[test]
    fn test_text_round_trip() {
        let mut instance = schema().instantiate();
        assert_eq!(instance.node_text(0x100).unwrap(), "");
        assert_eq!(instance.set_node_text(0x100, "Bassline").unwrap(), (0x100, 4));
        assert_eq!(instance.node_text(0x100).unwrap(), "Bass");
        instance.set_node_text(0x100, "Hi").unwrap();
        assert_eq!(instance.value(0x103).unwrap(), b' ');
        assert!(instance.node_text(0x110).is_err());
    }

    #[test]
    fn test_wave_number_groups() {
        let mut instance = schema().instantiate();
        assert_eq!(instance.wave_number(0x111).unwrap(), 0);

        instance.set_wave_number(0x111, 0x35).unwrap();
        assert_eq!(instance.value(0x112).unwrap(), 1);
        assert_eq!(instance.value(0x113).unwrap(), 3);
        assert_eq!(instance.value(0x114).unwrap(), 5);
        assert_eq!(instance.wave_number(0x111).unwrap(), 0x35);

        instance.set_wave_number(0x111, 300).unwrap();
        assert_eq!(instance.value(0x112).unwrap(), 2);
        assert_eq!(instance.wave_number(0x111).unwrap(), 300);
    }

    #[test]
    fn test_wave_label_without_labels() {
        let mut instance = schema().instantiate();
        instance.set_wave_number(0x111, 17).unwrap();
        assert_eq!(instance.wave_label(0x111).unwrap(), "17");
        assert!(instance.wave_label(0x200).is_err());
    }

    #[test]
    fn test_policy_runs_follow_overrides() {
        let instance = schema().instantiate();
        let runs = instance.policy_runs(0x100, 0x101, SyncPolicy::BulkOnly);
        let spans: Vec<_> = runs.iter().map(|r| (r.start, r.bytes.len(), r.policy)).collect();
        assert_eq!(
            spans,
            vec![
                (0x100, 4, SyncPolicy::PushOnly),
                (0x110, 6, SyncPolicy::PushOnly),
                (0x200, 1, SyncPolicy::BulkOnly),
            ]
        );

        // Clipped to the window.
        let runs = instance.policy_runs(0x102, 0x10, SyncPolicy::RandomAccess);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].start, 0x102);
        assert_eq!(runs[0].bytes, vec![32, 32]);
        assert_eq!(runs[1].end(), 0x112);
    }

    #[test]
    fn test_snapshot_runs() {
        let mut instance = schema().instantiate();
        instance.set(0x200, 120).unwrap();
        let runs = instance.snapshot_runs(0x100, 0x101);
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0].0, 0x100);
        assert_eq!(runs[1], (0x110, vec![0, 0, 1, 0, 0, 0]));
        assert_eq!(runs[2], (0x200, vec![120]));
    }
}
