//! Sparse, hierarchical byte-addressed storage.
//!
//! An [`AddressSpace`] owns a contiguous run of elements starting at its base
//! address plus any number of child spaces ("submaps"), each covering a
//! disjoint byte range. Unused regions between submaps cost nothing, which is
//! what lets a device description span addresses like `0x0209_0000` without
//! allocating the gap.
//!
//! All addresses are absolute. Submaps are kept ordered by start address, so
//! depth-first traversal visits bytes in ascending address order.

use crate::error::{Error, Result};
use smallvec::{smallvec, SmallVec};
use std::ops::Range;

/// A child space together with the byte range it actually covers.
///
/// The range runs from the child's lowest declared byte to its end. A child
/// with no declared bytes has an empty range and never claims an address.
#[derive(Debug, Clone)]
pub struct Submap<T, M> {
    range: Range<u32>,
    space: AddressSpace<T, M>,
}

impl<T, M> Submap<T, M> {
    pub fn range(&self) -> Range<u32> {
        self.range.clone()
    }

    pub fn space(&self) -> &AddressSpace<T, M> {
        &self.space
    }
}

/// Sparse byte-addressed tree. `T` is the per-byte element, `M` per-node metadata.
#[derive(Debug, Clone)]
pub struct AddressSpace<T, M = ()> {
    base: u32,
    elements: Vec<T>,
    submaps: Vec<Submap<T, M>>,
    meta: M,
}

impl<T, M: Default> AddressSpace<T, M> {
    pub fn new(base: u32) -> Self {
        Self::with_meta(base, M::default())
    }
}

impl<T, M> AddressSpace<T, M> {
    pub fn with_meta(base: u32, meta: M) -> Self {
        Self {
            base,
            elements: Vec::new(),
            submaps: Vec::new(),
            meta,
        }
    }

    #[inline]
    pub fn base(&self) -> u32 {
        self.base
    }

    #[inline]
    pub fn meta(&self) -> &M {
        &self.meta
    }

    #[inline]
    pub fn meta_mut(&mut self) -> &mut M {
        &mut self.meta
    }

    #[inline]
    pub fn elements(&self) -> &[T] {
        &self.elements
    }

    #[inline]
    pub fn submaps(&self) -> &[Submap<T, M>] {
        &self.submaps
    }

    /// Iterate over direct children in address order.
    pub fn children(&self) -> impl Iterator<Item = &AddressSpace<T, M>> {
        self.submaps.iter().map(|s| &s.space)
    }

    #[inline]
    fn elements_end(&self) -> u32 {
        self.base + self.elements.len() as u32
    }

    /// One past the highest address covered by elements or submaps.
    pub fn end(&self) -> u32 {
        self.submaps
            .iter()
            .map(|s| s.range.end)
            .fold(self.elements_end(), u32::max)
    }

    pub fn length(&self) -> u32 {
        self.end() - self.base
    }

    /// Lowest address backed by an element anywhere in this tree.
    pub fn first_address(&self) -> Option<u32> {
        if !self.elements.is_empty() {
            return Some(self.base);
        }
        self.submaps
            .iter()
            .filter(|s| !s.range.is_empty())
            .map(|s| s.range.start)
            .min()
    }

    /// True when no byte anywhere in the tree is declared.
    pub fn is_empty(&self) -> bool {
        self.first_address().is_none()
    }

    /// Append an element directly after the last one. Returns its address.
    pub fn append_element(&mut self, element: T) -> Result<u32> {
        let address = self.elements_end();
        if let Some(other) = self.submaps.iter().find(|s| s.range.contains(&address)) {
            return Err(Error::Overlap {
                start: self.base,
                end: address + 1,
                other_start: other.range.start,
                other_end: other.range.end,
            });
        }
        self.elements.push(element);
        Ok(address)
    }

    /// Attach `child`, which must already be based at `base() + relative_offset`.
    pub fn append_submap(&mut self, relative_offset: u32, child: AddressSpace<T, M>) -> Result<()> {
        let expected = self.base + relative_offset;
        if child.base != expected {
            return Err(Error::MisplacedSubmap {
                expected,
                actual: child.base,
            });
        }

        let range = match child.first_address() {
            Some(first) => first..child.end(),
            None => expected..expected,
        };

        if !range.is_empty() {
            let own = self.base..self.elements_end();
            if overlaps(&range, &own) {
                return Err(Error::Overlap {
                    start: range.start,
                    end: range.end,
                    other_start: own.start,
                    other_end: own.end,
                });
            }
            if let Some(other) = self.submaps.iter().find(|s| overlaps(&range, &s.range)) {
                return Err(Error::Overlap {
                    start: range.start,
                    end: range.end,
                    other_start: other.range.start,
                    other_end: other.range.end,
                });
            }
        }

        let index = self
            .submaps
            .partition_point(|s| s.range.start <= range.start);
        self.submaps.insert(index, Submap { range, space: child });
        Ok(())
    }

    pub fn get(&self, address: u32) -> Result<&T> {
        self.locate(address).ok_or(Error::UnmappedAddress(address))
    }

    pub fn get_mut(&mut self, address: u32) -> Result<&mut T> {
        self.locate_mut(address)
            .ok_or(Error::UnmappedAddress(address))
    }

    /// Replace the element at `address`, returning the previous one.
    pub fn set(&mut self, address: u32, value: T) -> Result<T> {
        let slot = self.get_mut(address)?;
        Ok(std::mem::replace(slot, value))
    }

    fn locate(&self, address: u32) -> Option<&T> {
        if address >= self.base {
            let index = (address - self.base) as usize;
            if index < self.elements.len() {
                return self.elements.get(index);
            }
        }
        self.submaps
            .iter()
            .find(|s| s.range.contains(&address))
            .and_then(|s| s.space.locate(address))
    }

    fn locate_mut(&mut self, address: u32) -> Option<&mut T> {
        if address >= self.base {
            let index = (address - self.base) as usize;
            if index < self.elements.len() {
                return self.elements.get_mut(index);
            }
        }
        self.submaps
            .iter_mut()
            .find(|s| s.range.contains(&address))
            .and_then(|s| s.space.locate_mut(address))
    }

    /// Innermost node whose own elements contain `address`.
    pub fn node_at(&self, address: u32) -> Option<&AddressSpace<T, M>> {
        if address >= self.base && address < self.elements_end() {
            return Some(self);
        }
        self.submaps
            .iter()
            .find(|s| s.range.contains(&address))
            .and_then(|s| s.space.node_at(address))
    }

    /// Chain of nodes from `self` down to the node holding `address`.
    pub fn path_to(&self, address: u32) -> Option<Vec<&AddressSpace<T, M>>> {
        let mut path = vec![self];
        let mut node = self;
        loop {
            if address >= node.base && address < node.elements_end() {
                return Some(path);
            }
            node = node
                .submaps
                .iter()
                .find(|s| s.range.contains(&address))
                .map(|s| &s.space)?;
            path.push(node);
        }
    }

    /// Structure-preserving transform of elements; metadata is cloned.
    pub fn map<U, F>(&self, mut transform: F) -> AddressSpace<U, M>
    where
        F: FnMut(&T) -> U,
        M: Clone,
    {
        self.map_nodes(&mut transform, &mut |meta: &M| meta.clone())
    }

    /// Structure-preserving transform of both elements and node metadata.
    ///
    /// Bases and submap ranges are carried over untouched.
    pub fn map_nodes<U, N, F, G>(&self, element: &mut F, node: &mut G) -> AddressSpace<U, N>
    where
        F: FnMut(&T) -> U,
        G: FnMut(&M) -> N,
    {
        let elements = self.elements.iter().map(|e| element(e)).collect();
        let mut submaps = Vec::with_capacity(self.submaps.len());
        for submap in &self.submaps {
            submaps.push(Submap {
                range: submap.range.clone(),
                space: submap.space.map_nodes(&mut *element, &mut *node),
            });
        }
        AddressSpace {
            base: self.base,
            elements,
            submaps,
            meta: node(&self.meta),
        }
    }

    /// Depth-first `(address, elements)` pairs, elements before submaps.
    pub fn element_runs(&self) -> ElementRuns<'_, T, M> {
        ElementRuns { stack: vec![self] }
    }

    /// Maximal runs of declared, address-adjacent elements inside
    /// `start..start + length`, clipped to the window.
    pub fn contiguous_runs_in(&self, start: u32, length: u32) -> ContiguousRuns<'_, T, M> {
        let start = start as u64;
        ContiguousRuns {
            runs: self.element_runs(),
            start,
            end: start + length as u64,
            pending: None,
        }
    }

    /// Preorder walk over every node with its depth below `self`.
    pub fn nodes(&self) -> Nodes<'_, T, M> {
        Nodes {
            stack: vec![(0, self)],
        }
    }
}

#[inline]
fn overlaps(a: &Range<u32>, b: &Range<u32>) -> bool {
    a.start < b.end && b.start < a.end
}

/// Iterator returned by [`AddressSpace::element_runs`].
pub struct ElementRuns<'a, T, M> {
    stack: Vec<&'a AddressSpace<T, M>>,
}

impl<'a, T, M> Iterator for ElementRuns<'a, T, M> {
    type Item = (u32, &'a [T]);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            self.stack
                .extend(node.submaps.iter().rev().map(|s| &s.space));
            if !node.elements.is_empty() {
                return Some((node.base, node.elements.as_slice()));
            }
        }
        None
    }
}

/// A maximal span of adjacent elements, possibly stitched from several nodes.
#[derive(Debug, Clone)]
pub struct ContiguousRun<'a, T> {
    start: u32,
    segments: SmallVec<[&'a [T]; 4]>,
}

impl<'a, T> ContiguousRun<'a, T> {
    #[inline]
    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn len(&self) -> usize {
        self.segments.iter().map(|s| s.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn end(&self) -> u64 {
        self.start as u64 + self.len() as u64
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.segments.iter().copied().flatten()
    }
}

/// Iterator returned by [`AddressSpace::contiguous_runs_in`].
pub struct ContiguousRuns<'a, T, M> {
    runs: ElementRuns<'a, T, M>,
    start: u64,
    end: u64,
    pending: Option<ContiguousRun<'a, T>>,
}

impl<'a, T, M> Iterator for ContiguousRuns<'a, T, M> {
    type Item = ContiguousRun<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        for (offset, elements) in self.runs.by_ref() {
            let run_start = offset as u64;
            let run_end = run_start + elements.len() as u64;
            let lo = self.start.max(run_start);
            let hi = self.end.min(run_end);
            if lo >= hi {
                continue;
            }
            let clipped = &elements[(lo - run_start) as usize..(hi - run_start) as usize];

            let extends = self.pending.as_ref().is_some_and(|acc| acc.end() == lo);
            if extends {
                if let Some(acc) = self.pending.as_mut() {
                    acc.segments.push(clipped);
                }
                continue;
            }

            let fresh = ContiguousRun {
                start: lo as u32,
                segments: smallvec![clipped],
            };
            if let Some(done) = self.pending.replace(fresh) {
                return Some(done);
            }
        }
        self.pending.take()
    }
}

/// Iterator returned by [`AddressSpace::nodes`].
pub struct Nodes<'a, T, M> {
    stack: Vec<(usize, &'a AddressSpace<T, M>)>,
}

impl<'a, T, M> Iterator for Nodes<'a, T, M> {
    type Item = (usize, &'a AddressSpace<T, M>);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.submaps.iter().rev().map(|s| (depth + 1, &s.space)));
        Some((depth, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(base: u32, count: u8) -> AddressSpace<u8> {
        let mut space = AddressSpace::new(base);
        for value in 0..count {
            space.append_element(value).unwrap();
        }
        space
    }

    fn runs(space: &AddressSpace<u8>, start: u32, length: u32) -> Vec<(u32, usize)> {
        space
            .contiguous_runs_in(start, length)
            .map(|run| (run.start(), run.len()))
            .collect()
    }

    #[test]
    fn test_length_covers_elements_and_submaps() {
        let mut root = filled(0x100, 4);
        assert_eq!(root.end(), 0x104);
        assert_eq!(root.length(), 4);

        root.append_submap(0x20, filled(0x120, 8)).unwrap();
        assert_eq!(root.end(), 0x128);
        assert_eq!(root.length(), 0x28);
    }

    #[test]
    fn test_empty_space() {
        let space: AddressSpace<u8> = AddressSpace::new(0x40);
        assert!(space.is_empty());
        assert_eq!(space.length(), 0);
        assert_eq!(space.get(0x40), Err(Error::UnmappedAddress(0x40)));
    }

    #[test]
    fn test_submap_overlapping_elements_fails() {
        let mut root = filled(0, 10);
        let result = root.append_submap(5, filled(5, 2));
        assert!(matches!(result, Err(Error::Overlap { .. })));
    }

    #[test]
    fn test_overlapping_submaps_fail() {
        let mut root: AddressSpace<u8> = AddressSpace::new(0);
        root.append_submap(0x10, filled(0x10, 8)).unwrap();
        let result = root.append_submap(0x14, filled(0x14, 8));
        assert!(matches!(
            result,
            Err(Error::Overlap {
                other_start: 0x10,
                other_end: 0x18,
                ..
            })
        ));
    }

    #[test]
    fn test_growing_elements_into_submap_fails() {
        let mut root = filled(0, 2);
        root.append_submap(3, filled(3, 1)).unwrap();
        root.append_element(2).unwrap();
        assert!(matches!(root.append_element(3), Err(Error::Overlap { .. })));
    }

    #[test]
    fn test_misplaced_submap_fails() {
        let mut root: AddressSpace<u8> = AddressSpace::new(0x100);
        let result = root.append_submap(0x10, filled(0x10, 1));
        assert_eq!(
            result,
            Err(Error::MisplacedSubmap {
                expected: 0x110,
                actual: 0x10
            })
        );
    }

    #[test]
    fn test_submap_range_starts_at_first_declared_byte() {
        // Two groups sharing a base but declaring disjoint bytes are legal.
        let mut root: AddressSpace<u8> = AddressSpace::new(0);
        let first = filled(0, 9);
        let mut second: AddressSpace<u8> = AddressSpace::new(0);
        second.append_submap(0x0b, filled(0x0b, 5)).unwrap();
        root.append_submap(0, first).unwrap();
        root.append_submap(0, second).unwrap();

        assert_eq!(root.end(), 0x10);
        assert_eq!(*root.get(0x0c).unwrap(), 1);
        assert_eq!(root.get(0x09), Err(Error::UnmappedAddress(0x09)));
    }

    #[test]
    fn test_get_and_set_resolve_nested_addresses() {
        let mut inner: AddressSpace<u8> = AddressSpace::new(0x2000);
        inner.append_submap(0x10, filled(0x2010, 4)).unwrap();
        let mut root = filled(0, 2);
        root.append_submap(0x2000, inner).unwrap();

        assert_eq!(*root.get(1).unwrap(), 1);
        assert_eq!(*root.get(0x2012).unwrap(), 2);
        assert_eq!(root.set(0x2012, 99).unwrap(), 2);
        assert_eq!(*root.get(0x2012).unwrap(), 99);
        assert_eq!(root.get(0x2014), Err(Error::UnmappedAddress(0x2014)));
        assert_eq!(root.set(0x1000, 1), Err(Error::UnmappedAddress(0x1000)));
    }

    #[test]
    fn test_map_preserves_structure() {
        let mut root = filled(0, 3);
        root.append_submap(0x10, filled(0x10, 2)).unwrap();

        let doubled = root.map(|v| u16::from(*v) * 2);
        assert_eq!(doubled.length(), root.length());
        assert_eq!(doubled.submaps()[0].range(), 0x10..0x12);
        assert_eq!(*doubled.get(2).unwrap(), 4);
        assert_eq!(*doubled.get(0x11).unwrap(), 2);
    }

    #[test]
    fn test_map_nodes_transforms_metadata() {
        let mut root: AddressSpace<u8, &str> = AddressSpace::with_meta(0, "root");
        let mut child: AddressSpace<u8, &str> = AddressSpace::with_meta(4, "child");
        child.append_element(7).unwrap();
        root.append_submap(4, child).unwrap();

        let mapped = root.map_nodes(&mut |v: &u8| u32::from(*v), &mut |name: &&str| name.len());
        assert_eq!(*mapped.meta(), 4);
        assert_eq!(*mapped.submaps()[0].space().meta(), 5);
        assert_eq!(*mapped.get(4).unwrap(), 7);
    }

    #[test]
    fn test_element_runs_visit_in_address_order() {
        let mut root = filled(0, 2);
        // Declared out of order; traversal still ascends.
        root.append_submap(0x30, filled(0x30, 1)).unwrap();
        root.append_submap(0x10, filled(0x10, 3)).unwrap();

        let visited: Vec<(u32, usize)> = root.element_runs().map(|(a, e)| (a, e.len())).collect();
        assert_eq!(visited, vec![(0, 2), (0x10, 3), (0x30, 1)]);
    }

    #[test]
    fn test_contiguous_runs_skip_gaps() {
        let mut root: AddressSpace<u8> = AddressSpace::new(0);
        root.append_submap(0, filled(0, 10)).unwrap();
        root.append_submap(20, filled(20, 10)).unwrap();

        assert_eq!(runs(&root, 0, 30), vec![(0, 10), (20, 10)]);
        assert_eq!(runs(&root, 5, 10), vec![(5, 5)]);
        assert!(runs(&root, 10, 10).is_empty());
        assert_eq!(runs(&root, 25, 100), vec![(25, 5)]);
    }

    #[test]
    fn test_contiguous_runs_coalesce_adjacent_nodes() {
        let mut group: AddressSpace<u8> = AddressSpace::new(0x100);
        group.append_submap(0, filled(0x100, 4)).unwrap();
        group.append_submap(4, filled(0x104, 4)).unwrap();
        let mut root = filled(0xfc, 4);
        root.append_submap(4, group).unwrap();

        let all: Vec<_> = root.contiguous_runs_in(0, 0x200).collect();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].start(), 0xfc);
        assert_eq!(all[0].len(), 12);
        let values: Vec<u8> = all[0].iter().copied().collect();
        assert_eq!(values, vec![0, 1, 2, 3, 0, 1, 2, 3, 0, 1, 2, 3]);
    }

    #[test]
    fn test_nodes_preorder_with_depth() {
        let mut child = filled(0x10, 1);
        child.append_submap(1, filled(0x11, 1)).unwrap();
        let mut root = filled(0, 1);
        root.append_submap(0x10, child).unwrap();

        let depths: Vec<(usize, u32)> = root.nodes().map(|(d, n)| (d, n.base())).collect();
        assert_eq!(depths, vec![(0, 0), (1, 0x10), (2, 0x11)]);
    }

    #[test]
    fn test_path_to_address() {
        let mut child = filled(0x10, 1);
        child.append_submap(1, filled(0x11, 1)).unwrap();
        let mut root = filled(0, 1);
        root.append_submap(0x10, child).unwrap();

        let path: Vec<u32> = root.path_to(0x11).unwrap().iter().map(|n| n.base()).collect();
        assert_eq!(path, vec![0, 0x10, 0x11]);
        assert!(root.path_to(0x12).is_none());
        assert_eq!(root.node_at(0x10).map(|n| n.base()), Some(0x10));
    }
}
