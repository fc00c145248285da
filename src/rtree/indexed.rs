//! Tree variants carrying a secondary value lookup table.
//!
//! Both wrappers keep the tree's value semantics: the lookup table is an
//! `im::HashMap`, so cloning a snapshot is O(1) and mutation shares
//! structure with the previous snapshot, exactly like the tree itself.

use std::hash::Hash;

use im::HashMap;

use crate::geometry::{Geometry, Rectangle};

use super::entry::Entry;
use super::tree::RTree;
use super::visitor::Visitor;

/// An [`RTree`] plus a value → entry lookup table.
///
/// The table keeps *one* entry per value: adding a duplicate value
/// overwrites its slot (last write wins), and removing a value's entry
/// drops the slot unconditionally, even when other entries with the same
/// value are still in the tree. With duplicate values the table is
/// therefore an approximation pointing at most at one surviving copy;
/// with unique values `index().len() == size()` holds at all times.
#[derive(Debug, Clone)]
pub struct IndexedRTree<V, G>
where
    V: Clone + Eq + Hash,
{
    tree: RTree<V, G>,
    index: HashMap<V, Entry<V, G>>,
}

impl<V, G> IndexedRTree<V, G>
where
    V: Clone + Eq + Hash,
    G: Geometry + Clone,
{
    /// Wraps a tree, building the lookup table from its entries.
    pub fn new(tree: RTree<V, G>) -> Self {
        let mut index = HashMap::new();
        for entry in tree.entries() {
            index.insert(entry.value().clone(), entry);
        }
        Self { tree, index }
    }

    /// The wrapped tree.
    pub fn tree(&self) -> &RTree<V, G> {
        &self.tree
    }

    /// The value lookup table (read-only).
    pub fn index(&self) -> &HashMap<V, Entry<V, G>> {
        &self.index
    }

    pub fn size(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.tree.depth()
    }

    /// Returns a new indexed tree with `(value, geometry)` added.
    pub fn add(&self, value: V, geometry: G) -> Self {
        self.add_entry(Entry::new(value, geometry))
    }

    /// Returns a new indexed tree with `entry` added; a duplicate value
    /// overwrites its index slot.
    pub fn add_entry(&self, entry: Entry<V, G>) -> Self {
        Self {
            tree: self.tree.add_entry(entry.clone()),
            index: self.index.update(entry.value().clone(), entry),
        }
    }

    /// Returns a new indexed tree with every entry of `entries` added.
    pub fn add_all<I>(&self, entries: I) -> Self
    where
        I: IntoIterator<Item = Entry<V, G>>,
    {
        entries
            .into_iter()
            .fold(self.clone(), |indexed, entry| indexed.add_entry(entry))
    }

    /// Returns a new indexed tree with one occurrence of
    /// `(value, geometry)` removed.
    pub fn remove(&self, value: &V, geometry: &G) -> Self
    where
        G: PartialEq,
    {
        self.remove_entry(&Entry::new(value.clone(), geometry.clone()), false)
    }

    /// Returns a new indexed tree with `entry` removed from the tree and
    /// its value dropped from the lookup table.
    pub fn remove_entry(&self, entry: &Entry<V, G>, all: bool) -> Self
    where
        G: PartialEq,
    {
        match self.tree.remove_detailed(entry, all) {
            None => self.clone(),
            Some((tree, _, _)) => Self {
                tree,
                index: self.index.without(entry.value()),
            },
        }
    }

    /// Removes each of `entries` in turn.
    pub fn remove_entries(&self, entries: &[Entry<V, G>], all: bool) -> Self
    where
        G: PartialEq,
    {
        entries.iter().fold(self.clone(), |indexed, entry| {
            indexed.remove_entry(entry, all)
        })
    }

    pub fn search<Q: Geometry>(&self, query: &Q) -> Vec<Entry<V, G>> {
        self.tree.search(query)
    }

    pub fn search_by<P>(&self, predicate: P) -> Vec<Entry<V, G>>
    where
        P: Fn(&dyn Geometry) -> bool,
    {
        self.tree.search_by(predicate)
    }

    pub fn search_contained(&self, query: &Rectangle) -> Vec<Entry<V, G>> {
        self.tree.search_contained(query)
    }

    pub fn entries(&self) -> Vec<Entry<V, G>> {
        self.tree.entries()
    }

    pub fn nearest(
        &self,
        x: f64,
        y: f64,
        k: usize,
        max_distance: Option<f64>,
    ) -> Vec<(Entry<V, G>, f64)> {
        self.tree.nearest(x, y, k, max_distance)
    }

    pub fn walk(&self, visitor: &mut dyn Visitor<V, G>) {
        self.tree.walk(visitor)
    }
}

/// An [`RTree`] plus a value → entries lookup table.
///
/// Unlike [`IndexedRTree`], every entry of a value is tracked: adding
/// appends to the value's list in insertion order. Removing drops the
/// value's whole list and rebuilds it from the entries that survived the
/// removal's condensation pass, so
/// `index().values().map(Vec::len).sum() == size()` holds whenever each
/// value's entries share a leaf fate.
#[derive(Debug, Clone)]
pub struct MultiIndexedRTree<V, G>
where
    V: Clone + Eq + Hash,
{
    tree: RTree<V, G>,
    index: HashMap<V, Vec<Entry<V, G>>>,
}

impl<V, G> MultiIndexedRTree<V, G>
where
    V: Clone + Eq + Hash,
    G: Geometry + Clone,
{
    /// Wraps a tree, building the lookup table from its entries.
    pub fn new(tree: RTree<V, G>) -> Self {
        let mut index: HashMap<V, Vec<Entry<V, G>>> = HashMap::new();
        for entry in tree.entries() {
            let mut list = index.get(entry.value()).cloned().unwrap_or_default();
            let value = entry.value().clone();
            list.push(entry);
            index.insert(value, list);
        }
        Self { tree, index }
    }

    /// The wrapped tree.
    pub fn tree(&self) -> &RTree<V, G> {
        &self.tree
    }

    /// The value lookup table (read-only).
    pub fn index(&self) -> &HashMap<V, Vec<Entry<V, G>>> {
        &self.index
    }

    pub fn size(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.tree.depth()
    }

    /// Returns a new indexed tree with `(value, geometry)` added.
    pub fn add(&self, value: V, geometry: G) -> Self {
        self.add_entry(Entry::new(value, geometry))
    }

    /// Returns a new indexed tree with `entry` appended to its value's
    /// list.
    pub fn add_entry(&self, entry: Entry<V, G>) -> Self {
        let mut list = self.index.get(entry.value()).cloned().unwrap_or_default();
        let value = entry.value().clone();
        list.push(entry.clone());
        Self {
            tree: self.tree.add_entry(entry),
            index: self.index.update(value, list),
        }
    }

    /// Returns a new indexed tree with every entry of `entries` added.
    pub fn add_all<I>(&self, entries: I) -> Self
    where
        I: IntoIterator<Item = Entry<V, G>>,
    {
        entries
            .into_iter()
            .fold(self.clone(), |indexed, entry| indexed.add_entry(entry))
    }

    /// Returns a new indexed tree with one occurrence of
    /// `(value, geometry)` removed.
    pub fn remove(&self, value: &V, geometry: &G) -> Self
    where
        G: PartialEq,
    {
        self.remove_entry(&Entry::new(value.clone(), geometry.clone()), false)
    }

    /// Returns a new indexed tree with `entry` removed.
    ///
    /// The value's list is dropped wholesale; survivors re-inserted by
    /// the condensation pass rebuild a partial list for the value.
    pub fn remove_entry(&self, entry: &Entry<V, G>, all: bool) -> Self
    where
        G: PartialEq,
    {
        match self.tree.remove_detailed(entry, all) {
            None => self.clone(),
            Some((tree, _, orphans)) => {
                let mut index = self.index.without(entry.value());
                let survivors: Vec<Entry<V, G>> = orphans
                    .into_iter()
                    .filter(|orphan| orphan.value() == entry.value())
                    .collect();
                if !survivors.is_empty() {
                    index.insert(entry.value().clone(), survivors);
                }
                Self { tree, index }
            }
        }
    }

    /// Removes each of `entries` in turn.
    pub fn remove_entries(&self, entries: &[Entry<V, G>], all: bool) -> Self
    where
        G: PartialEq,
    {
        entries.iter().fold(self.clone(), |indexed, entry| {
            indexed.remove_entry(entry, all)
        })
    }

    pub fn search<Q: Geometry>(&self, query: &Q) -> Vec<Entry<V, G>> {
        self.tree.search(query)
    }

    pub fn search_by<P>(&self, predicate: P) -> Vec<Entry<V, G>>
    where
        P: Fn(&dyn Geometry) -> bool,
    {
        self.tree.search_by(predicate)
    }

    pub fn search_contained(&self, query: &Rectangle) -> Vec<Entry<V, G>> {
        self.tree.search_contained(query)
    }

    pub fn entries(&self) -> Vec<Entry<V, G>> {
        self.tree.entries()
    }

    pub fn nearest(
        &self,
        x: f64,
        y: f64,
        k: usize,
        max_distance: Option<f64>,
    ) -> Vec<(Entry<V, G>, f64)> {
        self.tree.nearest(x, y, k, max_distance)
    }

    pub fn walk(&self, visitor: &mut dyn Visitor<V, G>) {
        self.tree.walk(visitor)
    }
}
