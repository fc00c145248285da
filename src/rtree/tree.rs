//! The core R-Tree.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::geometry::{Geometry, Rectangle};

use super::builder::RTreeBuilder;
use super::context::Context;
use super::entry::Entry;
use super::node::{AddOutcome, Node, Removal};
use super::visitor::Visitor;

/// A persistent in-memory R-Tree over 2D geometries.
///
/// Values of this type behave like immutable values: every mutating
/// operation returns a *new* tree and leaves the receiver untouched.
/// Unchanged subtrees are shared between snapshots, so a mutation costs
/// one root-to-leaf path, not a deep copy. Any number of threads may
/// query the same snapshot concurrently without synchronization; callers
/// that want a single shared "current" tree must serialize writers
/// themselves.
///
/// # Examples
///
/// ```rust
/// use rtree2d::{Point, Rectangle, RTree};
///
/// # fn main() -> Result<(), rtree2d::ConfigError> {
/// let tree = RTree::<i32, Point>::builder()
///     .min_children(4)
///     .max_children(8)
///     .create()?;
///
/// let tree = tree.add(1, Point::new(1.0, 2.0)).add(2, Point::new(5.0, 5.0));
///
/// let hits = tree.search(&Rectangle::new(0.0, 0.0, 2.0, 3.0));
/// assert_eq!(hits.len(), 1);
/// assert_eq!(*hits[0].value(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RTree<V, G> {
    root: Option<Arc<Node<V, G>>>,
    size: usize,
    context: Arc<Context>,
}

impl<V, G> RTree<V, G>
where
    V: Clone,
    G: Geometry + Clone,
{
    /// Starts configuring a new tree.
    pub fn builder() -> RTreeBuilder<V, G> {
        RTreeBuilder::new()
    }

    pub(crate) fn new(context: Arc<Context>) -> Self {
        Self {
            root: None,
            size: 0,
            context,
        }
    }

    pub(crate) fn with_root(
        root: Option<Arc<Node<V, G>>>,
        size: usize,
        context: Arc<Context>,
    ) -> Self {
        Self {
            root,
            size,
            context,
        }
    }

    /// The tree configuration.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Number of entries in the tree.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of levels, 0 for an empty tree. All branches have equal
    /// depth by construction.
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.depth())
    }

    /// Returns a new tree with `(value, geometry)` added.
    pub fn add(&self, value: V, geometry: G) -> Self {
        self.add_entry(Entry::new(value, geometry))
    }

    /// Returns a new tree with `entry` added.
    pub fn add_entry(&self, entry: Entry<V, G>) -> Self {
        let root = match &self.root {
            None => Arc::new(Node::leaf(vec![entry])),
            Some(root) => match root.add(entry, &self.context) {
                AddOutcome::One(node) => node,
                AddOutcome::Split(first, second) => {
                    log::debug!("root split, tree depth now {}", first.depth() + 1);
                    Arc::new(Node::sub_tree(vec![first, second]))
                }
            },
        };
        Self {
            root: Some(root),
            size: self.size + 1,
            context: self.context.clone(),
        }
    }

    /// Returns a new tree with every entry of `entries` added, folding
    /// left to right.
    pub fn add_all<I>(&self, entries: I) -> Self
    where
        I: IntoIterator<Item = Entry<V, G>>,
    {
        entries
            .into_iter()
            .fold(self.clone(), |tree, entry| tree.add_entry(entry))
    }

    /// Returns a new tree with one occurrence of `(value, geometry)`
    /// removed, or the same tree value if no such entry exists.
    pub fn remove(&self, value: &V, geometry: &G) -> Self
    where
        V: PartialEq,
        G: PartialEq,
    {
        self.remove_entry(&Entry::new(value.clone(), geometry.clone()), false)
    }

    /// Returns a new tree with `entry` removed: one occurrence, or every
    /// occurrence when `all` is set. Removing an absent entry is a no-op.
    pub fn remove_entry(&self, entry: &Entry<V, G>, all: bool) -> Self
    where
        V: PartialEq,
        G: PartialEq,
    {
        match self.remove_detailed(entry, all) {
            Some((tree, _, _)) => tree,
            None => self.clone(),
        }
    }

    /// Removes each of `entries` in turn.
    pub fn remove_entries(&self, entries: &[Entry<V, G>], all: bool) -> Self
    where
        V: PartialEq,
        G: PartialEq,
    {
        entries
            .iter()
            .fold(self.clone(), |tree, entry| tree.remove_entry(entry, all))
    }

    /// Removal with bookkeeping for the indexed wrappers: the new tree,
    /// the number of matching entries removed, and the orphans that were
    /// re-inserted during condensation. `None` when the entry is absent.
    pub(crate) fn remove_detailed(
        &self,
        entry: &Entry<V, G>,
        all: bool,
    ) -> Option<(Self, usize, Vec<Entry<V, G>>)>
    where
        V: PartialEq,
        G: PartialEq,
    {
        let root = self.root.as_ref()?;
        let Removal {
            node,
            orphans,
            removed,
        } = root.delete(entry, all, &self.context)?;

        // Orphans were physically removed along with the matches; each
        // re-insertion below adds its one back
        let size = self.size - removed - orphans.len();
        let mut tree = Self {
            root: node,
            size,
            context: self.context.clone(),
        };
        if !orphans.is_empty() {
            log::debug!(
                "condensation: re-inserting {} orphaned entries",
                orphans.len()
            );
        }
        for orphan in &orphans {
            tree = tree.add_entry(orphan.clone());
        }
        Some((tree, removed, orphans))
    }

    /// All entries intersecting `query`, decided by each stored
    /// geometry's own `intersects` test against the query's MBR.
    pub fn search<Q>(&self, query: &Q) -> Vec<Entry<V, G>>
    where
        Q: Geometry,
    {
        let query_mbr = query.mbr();
        self.search_by(move |geometry| geometry.intersects(&query_mbr))
    }

    /// All entries whose geometry satisfies `predicate`.
    ///
    /// The predicate also prunes: a subtree is only descended when its
    /// MBR passes. Iterative depth-first descent with a stack allocated
    /// fresh per call, so deep trees cannot overflow the call stack and
    /// concurrent searches never share state.
    pub fn search_by<P>(&self, predicate: P) -> Vec<Entry<V, G>>
    where
        P: Fn(&dyn Geometry) -> bool,
    {
        let mut found = Vec::new();
        let Some(root) = &self.root else {
            return found;
        };

        let mut stack: Vec<&Node<V, G>> = vec![root.as_ref()];
        while let Some(node) = stack.pop() {
            match node {
                Node::Leaf { mbr, entries } => {
                    if !predicate(mbr) {
                        continue;
                    }
                    for entry in entries {
                        if predicate(entry.geometry()) {
                            found.push(entry.clone());
                        }
                    }
                }
                Node::SubTree { mbr, children } => {
                    if !predicate(mbr) {
                        continue;
                    }
                    for child in children {
                        if predicate(child.mbr()) {
                            stack.push(child.as_ref());
                        }
                    }
                }
            }
        }
        found
    }

    /// All entries whose MBR lies entirely inside `query`.
    ///
    /// Internal nodes are still pruned by intersection: a contained entry
    /// can live under a child that only partially intersects the query.
    pub fn search_contained(&self, query: &Rectangle) -> Vec<Entry<V, G>> {
        let mut found = Vec::new();
        let Some(root) = &self.root else {
            return found;
        };

        let mut stack: Vec<&Node<V, G>> = vec![root.as_ref()];
        while let Some(node) = stack.pop() {
            match node {
                Node::Leaf { mbr, entries } => {
                    if !query.intersects(mbr) {
                        continue;
                    }
                    for entry in entries {
                        if query.contains_rectangle(&entry.geometry().mbr()) {
                            found.push(entry.clone());
                        }
                    }
                }
                Node::SubTree { children, .. } => {
                    for child in children {
                        if query.intersects(child.mbr()) {
                            stack.push(child.as_ref());
                        }
                    }
                }
            }
        }
        found
    }

    /// Every entry in the tree.
    pub fn entries(&self) -> Vec<Entry<V, G>> {
        self.search_by(|_| true)
    }

    /// The `k` entries nearest to `(x, y)` by geometry distance, nearest
    /// first, optionally capped at `max_distance`.
    ///
    /// Branch-and-bound descent: children are visited in order of MBR
    /// distance and branches farther than the current k-th best are
    /// pruned, which is sound because `Geometry::distance` is monotonic
    /// over enclosing rectangles.
    pub fn nearest(
        &self,
        x: f64,
        y: f64,
        k: usize,
        max_distance: Option<f64>,
    ) -> Vec<(Entry<V, G>, f64)> {
        if k == 0 {
            return Vec::new();
        }
        let Some(root) = &self.root else {
            return Vec::new();
        };

        let query = Rectangle::point(x, y);
        let mut results: Vec<(Entry<V, G>, f64)> = Vec::new();
        let mut bound = max_distance.unwrap_or(f64::INFINITY);
        Self::nearest_descend(root.as_ref(), &query, k, &mut results, &mut bound);

        results.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        results.truncate(k);
        results
    }

    fn nearest_descend(
        node: &Node<V, G>,
        query: &Rectangle,
        k: usize,
        results: &mut Vec<(Entry<V, G>, f64)>,
        bound: &mut f64,
    ) {
        match node {
            Node::Leaf { entries, .. } => {
                for entry in entries {
                    let distance = entry.geometry().distance(query);
                    if distance > *bound {
                        continue;
                    }
                    results.push((entry.clone(), distance));
                    if results.len() > k {
                        results.sort_by(|a, b| {
                            a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal)
                        });
                        results.truncate(k);
                        // The k-th distance becomes the new pruning bound
                        if let Some((_, kth)) = results.last() {
                            *bound = *kth;
                        }
                    }
                }
            }
            Node::SubTree { children, .. } => {
                let mut candidates: Vec<(&Arc<Node<V, G>>, f64)> = children
                    .iter()
                    .map(|child| (child, child.mbr().distance(query)))
                    .collect();
                // Nearest child first for the tightest bound early
                candidates.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

                for (child, distance) in candidates {
                    if distance > *bound {
                        continue;
                    }
                    Self::nearest_descend(child.as_ref(), query, k, results, bound);
                }
            }
        }
    }

    /// Pre-order traversal calling `visitor` for every node and entry.
    pub fn walk(&self, visitor: &mut dyn Visitor<V, G>) {
        if let Some(root) = &self.root {
            root.walk(visitor, 0);
        }
    }
}
