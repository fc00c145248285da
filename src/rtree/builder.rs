//! Tree configuration and bulk loading.

use std::cmp::Ordering;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::errors::ConfigError;
use crate::geometry::{Geometry, Rectangle};

use super::context::Context;
use super::entry::Entry;
use super::node::Node;
use super::selector::{MinimalAreaIncrease, RStarSelector, Selector};
use super::splitter::{QuadraticSplitter, RStarSplitter, Splitter};
use super::tree::RTree;

const DEFAULT_MAX_CHILDREN: usize = 4;
const DEFAULT_LOADING_FACTOR: f64 = 0.7;
// Derived min fan-out when the caller leaves it unset
const DEFAULT_MIN_FILL: f64 = 0.4;

/// Configures and creates an [`RTree`].
///
/// ```rust
/// use rtree2d::{Point, RTree};
///
/// # fn main() -> Result<(), rtree2d::ConfigError> {
/// let tree = RTree::<u64, Point>::builder()
///     .max_children(16)
///     .rstar()
///     .create()?;
/// assert!(tree.is_empty());
/// # Ok(())
/// # }
/// ```
pub struct RTreeBuilder<V, G> {
    min_children: Option<usize>,
    max_children: Option<usize>,
    loading_factor: f64,
    selector: Arc<dyn Selector>,
    splitter: Arc<dyn Splitter>,
    _tree: PhantomData<fn() -> (V, G)>,
}

impl<V, G> Default for RTreeBuilder<V, G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, G> RTreeBuilder<V, G> {
    pub fn new() -> Self {
        Self {
            min_children: None,
            max_children: None,
            loading_factor: DEFAULT_LOADING_FACTOR,
            selector: Arc::new(MinimalAreaIncrease),
            splitter: Arc::new(QuadraticSplitter),
            _tree: PhantomData,
        }
    }

    /// Minimum children per non-root node. Defaults to
    /// `round(max_children * 0.4)`, floored at 1.
    pub fn min_children(mut self, min_children: usize) -> Self {
        self.min_children = Some(min_children);
        self
    }

    /// Maximum children per node. Defaults to 4.
    pub fn max_children(mut self, max_children: usize) -> Self {
        self.max_children = Some(max_children);
        self
    }

    /// Node fill factor for bulk loading. Defaults to 0.7.
    pub fn loading_factor(mut self, loading_factor: f64) -> Self {
        self.loading_factor = loading_factor;
        self
    }

    /// Uses a custom branch selection strategy.
    pub fn selector(mut self, selector: impl Selector + 'static) -> Self {
        self.selector = Arc::new(selector);
        self
    }

    /// Uses a custom overflow split strategy.
    pub fn splitter(mut self, splitter: impl Splitter + 'static) -> Self {
        self.splitter = Arc::new(splitter);
        self
    }

    /// The R*-tree preset: [`RStarSelector`] and [`RStarSplitter`].
    pub fn rstar(mut self) -> Self {
        self.selector = Arc::new(RStarSelector::default());
        self.splitter = Arc::new(RStarSplitter);
        self
    }

    fn build_context(&self) -> Result<Context, ConfigError> {
        let max = self.max_children.unwrap_or(DEFAULT_MAX_CHILDREN);
        if max < 2 {
            return Err(ConfigError::MaxChildrenTooSmall(max));
        }
        let min = match self.min_children {
            Some(min) => min,
            None => (((max as f64) * DEFAULT_MIN_FILL).round() as usize).max(1),
        };
        if min == 0 {
            return Err(ConfigError::ZeroMinChildren);
        }
        if min > max {
            return Err(ConfigError::MinExceedsMax { min, max });
        }
        if 2 * min > max + 1 {
            return Err(ConfigError::Unsplittable { min, max });
        }
        if !(self.loading_factor > 0.0 && self.loading_factor <= 1.0) {
            return Err(ConfigError::InvalidLoadingFactor(self.loading_factor));
        }

        Ok(Context::new(
            min,
            max,
            self.loading_factor,
            self.selector.clone(),
            self.splitter.clone(),
        ))
    }
}

impl<V, G> RTreeBuilder<V, G>
where
    V: Clone,
    G: Geometry + Clone,
{
    /// Finalizes the configuration into an empty tree.
    pub fn create(self) -> Result<RTree<V, G>, ConfigError> {
        let context = Arc::new(self.build_context()?);
        Ok(RTree::new(context))
    }

    /// Finalizes the configuration and packs `entries` directly into a
    /// balanced tree (Sort-Tile-Recursive).
    ///
    /// Entries are sorted by X center and cut into vertical slices, each
    /// slice is sorted by Y center and cut into runs of the node
    /// capacity, and each run becomes one node; the resulting node list
    /// is packed the same way, level by level, until a single root
    /// remains. O(n log n) and much lower MBR overlap than inserting one
    /// entry at a time.
    pub fn create_packed(self, entries: Vec<Entry<V, G>>) -> Result<RTree<V, G>, ConfigError> {
        let context = Arc::new(self.build_context()?);
        if entries.is_empty() {
            return Ok(RTree::new(context));
        }

        let size = entries.len();
        // A capacity below 2 cannot make packing progress
        let capacity = (((context.max_children() as f64) * context.loading_factor()).round()
            as usize)
            .max(2);
        log::debug!("bulk loading {} entries, node capacity {}", size, capacity);

        let mut level: Vec<Arc<Node<V, G>>> =
            pack_level(entries, capacity, |entry| entry.geometry().mbr())
                .into_iter()
                .map(|run| Arc::new(Node::leaf(run)))
                .collect();

        while level.len() > 1 {
            level = pack_level(level, capacity, |node| node.mbr().clone())
                .into_iter()
                .map(|run| Arc::new(Node::sub_tree(run)))
                .collect();
        }
        let root = level
            .into_iter()
            .next()
            .expect("packing produced no root");

        Ok(RTree::with_root(Some(root), size, context))
    }
}

/// One STR packing pass: slices `items` into runs of at most `capacity`
/// members, sorted by X center across slices and by Y center within them.
fn pack_level<T, F>(mut items: Vec<T>, capacity: usize, mbr_of: F) -> Vec<Vec<T>>
where
    T: Clone,
    F: Fn(&T) -> Rectangle,
{
    let node_count = items.len().div_ceil(capacity);
    let nodes_per_slice = (node_count as f64).sqrt().ceil() as usize;
    let slice_capacity = nodes_per_slice * capacity;

    items.sort_by(|a, b| {
        mbr_of(a)
            .mid_x()
            .partial_cmp(&mbr_of(b).mid_x())
            .unwrap_or(Ordering::Equal)
    });

    let mut runs = Vec::with_capacity(node_count);
    for slice in items.chunks(slice_capacity) {
        let mut slice = slice.to_vec();
        slice.sort_by(|a, b| {
            mbr_of(a)
                .mid_y()
                .partial_cmp(&mbr_of(b).mid_y())
                .unwrap_or(Ordering::Equal)
        });
        for run in slice.chunks(capacity) {
            runs.push(run.to_vec());
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    #[test]
    fn test_defaults() {
        let tree: RTree<i32, Point> = RTreeBuilder::new().create().unwrap();
        assert_eq!(tree.context().max_children(), 4);
        assert_eq!(tree.context().min_children(), 2); // round(4 * 0.4)
        assert_eq!(tree.context().loading_factor(), 0.7);
    }

    #[test]
    fn test_rstar_preset_derives_min_children() {
        let tree: RTree<i32, Point> = RTreeBuilder::new()
            .max_children(10)
            .rstar()
            .create()
            .unwrap();
        assert_eq!(tree.context().min_children(), 4); // round(10 * 0.4)
    }

    #[test]
    fn test_explicit_min_children_wins() {
        let tree: RTree<i32, Point> = RTreeBuilder::new()
            .min_children(3)
            .max_children(8)
            .create()
            .unwrap();
        assert_eq!(tree.context().min_children(), 3);
    }

    #[test]
    fn test_rejects_zero_min_children() {
        let result: Result<RTree<i32, Point>, _> =
            RTreeBuilder::new().min_children(0).create();
        assert_eq!(result.unwrap_err(), ConfigError::ZeroMinChildren);
    }

    #[test]
    fn test_rejects_min_over_max() {
        let result: Result<RTree<i32, Point>, _> = RTreeBuilder::new()
            .min_children(5)
            .max_children(4)
            .create();
        assert_eq!(
            result.unwrap_err(),
            ConfigError::MinExceedsMax { min: 5, max: 4 }
        );
    }

    #[test]
    fn test_rejects_unsplittable_config() {
        let result: Result<RTree<i32, Point>, _> = RTreeBuilder::new()
            .min_children(3)
            .max_children(4)
            .create();
        assert_eq!(
            result.unwrap_err(),
            ConfigError::Unsplittable { min: 3, max: 4 }
        );
    }

    #[test]
    fn test_rejects_bad_loading_factor() {
        let result: Result<RTree<i32, Point>, _> =
            RTreeBuilder::new().loading_factor(0.0).create();
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidLoadingFactor(_)
        ));

        let result: Result<RTree<i32, Point>, _> =
            RTreeBuilder::new().loading_factor(1.5).create();
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidLoadingFactor(_)
        ));
    }

    #[test]
    fn test_create_packed_empty() {
        let tree: RTree<i32, Point> = RTreeBuilder::new().create_packed(Vec::new()).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.size(), 0);
    }

    #[test]
    fn test_create_packed_single_leaf() {
        let entries = vec![
            Entry::new(1, Point::new(0.0, 0.0)),
            Entry::new(2, Point::new(1.0, 1.0)),
        ];
        let tree: RTree<i32, Point> = RTreeBuilder::new().create_packed(entries).unwrap();
        assert_eq!(tree.size(), 2);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn test_create_packed_builds_balanced_tree() {
        let entries: Vec<Entry<i32, Point>> = (0..100)
            .map(|i| Entry::new(i, Point::new((i % 10) as f64, (i / 10) as f64)))
            .collect();

        let tree: RTree<i32, Point> = RTreeBuilder::new().create_packed(entries).unwrap();
        assert_eq!(tree.size(), 100);
        assert_eq!(tree.entries().len(), 100);
        // capacity 3 -> 34 leaves -> 12 -> 4 -> 2 -> 1
        assert_eq!(tree.depth(), 5);
    }
}
