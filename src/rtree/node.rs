//! The tree node model.
//!
//! A node is either a `Leaf` holding entries or a `SubTree` holding child
//! nodes. Both cache their MBR, computed once at construction, so a
//! reachable node's geometry is never stale. Mutation never happens in
//! place: `add` and `delete` build replacement nodes and share untouched
//! children through `Arc`.

use std::sync::Arc;

use crate::geometry::{Geometry, Rectangle};

use super::context::Context;
use super::entry::Entry;
use super::visitor::Visitor;

#[derive(Debug, Clone)]
pub(crate) enum Node<V, G> {
    Leaf {
        mbr: Rectangle,
        entries: Vec<Entry<V, G>>,
    },
    SubTree {
        mbr: Rectangle,
        children: Vec<Arc<Node<V, G>>>,
    },
}

/// Result of adding an entry into a node: either a single replacement
/// node, or the two nodes produced by an overflow split.
pub(crate) enum AddOutcome<V, G> {
    One(Arc<Node<V, G>>),
    Split(Arc<Node<V, G>>, Arc<Node<V, G>>),
}

/// Transient record propagated up the call stack of one delete.
///
/// `node` is the rebuilt replacement, or `None` when this node dissolved.
/// `orphans` are entries rescued from dissolved leaves, pending
/// re-insertion from the root. `removed` counts matching entries deleted.
pub(crate) struct Removal<V, G> {
    pub(crate) node: Option<Arc<Node<V, G>>>,
    pub(crate) orphans: Vec<Entry<V, G>>,
    pub(crate) removed: usize,
}

fn merged_mbr<I>(mut rects: I) -> Rectangle
where
    I: Iterator<Item = Rectangle>,
{
    let first = rects.next().expect("node constructed with no contents");
    rects.fold(first, |acc, rect| acc.merge(&rect))
}

impl<V, G> Node<V, G>
where
    V: Clone,
    G: Geometry + Clone,
{
    pub(crate) fn leaf(entries: Vec<Entry<V, G>>) -> Self {
        let mbr = merged_mbr(entries.iter().map(|entry| entry.geometry().mbr()));
        Node::Leaf { mbr, entries }
    }

    pub(crate) fn sub_tree(children: Vec<Arc<Node<V, G>>>) -> Self {
        let mbr = merged_mbr(children.iter().map(|child| child.mbr().clone()));
        Node::SubTree { mbr, children }
    }

    pub(crate) fn mbr(&self) -> &Rectangle {
        match self {
            Node::Leaf { mbr, .. } => mbr,
            Node::SubTree { mbr, .. } => mbr,
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Number of levels below and including this node; a leaf is 1. All
    /// branches have equal depth by construction, so walking the first
    /// child suffices.
    pub(crate) fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::SubTree { children, .. } => 1 + children[0].depth(),
        }
    }

    pub(crate) fn add(&self, entry: Entry<V, G>, context: &Context) -> AddOutcome<V, G> {
        match self {
            Node::Leaf { entries, .. } => {
                let mut next = entries.clone();
                next.push(entry);
                if next.len() <= context.max_children() {
                    AddOutcome::One(Arc::new(Node::leaf(next)))
                } else {
                    let rects: Vec<Rectangle> =
                        next.iter().map(|e| e.geometry().mbr()).collect();
                    let (left, right) =
                        context.splitter().split(&rects, context.min_children());
                    let first = left.iter().map(|&i| next[i].clone()).collect();
                    let second = right.iter().map(|&i| next[i].clone()).collect();
                    AddOutcome::Split(
                        Arc::new(Node::leaf(first)),
                        Arc::new(Node::leaf(second)),
                    )
                }
            }
            Node::SubTree { children, .. } => {
                let target = entry.geometry().mbr();
                let rects: Vec<Rectangle> =
                    children.iter().map(|child| child.mbr().clone()).collect();
                let leaf_level = children[0].is_leaf();
                let chosen = context.selector().select(&target, &rects, leaf_level);

                let mut next = children.clone();
                match next[chosen].add(entry, context) {
                    AddOutcome::One(node) => next[chosen] = node,
                    AddOutcome::Split(first, second) => {
                        next[chosen] = first;
                        next.push(second);
                    }
                }

                if next.len() <= context.max_children() {
                    AddOutcome::One(Arc::new(Node::sub_tree(next)))
                } else {
                    let rects: Vec<Rectangle> =
                        next.iter().map(|child| child.mbr().clone()).collect();
                    let (left, right) =
                        context.splitter().split(&rects, context.min_children());
                    let first = left.iter().map(|&i| next[i].clone()).collect();
                    let second = right.iter().map(|&i| next[i].clone()).collect();
                    AddOutcome::Split(
                        Arc::new(Node::sub_tree(first)),
                        Arc::new(Node::sub_tree(second)),
                    )
                }
            }
        }
    }

    /// Removes `entry` below this node. Returns `None` when the entry is
    /// not present (the no-op signal); otherwise the rebuilt node together
    /// with the orphaned entries and the count of removed occurrences.
    pub(crate) fn delete(
        &self,
        entry: &Entry<V, G>,
        all: bool,
        context: &Context,
    ) -> Option<Removal<V, G>>
    where
        V: PartialEq,
        G: PartialEq,
    {
        match self {
            Node::Leaf { entries, .. } => {
                let limit = if all { usize::MAX } else { 1 };
                let mut removed = 0;
                let mut remaining = Vec::with_capacity(entries.len());
                for e in entries {
                    if removed < limit && e == entry {
                        removed += 1;
                        continue;
                    }
                    remaining.push(e.clone());
                }
                if removed == 0 {
                    return None;
                }

                if remaining.len() >= context.min_children() {
                    Some(Removal {
                        node: Some(Arc::new(Node::leaf(remaining))),
                        orphans: Vec::new(),
                        removed,
                    })
                } else {
                    // Dissolve the leaf; survivors become orphans to be
                    // re-inserted from the root
                    Some(Removal {
                        node: None,
                        orphans: remaining,
                        removed,
                    })
                }
            }
            Node::SubTree { children, .. } => {
                let mut next: Vec<Arc<Node<V, G>>> = Vec::with_capacity(children.len());
                let mut orphans = Vec::new();
                let mut removed = 0;
                let mut found = false;

                for child in children {
                    let skip = (found && !all) || !entry.geometry().intersects(child.mbr());
                    if skip {
                        next.push(child.clone());
                        continue;
                    }
                    match child.delete(entry, all, context) {
                        None => next.push(child.clone()),
                        Some(removal) => {
                            found = true;
                            removed += removal.removed;
                            orphans.extend(removal.orphans);
                            if let Some(node) = removal.node {
                                next.push(node);
                            }
                        }
                    }
                }

                if !found {
                    return None;
                }
                if next.is_empty() {
                    Some(Removal {
                        node: None,
                        orphans,
                        removed,
                    })
                } else {
                    Some(Removal {
                        node: Some(Arc::new(Node::sub_tree(next))),
                        orphans,
                        removed,
                    })
                }
            }
        }
    }

    /// Pre-order traversal over nodes and entries.
    pub(crate) fn walk(&self, visitor: &mut dyn Visitor<V, G>, depth: usize) {
        match self {
            Node::Leaf { mbr, entries } => {
                visitor.visit_leaf(mbr, entries.len(), depth);
                for entry in entries {
                    visitor.visit_entry(entry, depth + 1);
                }
            }
            Node::SubTree { mbr, children } => {
                visitor.visit_sub_tree(mbr, children.len(), depth);
                for child in children {
                    child.walk(visitor, depth + 1);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::rtree::selector::MinimalAreaIncrease;
    use crate::rtree::splitter::QuadraticSplitter;

    fn context(min: usize, max: usize) -> Context {
        Context::new(
            min,
            max,
            0.7,
            Arc::new(MinimalAreaIncrease),
            Arc::new(QuadraticSplitter),
        )
    }

    fn entry(value: i32, x: f64, y: f64) -> Entry<i32, Point> {
        Entry::new(value, Point::new(x, y))
    }

    #[test]
    fn test_leaf_mbr_covers_entries() {
        let leaf = Node::leaf(vec![entry(1, 0.0, 0.0), entry(2, 4.0, 6.0)]);
        assert_eq!(leaf.mbr(), &Rectangle::new(0.0, 0.0, 4.0, 6.0));
        assert!(leaf.is_leaf());
        assert_eq!(leaf.depth(), 1);
    }

    #[test]
    fn test_add_without_overflow() {
        let ctx = context(1, 3);
        let leaf = Node::leaf(vec![entry(1, 0.0, 0.0)]);

        match leaf.add(entry(2, 1.0, 1.0), &ctx) {
            AddOutcome::One(node) => {
                assert!(node.is_leaf());
                assert_eq!(node.mbr(), &Rectangle::new(0.0, 0.0, 1.0, 1.0));
            }
            AddOutcome::Split(..) => panic!("unexpected split"),
        }
    }

    fn square(value: i32, offset: f64) -> Entry<i32, Rectangle> {
        Entry::new(value, Rectangle::new(offset, 0.0, offset + 1.0, 1.0))
    }

    #[test]
    fn test_add_overflow_splits() {
        let ctx = context(1, 3);
        let leaf = Node::leaf(vec![square(1, 0.0), square(2, 1.0), square(3, 10.0)]);

        match leaf.add(square(4, 11.0), &ctx) {
            AddOutcome::Split(first, second) => {
                let mut widths = [first.mbr().width(), second.mbr().width()];
                widths.sort_by(f64::total_cmp);
                // The near pair and the far pair each form a tight group
                assert_eq!(widths, [2.0, 2.0]);
            }
            AddOutcome::One(_) => panic!("expected split"),
        }
    }

    #[test]
    fn test_delete_missing_is_none() {
        let ctx = context(1, 3);
        let leaf = Node::leaf(vec![entry(1, 0.0, 0.0)]);
        assert!(leaf.delete(&entry(9, 0.0, 0.0), false, &ctx).is_none());
    }

    #[test]
    fn test_delete_one_of_duplicates() {
        let ctx = context(1, 4);
        let leaf = Node::leaf(vec![
            entry(1, 0.0, 0.0),
            entry(1, 0.0, 0.0),
            entry(2, 1.0, 1.0),
        ]);

        let removal = leaf.delete(&entry(1, 0.0, 0.0), false, &ctx).unwrap();
        assert_eq!(removal.removed, 1);
        assert!(removal.orphans.is_empty());
        let node = removal.node.unwrap();
        match node.as_ref() {
            Node::Leaf { entries, .. } => assert_eq!(entries.len(), 2),
            Node::SubTree { .. } => panic!("expected leaf"),
        }
    }

    #[test]
    fn test_delete_all_duplicates() {
        let ctx = context(1, 4);
        let leaf = Node::leaf(vec![
            entry(1, 0.0, 0.0),
            entry(1, 0.0, 0.0),
            entry(2, 1.0, 1.0),
        ]);

        let removal = leaf.delete(&entry(1, 0.0, 0.0), true, &ctx).unwrap();
        assert_eq!(removal.removed, 2);
        let node = removal.node.unwrap();
        match node.as_ref() {
            Node::Leaf { entries, .. } => assert_eq!(entries.len(), 1),
            Node::SubTree { .. } => panic!("expected leaf"),
        }
    }

    #[test]
    fn test_delete_underflow_dissolves_leaf() {
        let ctx = context(2, 4);
        let leaf = Node::leaf(vec![entry(1, 0.0, 0.0), entry(2, 1.0, 1.0)]);

        let removal = leaf.delete(&entry(1, 0.0, 0.0), false, &ctx).unwrap();
        assert_eq!(removal.removed, 1);
        assert!(removal.node.is_none());
        assert_eq!(removal.orphans, vec![entry(2, 1.0, 1.0)]);
    }
}
