use std::fmt;
use std::sync::Arc;

use super::selector::Selector;
use super::splitter::Splitter;

/// Immutable tree configuration.
///
/// A `Context` is created once, at builder finalization, and shared by
/// reference (`Arc`) across every node operation of one tree lineage. It
/// carries the fan-out bounds, the bulk-load fill factor, and the active
/// selection/split strategies.
pub struct Context {
    min_children: usize,
    max_children: usize,
    loading_factor: f64,
    selector: Arc<dyn Selector>,
    splitter: Arc<dyn Splitter>,
}

impl Context {
    pub(crate) fn new(
        min_children: usize,
        max_children: usize,
        loading_factor: f64,
        selector: Arc<dyn Selector>,
        splitter: Arc<dyn Splitter>,
    ) -> Self {
        Self {
            min_children,
            max_children,
            loading_factor,
            selector,
            splitter,
        }
    }

    /// The minimum number of children/entries a non-root node may hold.
    pub fn min_children(&self) -> usize {
        self.min_children
    }

    /// The maximum number of children/entries any node may hold.
    pub fn max_children(&self) -> usize {
        self.max_children
    }

    /// The node fill factor used by the bulk loader.
    pub fn loading_factor(&self) -> f64 {
        self.loading_factor
    }

    pub(crate) fn selector(&self) -> &dyn Selector {
        self.selector.as_ref()
    }

    pub(crate) fn splitter(&self) -> &dyn Splitter {
        self.splitter.as_ref()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("min_children", &self.min_children)
            .field("max_children", &self.max_children)
            .field("loading_factor", &self.loading_factor)
            .finish()
    }
}
