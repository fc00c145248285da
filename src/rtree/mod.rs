//! The R-Tree core: node model, strategies, builder, and tree variants.

pub mod builder;
pub mod context;
pub mod entry;
pub mod indexed;
mod node;
pub mod selector;
pub mod splitter;
pub mod tree;
pub mod visitor;

pub use builder::RTreeBuilder;
pub use context::Context;
pub use entry::Entry;
pub use indexed::{IndexedRTree, MultiIndexedRTree};
pub use selector::{MinimalAreaIncrease, MinimalOverlapArea, RStarSelector, Selector};
pub use splitter::{QuadraticSplitter, RStarSplitter, Splitter};
pub use tree::RTree;
pub use visitor::Visitor;
