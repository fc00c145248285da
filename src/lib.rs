//! # rtree2d - A Persistent In-Memory 2D R-Tree
//!
//! This crate provides an R-Tree family spatial index that stores
//! arbitrary payload values keyed by 2D geometric shapes and answers
//! "what is stored near/inside this region" queries efficiently.
//!
//! ## Features
//!
//! - **Value Semantics**: `add`/`remove` return a new tree; snapshots are
//!   never mutated and share unchanged subtrees
//! - **Exact Geometry**: points, rectangles, circles, and line segments
//!   with precise intersection and distance math
//! - **Pluggable Heuristics**: Guttman quadratic and R*-style node splits,
//!   minimal-area-increase and minimal-overlap branch selection
//! - **Bulk Loading**: O(n log n) Sort-Tile-Recursive packing
//! - **Indexed Variants**: secondary value → entry lookup tables
//! - **Visitor API**: pre-order traversal for external tooling
//!
//! ## Quick Start
//!
//! ```rust
//! use rtree2d::{Point, Rectangle, RTree};
//!
//! # fn main() -> Result<(), rtree2d::ConfigError> {
//! let tree = RTree::<&str, Point>::builder()
//!     .min_children(2)
//!     .max_children(4)
//!     .create()?;
//!
//! let tree = tree
//!     .add("library", Point::new(2.0, 3.0))
//!     .add("cafe", Point::new(5.0, 1.0))
//!     .add("museum", Point::new(9.0, 9.0));
//!
//! let downtown = Rectangle::new(0.0, 0.0, 6.0, 4.0);
//! let mut names: Vec<&str> = tree
//!     .search(&downtown)
//!     .iter()
//!     .map(|entry| *entry.value())
//!     .collect();
//! names.sort_unstable();
//! assert_eq!(names, vec!["cafe", "library"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Bulk Loading
//!
//! ```rust
//! use rtree2d::{Entry, Point, RTree};
//!
//! # fn main() -> Result<(), rtree2d::ConfigError> {
//! let entries: Vec<Entry<u32, Point>> = (0..1000)
//!     .map(|i| Entry::new(i, Point::new((i % 50) as f64, (i / 50) as f64)))
//!     .collect();
//!
//! let tree = RTree::builder().rstar().create_packed(entries)?;
//! assert_eq!(tree.size(), 1000);
//! # Ok(())
//! # }
//! ```
//!
//! Trees are pure values: snapshots may be queried from any number of
//! threads without synchronization, and writers derive new snapshots
//! instead of mutating shared state. Coordinates must be finite; NaN or
//! infinite inputs are a caller precondition violation.

pub mod errors;
pub mod geometry;
pub mod rtree;

// Re-export geometry types
pub use geometry::{Circle, Geometry, Line, Point, Rectangle};

// Re-export tree types
pub use rtree::{
    Context, Entry, IndexedRTree, MultiIndexedRTree, RTree, RTreeBuilder, Visitor,
};

// Re-export strategies
pub use rtree::{
    MinimalAreaIncrease, MinimalOverlapArea, QuadraticSplitter, RStarSelector, RStarSplitter,
    Selector, Splitter,
};

// Re-export error types
pub use errors::ConfigError;
