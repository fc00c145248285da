//! Error types for tree construction.

use thiserror::Error;

/// Errors reported when finalizing an [`RTreeBuilder`](crate::RTreeBuilder).
///
/// These are caller configuration errors; a malformed configuration is
/// rejected here rather than allowed to produce a tree that would break
/// its own structural invariants later.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("min_children must be at least 1")]
    ZeroMinChildren,

    #[error("max_children must be at least 2, got {0}")]
    MaxChildrenTooSmall(usize),

    #[error("min_children ({min}) cannot exceed max_children ({max})")]
    MinExceedsMax { min: usize, max: usize },

    #[error("min_children ({min}) is too large: an overflowing node of {max} + 1 items could not be split into two groups of at least min_children")]
    Unsplittable { min: usize, max: usize },

    #[error("loading_factor must be within (0, 1], got {0}")]
    InvalidLoadingFactor(f64),
}
