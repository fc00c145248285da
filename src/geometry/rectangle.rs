use std::hash::Hash;

use serde::{Deserialize, Serialize};

use super::Geometry;

/// A 2D rectangle represented by minimum and maximum coordinates.
///
/// `Rectangle` defines a rectangular area in 2D space using the minimum
/// (min_x, min_y) and maximum (max_x, max_y) corners. It doubles as the
/// minimum bounding rectangle (MBR) of every other shape and of every tree
/// node, so all pruning decisions in the index reduce to rectangle math.
///
/// The constructor does not validate that `min <= max`; callers that accept
/// untrusted coordinates can check with [`Rectangle::is_valid`].
///
/// # Examples
///
/// ```rust
/// use rtree2d::Rectangle;
///
/// // Create a rectangle for a region from (0,0) to (100,100)
/// let rect = Rectangle::new(0.0, 0.0, 100.0, 100.0);
///
/// // Check if a point is within the rectangle
/// assert!(rect.contains(50.0, 50.0));
/// ```
#[derive(Clone, PartialEq, Default, Debug, Deserialize, Serialize)]
pub struct Rectangle {
    /// Minimum X coordinate
    pub min_x: f64,
    /// Minimum Y coordinate
    pub min_y: f64,
    /// Maximum X coordinate
    pub max_x: f64,
    /// Maximum Y coordinate
    pub max_y: f64,
}

impl Eq for Rectangle {}

impl PartialOrd for Rectangle {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rectangle {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.min_x
            .total_cmp(&other.min_x)
            .then(self.min_y.total_cmp(&other.min_y))
            .then(self.max_x.total_cmp(&other.max_x))
            .then(self.max_y.total_cmp(&other.max_y))
    }
}

impl Hash for Rectangle {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.min_x.to_bits().hash(state);
        self.min_y.to_bits().hash(state);
        self.max_x.to_bits().hash(state);
        self.max_y.to_bits().hash(state);
    }
}

impl std::fmt::Display for Rectangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rectangle({}, {}, {}, {})",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

impl Rectangle {
    /// Creates a new rectangle with the specified coordinates.
    ///
    /// Coordinates are taken as-is; `min <= max` is a caller responsibility.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Rectangle {
        Rectangle {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates a degenerate rectangle covering a single point.
    pub fn point(x: f64, y: f64) -> Rectangle {
        Rectangle::new(x, y, x, y)
    }

    /// Returns the width of the rectangle.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Returns the height of the rectangle.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Returns the area of the rectangle.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Returns the perimeter (margin) of the rectangle.
    pub fn perimeter(&self) -> f64 {
        2.0 * (self.width() + self.height())
    }

    /// Returns the X coordinate of the rectangle's center.
    pub fn mid_x(&self) -> f64 {
        (self.min_x + self.max_x) / 2.0
    }

    /// Returns the Y coordinate of the rectangle's center.
    pub fn mid_y(&self) -> f64 {
        (self.min_y + self.max_y) / 2.0
    }

    /// Checks if this rectangle contains a point.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Checks if this rectangle fully contains another rectangle.
    pub fn contains_rectangle(&self, other: &Rectangle) -> bool {
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    /// Checks if this rectangle intersects another rectangle.
    ///
    /// Touching edges count as intersection.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// Returns the smallest rectangle enclosing both this rectangle and
    /// another.
    pub fn merge(&self, other: &Rectangle) -> Rectangle {
        Rectangle::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Returns the area of overlap with another rectangle, or 0 if they do
    /// not intersect.
    pub fn intersection_area(&self, other: &Rectangle) -> f64 {
        if !self.intersects(other) {
            return 0.0;
        }
        let width = self.max_x.min(other.max_x) - self.min_x.max(other.min_x);
        let height = self.max_y.min(other.max_y) - self.min_y.max(other.min_y);
        width * height
    }

    /// Calculates the minimum distance from a point to this rectangle.
    /// If the point is inside the rectangle, the distance is 0.
    pub fn point_distance(&self, x: f64, y: f64) -> f64 {
        // Clamp the point to the rectangle, then measure the gap
        let closest_x = x.clamp(self.min_x, self.max_x);
        let closest_y = y.clamp(self.min_y, self.max_y);

        let dx = x - closest_x;
        let dy = y - closest_y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Checks if this rectangle is a point (zero extent).
    pub fn is_point(&self) -> bool {
        self.min_x == self.max_x && self.min_y == self.max_y
    }

    /// Checks if this rectangle is valid (min <= max).
    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }
}

impl Geometry for Rectangle {
    fn mbr(&self) -> Rectangle {
        self.clone()
    }

    fn distance(&self, rect: &Rectangle) -> f64 {
        let dx = (rect.min_x - self.max_x).max(self.min_x - rect.max_x).max(0.0);
        let dy = (rect.min_y - self.max_y).max(self.min_y - rect.max_y).max(0.0);
        (dx * dx + dy * dy).sqrt()
    }

    fn intersects(&self, rect: &Rectangle) -> bool {
        Rectangle::intersects(self, rect)
    }
}
