use std::hash::Hash;

use serde::{Deserialize, Serialize};

use super::{Geometry, Line, Point, Rectangle};

/// A circle geometry defined by a center point and a radius.
///
/// Its MBR is the bounding square of `center ± radius`; all rectangle tests
/// reduce to comparing the clamped center distance against the radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Eq for Circle {}

impl Hash for Circle {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.center.hash(state);
        self.radius.to_bits().hash(state);
    }
}

impl std::fmt::Display for Circle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CIRCLE({} {}, {})",
            self.center.x, self.center.y, self.radius
        )
    }
}

impl Circle {
    /// Creates a new circle centered at `(x, y)` with the given radius.
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self {
            center: Point::new(x, y),
            radius,
        }
    }

    /// Checks if this circle intersects another circle.
    ///
    /// Compares squared center distance against the squared radius sum to
    /// avoid the square root.
    pub fn intersects_circle(&self, other: &Circle) -> bool {
        let dx = self.center.x - other.center.x;
        let dy = self.center.y - other.center.y;
        let radius_sum = self.radius + other.radius;
        dx * dx + dy * dy <= radius_sum * radius_sum
    }

    /// Checks if a point lies on or inside this circle.
    pub fn intersects_point(&self, point: &Point) -> bool {
        self.center.distance_to(point) <= self.radius
    }

    /// Checks if a line segment touches or crosses this circle.
    pub fn intersects_line(&self, line: &Line) -> bool {
        line.intersects_circle(self)
    }
}

impl Geometry for Circle {
    fn mbr(&self) -> Rectangle {
        Rectangle::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.center.x + self.radius,
            self.center.y + self.radius,
        )
    }

    fn distance(&self, rect: &Rectangle) -> f64 {
        (rect.point_distance(self.center.x, self.center.y) - self.radius).max(0.0)
    }

    fn intersects(&self, rect: &Rectangle) -> bool {
        rect.point_distance(self.center.x, self.center.y) <= self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mbr() {
        let circle = Circle::new(5.0, 5.0, 2.0);
        assert_eq!(circle.mbr(), Rectangle::new(3.0, 3.0, 7.0, 7.0));
    }

    #[test]
    fn test_intersects_rectangle() {
        let circle = Circle::new(0.0, 0.0, 1.0);

        assert!(circle.intersects(&Rectangle::new(0.5, -0.5, 2.0, 0.5)));
        assert!(circle.intersects(&Rectangle::new(1.0, 0.0, 2.0, 1.0))); // Touching
        // The corner of this rectangle is sqrt(2)/2 outside the radius
        assert!(!circle.intersects(&Rectangle::new(0.9, 0.9, 2.0, 2.0)));
        assert!(!circle.intersects(&Rectangle::new(5.0, 5.0, 6.0, 6.0)));
    }

    #[test]
    fn test_intersects_circle() {
        let circle = Circle::new(0.0, 0.0, 1.0);

        assert!(circle.intersects_circle(&Circle::new(1.5, 0.0, 1.0)));
        assert!(circle.intersects_circle(&Circle::new(2.0, 0.0, 1.0))); // Touching
        assert!(!circle.intersects_circle(&Circle::new(2.1, 0.0, 1.0)));
    }

    #[test]
    fn test_intersects_point() {
        let circle = Circle::new(0.0, 0.0, 5.0);

        assert!(circle.intersects_point(&Point::new(3.0, 4.0))); // On the rim
        assert!(circle.intersects_point(&Point::new(1.0, 1.0)));
        assert!(!circle.intersects_point(&Point::new(4.0, 4.0)));
    }

    #[test]
    fn test_intersects_line() {
        let circle = Circle::new(0.0, 0.0, 1.0);

        // Passes through the circle
        assert!(circle.intersects_line(&Line::new(-2.0, 0.5, 2.0, 0.5)));
        // Entirely outside, closest approach above the radius
        assert!(!circle.intersects_line(&Line::new(-2.0, 2.0, 2.0, 2.0)));
        // Segment ends before reaching the circle
        assert!(!circle.intersects_line(&Line::new(3.0, 0.0, 5.0, 0.0)));
    }

    #[test]
    fn test_distance() {
        let circle = Circle::new(0.0, 0.0, 1.0);
        let rect = Rectangle::new(4.0, 0.0, 5.0, 1.0);
        assert_eq!(circle.distance(&rect), 3.0);

        let overlapping = Rectangle::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(circle.distance(&overlapping), 0.0);
    }
}
