use std::hash::Hash;

use serde::{Deserialize, Serialize};

use super::{Circle, Geometry, Point, Rectangle};

// Cohen-Sutherland out-codes
const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const BOTTOM: u8 = 4;
const TOP: u8 = 8;

/// A line segment geometry between two endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

impl Eq for Line {}

impl Hash for Line {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.end.hash(state);
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LINE({} {}, {} {})",
            self.start.x, self.start.y, self.end.x, self.end.y
        )
    }
}

/// Signed area of the triangle (a, b, c); the sign gives the turn direction.
fn orientation(a: &Point, b: &Point, c: &Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Whether `p`, already known collinear with segment (a, b), lies on it.
fn on_segment(a: &Point, b: &Point, p: &Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

fn out_code(rect: &Rectangle, x: f64, y: f64) -> u8 {
    let mut code = INSIDE;
    if x < rect.min_x {
        code |= LEFT;
    } else if x > rect.max_x {
        code |= RIGHT;
    }
    if y < rect.min_y {
        code |= BOTTOM;
    } else if y > rect.max_y {
        code |= TOP;
    }
    code
}

impl Line {
    /// Creates a new line segment from `(x1, y1)` to `(x2, y2)`.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            start: Point::new(x1, y1),
            end: Point::new(x2, y2),
        }
    }

    /// Checks if this segment touches or crosses another segment.
    ///
    /// Uses the orientation test on both endpoint pairs, with a collinear
    /// overlap fallback.
    pub fn intersects_line(&self, other: &Line) -> bool {
        let d1 = orientation(&other.start, &other.end, &self.start);
        let d2 = orientation(&other.start, &other.end, &self.end);
        let d3 = orientation(&self.start, &self.end, &other.start);
        let d4 = orientation(&self.start, &self.end, &other.end);

        if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
            && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
        {
            return true;
        }

        (d1 == 0.0 && on_segment(&other.start, &other.end, &self.start))
            || (d2 == 0.0 && on_segment(&other.start, &other.end, &self.end))
            || (d3 == 0.0 && on_segment(&self.start, &self.end, &other.start))
            || (d4 == 0.0 && on_segment(&self.start, &self.end, &other.end))
    }

    /// Checks if this segment touches or crosses a circle.
    ///
    /// Projects the circle's center onto the segment (clamped to the
    /// endpoints) and compares that distance against the radius.
    pub fn intersects_circle(&self, circle: &Circle) -> bool {
        self.point_distance(&circle.center) <= circle.radius
    }

    /// Calculates the minimum distance from a point to this segment.
    pub fn point_distance(&self, point: &Point) -> f64 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let length_squared = dx * dx + dy * dy;
        if length_squared == 0.0 {
            return self.start.distance_to(point);
        }

        let t = (((point.x - self.start.x) * dx + (point.y - self.start.y) * dy)
            / length_squared)
            .clamp(0.0, 1.0);
        let proj_x = self.start.x + t * dx;
        let proj_y = self.start.y + t * dy;

        let gap_x = point.x - proj_x;
        let gap_y = point.y - proj_y;
        (gap_x * gap_x + gap_y * gap_y).sqrt()
    }

    /// Calculates the minimum distance between this segment and another,
    /// 0 if they intersect.
    pub fn segment_distance(&self, other: &Line) -> f64 {
        if self.intersects_line(other) {
            return 0.0;
        }
        self.point_distance(&other.start)
            .min(self.point_distance(&other.end))
            .min(other.point_distance(&self.start))
            .min(other.point_distance(&self.end))
    }

    /// Cohen-Sutherland clip test: does any part of the segment lie inside
    /// the rectangle?
    fn clips_rectangle(&self, rect: &Rectangle) -> bool {
        let mut x1 = self.start.x;
        let mut y1 = self.start.y;
        let mut x2 = self.end.x;
        let mut y2 = self.end.y;
        let mut code1 = out_code(rect, x1, y1);
        let mut code2 = out_code(rect, x2, y2);

        loop {
            if code1 | code2 == 0 {
                // Both endpoints inside
                return true;
            }
            if code1 & code2 != 0 {
                // Both endpoints share an outside zone
                return false;
            }

            // Clip the endpoint that is outside against the violated edge.
            // The zone bit guarantees the divisor is non-zero for finite
            // coordinates.
            let code = if code1 != 0 { code1 } else { code2 };
            let x;
            let y;
            if code & TOP != 0 {
                x = x1 + (x2 - x1) * (rect.max_y - y1) / (y2 - y1);
                y = rect.max_y;
            } else if code & BOTTOM != 0 {
                x = x1 + (x2 - x1) * (rect.min_y - y1) / (y2 - y1);
                y = rect.min_y;
            } else if code & RIGHT != 0 {
                y = y1 + (y2 - y1) * (rect.max_x - x1) / (x2 - x1);
                x = rect.max_x;
            } else {
                y = y1 + (y2 - y1) * (rect.min_x - x1) / (x2 - x1);
                x = rect.min_x;
            }

            if code == code1 {
                x1 = x;
                y1 = y;
                code1 = out_code(rect, x1, y1);
            } else {
                x2 = x;
                y2 = y;
                code2 = out_code(rect, x2, y2);
            }
        }
    }
}

impl Geometry for Line {
    fn mbr(&self) -> Rectangle {
        Rectangle::new(
            self.start.x.min(self.end.x),
            self.start.y.min(self.end.y),
            self.start.x.max(self.end.x),
            self.start.y.max(self.end.y),
        )
    }

    fn distance(&self, rect: &Rectangle) -> f64 {
        if rect.contains(self.start.x, self.start.y) || rect.contains(self.end.x, self.end.y) {
            return 0.0;
        }
        let edges = [
            Line::new(rect.min_x, rect.min_y, rect.max_x, rect.min_y),
            Line::new(rect.max_x, rect.min_y, rect.max_x, rect.max_y),
            Line::new(rect.max_x, rect.max_y, rect.min_x, rect.max_y),
            Line::new(rect.min_x, rect.max_y, rect.min_x, rect.min_y),
        ];
        edges
            .iter()
            .map(|edge| self.segment_distance(edge))
            .fold(f64::INFINITY, f64::min)
    }

    fn intersects(&self, rect: &Rectangle) -> bool {
        self.clips_rectangle(rect)
    }
}
