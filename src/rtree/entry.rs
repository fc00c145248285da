use serde::{Deserialize, Serialize};

/// A payload value paired with the geometry it is indexed under.
///
/// Equality is pairwise over `(value, geometry)`. Duplicate pairs are
/// permitted in a tree; each insertion is a distinct entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry<V, G> {
    value: V,
    geometry: G,
}

impl<V, G> Entry<V, G> {
    /// Creates a new entry.
    pub fn new(value: V, geometry: G) -> Self {
        Self { value, geometry }
    }

    /// The payload value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// The indexing geometry.
    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// Consumes the entry, returning its parts.
    pub fn into_parts(self) -> (V, G) {
        (self.value, self.geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    #[test]
    fn test_equality_is_pairwise() {
        let a = Entry::new(1, Point::new(0.0, 0.0));
        let b = Entry::new(1, Point::new(0.0, 0.0));
        let c = Entry::new(2, Point::new(0.0, 0.0));
        let d = Entry::new(1, Point::new(1.0, 0.0));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn test_serialization() {
        let entry = Entry::new(42, Point::new(1.0, 2.0));
        let json = serde_json::to_string(&entry).unwrap();
        let back: Entry<i32, Point> = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, back);
    }
}
