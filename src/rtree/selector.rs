//! Branch selection strategies.
//!
//! When an insert descends through a `SubTree`, a [`Selector`] decides
//! which child receives the new entry. The choice drives how much sibling
//! MBRs end up overlapping, which in turn decides how many branches a
//! query has to visit.

use crate::geometry::Rectangle;

/// Chooses which candidate child receives an entry with the given target
/// MBR.
///
/// `candidates` holds the MBRs of every child of the node being descended;
/// it is never empty. `leaf_level` is true when the candidates are leaves.
/// Returns the index of the chosen candidate.
pub trait Selector: Send + Sync {
    fn select(&self, target: &Rectangle, candidates: &[Rectangle], leaf_level: bool) -> usize;
}

/// Chooses the candidate whose MBR grows least when merged with the
/// target; ties go to the smaller resulting area.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimalAreaIncrease;

impl Selector for MinimalAreaIncrease {
    fn select(&self, target: &Rectangle, candidates: &[Rectangle], _leaf_level: bool) -> usize {
        assert!(
            !candidates.is_empty(),
            "selector invoked with no candidate nodes"
        );

        let mut best = 0;
        let mut best_increase = f64::INFINITY;
        let mut best_area = f64::INFINITY;

        for (i, candidate) in candidates.iter().enumerate() {
            let merged = candidate.merge(target);
            let increase = merged.area() - candidate.area();
            let area = merged.area();

            if increase < best_increase || (increase == best_increase && area < best_area) {
                best = i;
                best_increase = increase;
                best_area = area;
            }
        }

        best
    }
}

/// Chooses the candidate whose enlarged MBR overlaps its siblings least.
///
/// Overlap is the sum of intersection areas between the enlarged MBR and
/// every sibling MBR. Ties fall back to minimal area increase, then to
/// minimal resulting area. O(n^2) in the candidate count, which is why the
/// composite [`RStarSelector`] only applies it at the leaf level.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimalOverlapArea;

impl Selector for MinimalOverlapArea {
    fn select(&self, target: &Rectangle, candidates: &[Rectangle], _leaf_level: bool) -> usize {
        assert!(
            !candidates.is_empty(),
            "selector invoked with no candidate nodes"
        );

        let mut best = 0;
        let mut best_overlap = f64::INFINITY;
        let mut best_increase = f64::INFINITY;
        let mut best_area = f64::INFINITY;

        for (i, candidate) in candidates.iter().enumerate() {
            let merged = candidate.merge(target);
            let overlap: f64 = candidates
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, sibling)| merged.intersection_area(sibling))
                .sum();
            let increase = merged.area() - candidate.area();
            let area = merged.area();

            let better = overlap < best_overlap
                || (overlap == best_overlap && increase < best_increase)
                || (overlap == best_overlap && increase == best_increase && area < best_area);
            if better {
                best = i;
                best_overlap = overlap;
                best_increase = increase;
                best_area = area;
            }
        }

        best
    }
}

/// The R*-tree composite choice: minimal overlap among leaves, where
/// placement quality matters most, minimal area increase at internal
/// levels, where the quadratic overlap scan would be wasted work.
#[derive(Debug, Clone, Copy, Default)]
pub struct RStarSelector {
    overlap: MinimalOverlapArea,
    area: MinimalAreaIncrease,
}

impl Selector for RStarSelector {
    fn select(&self, target: &Rectangle, candidates: &[Rectangle], leaf_level: bool) -> usize {
        if leaf_level {
            self.overlap.select(target, candidates, leaf_level)
        } else {
            self.area.select(target, candidates, leaf_level)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Rectangle {
        Rectangle::new(min_x, min_y, max_x, max_y)
    }

    #[test]
    fn test_minimal_area_increase_picks_closest() {
        let candidates = vec![rect(0.0, 0.0, 2.0, 2.0), rect(10.0, 10.0, 12.0, 12.0)];
        let target = rect(11.0, 11.0, 11.5, 11.5);

        let chosen = MinimalAreaIncrease.select(&target, &candidates, true);
        assert_eq!(chosen, 1);
    }

    #[test]
    fn test_minimal_area_increase_tie_breaks_on_area() {
        // Both candidates already contain the target (zero growth); the
        // smaller one must win.
        let candidates = vec![rect(0.0, 0.0, 10.0, 10.0), rect(4.0, 4.0, 6.0, 6.0)];
        let target = rect(4.5, 4.5, 5.5, 5.5);

        let chosen = MinimalAreaIncrease.select(&target, &candidates, true);
        assert_eq!(chosen, 1);
    }

    #[test]
    fn test_minimal_overlap_area_avoids_crowded_candidate() {
        // Enlarging candidate 0 would overlap both siblings; candidates 1
        // and 2 stay overlap-free and the tie goes to the smaller growth.
        let candidates = vec![
            rect(0.0, 0.0, 4.0, 4.0),
            rect(5.0, 0.0, 9.0, 4.0),
            rect(0.0, 10.0, 4.0, 14.0),
        ];
        let target = rect(5.5, 10.0, 6.0, 10.5);

        let chosen = MinimalOverlapArea.select(&target, &candidates, true);
        assert_eq!(chosen, 2);
    }

    #[test]
    fn test_rstar_delegates_by_level() {
        let candidates = vec![
            rect(0.0, 0.0, 4.0, 4.0),
            rect(5.0, 0.0, 9.0, 4.0),
            rect(0.0, 10.0, 4.0, 14.0),
        ];
        let target = rect(5.5, 10.0, 6.0, 10.5);
        let selector = RStarSelector::default();

        assert_eq!(
            selector.select(&target, &candidates, true),
            MinimalOverlapArea.select(&target, &candidates, true)
        );
        assert_eq!(
            selector.select(&target, &candidates, false),
            MinimalAreaIncrease.select(&target, &candidates, false)
        );
    }

    #[test]
    #[should_panic(expected = "no candidate nodes")]
    fn test_empty_candidates_panics() {
        MinimalAreaIncrease.select(&rect(0.0, 0.0, 1.0, 1.0), &[], true);
    }
}
