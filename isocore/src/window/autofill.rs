use crate::window::boundary::BoundarySet;

/// Default maximum allowed gap width between adjacent boundary lines.
pub const DEFAULT_MAX_GAP_WIDTH: f64 = 10.0;

/// Number of pooled coordinates inside a gap at which subdivision is skipped,
/// regardless of the gap width.
const DENSITY_SKIP_THRESHOLD: usize = 2;

/// Plans interior boundary insertions for over-wide, sparsely populated gaps.
#[derive(Clone, Copy, Debug)]
pub struct AutoFillPlanner {
    max_width: f64,
}

/// Result of a planning pass that found at least one position to insert.
#[derive(Clone, Debug, PartialEq)]
pub struct AutoFillPlan {
    /// Interior positions to insert, in ascending gap order.
    pub insertions: Vec<f64>,
    /// The last inserted position, the new last-altered line.
    pub last_inserted: f64,
}

impl AutoFillPlanner {
    /// Build a planner; a non-positive or absent width falls back to the
    /// default of 10.
    pub fn new(max_width: Option<f64>) -> Self {
        let max_width = match max_width {
            Some(w) if w > 0.0 => w,
            _ => DEFAULT_MAX_GAP_WIDTH,
        };
        AutoFillPlanner { max_width }
    }

    pub fn max_width(&self) -> f64 {
        self.max_width
    }

    /// Compute the interior positions needed so that no gap stays wider than
    /// the maximum width, unless the gap already holds enough targets.
    ///
    /// # Arguments
    ///
    /// * `boundaries` - the current boundary set, at least two positions
    /// * `pooled_mz` - all mass coordinates pooled from the dataset's mass
    ///   columns
    ///
    /// Returns:
    ///
    /// * `None` when fewer than two boundaries exist or no gap needs
    ///   subdivision; the caller keeps its prior set and last-altered marker
    /// * `Some(plan)` with the insertions otherwise
    ///
    /// A gap `[start, end)` of width `g` is subdivided only when `g` strictly
    /// exceeds the maximum width `W` and fewer than two pooled coordinates
    /// fall strictly inside `(start, end)`. Subdivision uses
    /// `n = max(2, floor(g / W) + 1)` equal divisions, inserting the `n - 1`
    /// interior positions.
    pub fn plan(&self, boundaries: &BoundarySet, pooled_mz: &[f64]) -> Option<AutoFillPlan> {
        if boundaries.len() < 2 {
            return None;
        }

        let mut insertions = Vec::new();
        for (start, end) in boundaries.gaps() {
            let width = end - start;
            if width <= self.max_width {
                continue;
            }

            let inside = pooled_mz
                .iter()
                .filter(|&&mz| start < mz && mz < end)
                .count();
            if inside >= DENSITY_SKIP_THRESHOLD {
                continue;
            }

            let divisions = ((width / self.max_width) as usize + 1).max(2);
            let step = width / divisions as f64;
            for j in 1..divisions {
                insertions.push(start + j as f64 * step);
            }
        }

        let last_inserted = *insertions.last()?;
        Some(AutoFillPlan {
            insertions,
            last_inserted,
        })
    }

    /// Plan and apply in one step.
    ///
    /// Returns the enlarged, sorted, duplicate-free boundary set with the
    /// last inserted position as its last-altered line, or `None` when
    /// nothing had to change.
    pub fn apply(&self, boundaries: &BoundarySet, pooled_mz: &[f64]) -> Option<BoundarySet> {
        let plan = self.plan(boundaries, pooled_mz)?;
        Some(boundaries.extend_with(&plan.insertions, plan.last_inserted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_width_replaces_invalid_values() {
        assert_eq!(AutoFillPlanner::new(None).max_width(), 10.0);
        assert_eq!(AutoFillPlanner::new(Some(0.0)).max_width(), 10.0);
        assert_eq!(AutoFillPlanner::new(Some(-5.0)).max_width(), 10.0);
        assert_eq!(AutoFillPlanner::new(Some(25.0)).max_width(), 25.0);
    }

    #[test]
    fn test_empty_gap_is_subdivided_equally() {
        let planner = AutoFillPlanner::new(Some(10.0));
        let set = BoundarySet::from_positions(vec![100.0, 150.0]);

        let plan = planner.plan(&set, &[]).unwrap();
        // width 50, n = max(2, floor(50/10) + 1) = 6, five interior points
        assert_eq!(plan.insertions.len(), 5);
        let step = 50.0 / 6.0;
        for (j, &position) in plan.insertions.iter().enumerate() {
            let expected = 100.0 + (j + 1) as f64 * step;
            assert!((position - expected).abs() < 1e-9);
        }
        assert!((plan.last_inserted - (100.0 + 5.0 * step)).abs() < 1e-9);

        let filled = planner.apply(&set, &[]).unwrap();
        assert_eq!(filled.len(), 7);
        assert_eq!(filled.last_altered(), Some(plan.last_inserted));
    }

    #[test]
    fn test_populated_gap_is_skipped() {
        let planner = AutoFillPlanner::new(Some(10.0));
        let set = BoundarySet::from_positions(vec![100.0, 150.0]);

        // two coordinates strictly inside override the width rule
        assert!(planner.plan(&set, &[120.0, 130.0]).is_none());

        // one coordinate is not enough density
        let plan = planner.plan(&set, &[120.0]).unwrap();
        assert_eq!(plan.insertions.len(), 5);

        // coordinates sitting exactly on the bounds do not count
        let plan = planner.plan(&set, &[100.0, 150.0]).unwrap();
        assert_eq!(plan.insertions.len(), 5);
    }

    #[test]
    fn test_gap_equal_to_width_is_never_subdivided() {
        let planner = AutoFillPlanner::new(Some(10.0));
        let set = BoundarySet::from_positions(vec![100.0, 110.0]);
        assert!(planner.plan(&set, &[]).is_none());
    }

    #[test]
    fn test_needs_at_least_two_boundaries() {
        let planner = AutoFillPlanner::new(Some(10.0));
        assert!(planner.plan(&BoundarySet::new(), &[]).is_none());
        let single = BoundarySet::from_positions(vec![100.0]);
        assert!(planner.plan(&single, &[]).is_none());
    }

    #[test]
    fn test_fill_is_idempotent() {
        let planner = AutoFillPlanner::new(Some(10.0));
        let set = BoundarySet::from_positions(vec![100.0, 150.0, 300.0]);

        let filled = planner.apply(&set, &[]).unwrap();
        for (start, end) in filled.gaps() {
            assert!(end - start <= 10.0 + 1e-9);
        }
        assert!(planner.plan(&filled, &[]).is_none());
    }

    #[test]
    fn test_only_wide_sparse_gaps_change() {
        let planner = AutoFillPlanner::new(Some(10.0));
        let set = BoundarySet::from_positions(vec![100.0, 108.0, 140.0, 170.0]);
        // gap [100,108) is narrow, [140,170) is dense, only [108,140) splits
        let pooled = vec![150.0, 160.0];

        let plan = planner.plan(&set, &pooled).unwrap();
        let width = 140.0 - 108.0;
        let divisions = ((width / 10.0) as usize + 1).max(2);
        assert_eq!(plan.insertions.len(), divisions - 1);
        assert!(plan.insertions.iter().all(|&p| p > 108.0 && p < 140.0));
    }
}
