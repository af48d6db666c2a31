//! The design session, the stand-in for the interactive surface.
//!
//! Every surface event maps to exactly one method call applied atomically,
//! so two mutations never interleave. Boundary lines, the last-altered
//! marker and the mass domain live in explicit session fields; there is no
//! process-wide mutable state.

use tracing::{debug, info};

use isocore::error::WindowError;
use isocore::window::autofill::AutoFillPlanner;
use isocore::window::boundary::{BoundarySet, MassDomain};
use isocore::window::export::{export_windows, WindowRecord};

use crate::data::dataset::TargetDataset;

/// One interactive design round over a loaded target list.
pub struct DesignSession {
    dataset: TargetDataset,
    boundaries: BoundarySet,
    domain: MassDomain,
}

impl DesignSession {
    /// Start a session, seeding boundary lines from the dataset's
    /// `Win_start` column and widening the mass domain to the observed
    /// `mz` range.
    pub fn new(dataset: TargetDataset) -> Self {
        let boundaries = BoundarySet::from_positions(dataset.seed_boundaries.iter().copied());
        let domain = MassDomain::from_observed(dataset.mz_bounds());
        DesignSession {
            dataset,
            boundaries,
            domain,
        }
    }

    pub fn boundaries(&self) -> &BoundarySet {
        &self.boundaries
    }

    pub fn domain(&self) -> MassDomain {
        self.domain
    }

    pub fn dataset(&self) -> &TargetDataset {
        &self.dataset
    }

    /// Parse a manually typed position and add it as a new boundary line.
    pub fn add_line(&mut self, input: &str) -> Result<f64, WindowError> {
        let trimmed = input.trim();
        let position: f64 = trimmed
            .parse()
            .map_err(|_| WindowError::NotANumber(trimmed.to_string()))?;
        if !position.is_finite() {
            return Err(WindowError::NotANumber(trimmed.to_string()));
        }
        self.add_line_at(position)?;
        Ok(position)
    }

    pub fn add_line_at(&mut self, position: f64) -> Result<(), WindowError> {
        self.boundaries.add(position, &self.domain)?;
        debug!(position, "added boundary line");
        Ok(())
    }

    /// Replace the seeded boundary lines, e.g. from an explicit override.
    /// Every position passes through the usual domain and duplicate checks.
    pub fn set_lines(&mut self, positions: &[f64]) -> Result<(), WindowError> {
        let mut set = BoundarySet::new();
        for &position in positions {
            set.add(position, &self.domain)?;
        }
        self.boundaries = set;
        Ok(())
    }

    pub fn remove_last(&mut self) -> Option<f64> {
        let removed = self.boundaries.remove_last_altered();
        if let Some(position) = removed {
            debug!(position, "removed boundary line");
        }
        removed
    }

    /// Apply a batch of drag relocations reported against the pre-drag order.
    pub fn move_lines(&mut self, moves: &[(usize, f64)]) {
        self.boundaries.apply_moves(moves);
    }

    /// Subdivide over-wide, sparsely populated gaps.
    ///
    /// Returns the number of inserted lines; 0 means nothing changed and the
    /// prior boundary set and last-altered marker were kept.
    pub fn auto_fill(&mut self, max_width: Option<f64>) -> usize {
        let planner = AutoFillPlanner::new(max_width);
        match planner.plan(&self.boundaries, &self.dataset.pooled_mz) {
            Some(plan) => {
                let inserted = plan.insertions.len();
                self.boundaries = self
                    .boundaries
                    .extend_with(&plan.insertions, plan.last_inserted);
                info!(
                    inserted,
                    total = self.boundaries.len(),
                    "auto-fill inserted boundary lines"
                );
                inserted
            }
            None => {
                info!("auto-fill made no changes");
                0
            }
        }
    }

    pub fn export(&self) -> Vec<WindowRecord> {
        export_windows(&self.boundaries, &self.dataset.targets)
    }

    pub fn summary(&self) -> String {
        self.boundaries.describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = "\
Name,Types,Charge,RT,MZ,MZp1,MZp2,Win_start
pep1,Heavy,2,12.5,420.5,421.0,421.5,400
pep2,Light,3,13.1,430.2,,NA,440
";

    fn session() -> DesignSession {
        let dataset = TargetDataset::from_reader(DATA.as_bytes()).unwrap();
        DesignSession::new(dataset)
    }

    #[test]
    fn test_session_seeds_from_win_start() {
        let session = session();
        assert_eq!(session.boundaries().positions(), &[400.0, 440.0]);
        assert_eq!(session.summary(), "Lines: 400.00, 440.00");
    }

    #[test]
    fn test_add_line_parses_manual_input() {
        let mut session = session();
        assert_eq!(session.add_line(" 500.5 ").unwrap(), 500.5);
        assert_eq!(
            session.add_line("abc").unwrap_err(),
            WindowError::NotANumber("abc".to_string())
        );
        assert!(matches!(
            session.add_line("50"),
            Err(WindowError::OutOfRange { .. })
        ));
        assert_eq!(session.boundaries().positions(), &[400.0, 440.0, 500.5]);
    }

    #[test]
    fn test_auto_fill_reports_no_change() {
        let mut session = session();
        // the only gap [400, 440) is wide but holds four pooled coordinates
        assert_eq!(session.auto_fill(Some(10.0)), 0);
        assert_eq!(session.boundaries().positions(), &[400.0, 440.0]);
    }

    #[test]
    fn test_auto_fill_inserts_into_empty_gap() {
        let mut session = session();
        session.add_line("540").unwrap();
        // gap [440, 540) is empty and 100 wide: 11 divisions, 10 insertions
        let inserted = session.auto_fill(Some(10.0));
        assert_eq!(inserted, 10);
        assert_eq!(session.boundaries().len(), 13);
    }

    #[test]
    fn test_export_covers_every_gap() {
        let mut session = session();
        session.add_line("540").unwrap();
        let records = session.export();
        // gap [400,440) holds both targets, gap [440,540) is empty
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name.as_deref(), Some("pep1"));
        assert_eq!(records[1].name.as_deref(), Some("pep2"));
        assert_eq!(records[2].name, None);
    }

    #[test]
    fn test_remove_last_prefers_last_altered() {
        let mut session = session();
        session.add_line("420").unwrap();
        assert_eq!(session.remove_last(), Some(420.0));
        // marker cleared, next removal falls back to the greatest line
        assert_eq!(session.remove_last(), Some(440.0));
        assert_eq!(session.boundaries().positions(), &[400.0]);
    }

    #[test]
    fn test_set_lines_replaces_seeds() {
        let mut session = session();
        session.set_lines(&[300.0, 600.0, 450.0]).unwrap();
        assert_eq!(session.boundaries().positions(), &[300.0, 450.0, 600.0]);
        assert!(session.set_lines(&[50.0]).is_err());
    }
}
