use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::WindowError;

/// Default lower bound of the manual-add mass domain.
pub const DEFAULT_MIN_MZ: f64 = 100.0;
/// Default upper bound of the manual-add mass domain.
pub const DEFAULT_MAX_MZ: f64 = 2000.0;

/// Allowed m/z range for manually added boundary lines.
///
/// The domain is the wider of the fixed default range and the observed `mz`
/// range of the loaded dataset; it is recomputed whenever a dataset is loaded.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MassDomain {
    pub min: f64,
    pub max: f64,
}

impl Default for MassDomain {
    fn default() -> Self {
        MassDomain {
            min: DEFAULT_MIN_MZ,
            max: DEFAULT_MAX_MZ,
        }
    }
}

impl MassDomain {
    /// Widen the default domain to cover the observed dataset bounds.
    pub fn from_observed(bounds: Option<(f64, f64)>) -> Self {
        match bounds {
            Some((lo, hi)) => MassDomain {
                min: DEFAULT_MIN_MZ.min(lo),
                max: DEFAULT_MAX_MZ.max(hi),
            },
            None => MassDomain::default(),
        }
    }

    pub fn contains(&self, position: f64) -> bool {
        position >= self.min && position <= self.max
    }
}

/// Ordered set of boundary-line positions along the mass axis.
///
/// Positions are kept sorted ascending and duplicate-free after every
/// mutation. `last_altered` tracks the most recently added or moved position
/// by value, not identity; it is cleared when the position it refers to is
/// removed.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BoundarySet {
    positions: Vec<f64>,
    last_altered: Option<f64>,
}

impl BoundarySet {
    pub fn new() -> Self {
        BoundarySet::default()
    }

    /// Seed a boundary set from positions read out of a dataset column.
    ///
    /// Non-finite values are dropped, the rest is sorted and de-duplicated.
    /// The last-altered marker starts out unset.
    pub fn from_positions<I: IntoIterator<Item = f64>>(positions: I) -> Self {
        let mut set = BoundarySet {
            positions: positions.into_iter().filter(|p| p.is_finite()).collect(),
            last_altered: None,
        };
        set.normalize();
        set
    }

    fn normalize(&mut self) {
        self.positions.sort_by_key(|&p| OrderedFloat(p));
        self.positions.dedup();
    }

    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn last_altered(&self) -> Option<f64> {
        self.last_altered
    }

    /// Consecutive boundary pairs, i.e. the half-open gaps `[start, end)`.
    ///
    /// Gaps are derived on demand from the current positions and are never
    /// stored.
    pub fn gaps(&self) -> Vec<(f64, f64)> {
        self.positions.iter().copied().tuple_windows().collect()
    }

    /// Add a new boundary line.
    ///
    /// # Arguments
    ///
    /// * `position` - the new line position along the mass axis
    /// * `domain` - allowed range for manual additions
    ///
    /// Fails with `OutOfRange` when the position lies outside the domain and
    /// with `Duplicate` when a line at exactly this position already exists;
    /// the set is unchanged in both cases. On success the position becomes
    /// the last-altered line.
    pub fn add(&mut self, position: f64, domain: &MassDomain) -> Result<(), WindowError> {
        if !domain.contains(position) {
            return Err(WindowError::OutOfRange {
                position,
                min: domain.min,
                max: domain.max,
            });
        }
        if self.positions.iter().any(|&p| p == position) {
            return Err(WindowError::Duplicate(position));
        }
        self.positions.push(position);
        self.normalize();
        self.last_altered = Some(position);
        Ok(())
    }

    /// Remove the most recently altered line.
    ///
    /// When the last-altered value is still present it is removed and the
    /// marker is cleared. When the marker is unset or stale, the greatest
    /// position is removed instead and the marker is left as it was.
    /// Returns the removed position, `None` on an empty set.
    pub fn remove_last_altered(&mut self) -> Option<f64> {
        if self.positions.is_empty() {
            return None;
        }
        match self.last_altered {
            Some(last) if self.positions.iter().any(|&p| p == last) => {
                self.positions.retain(|&p| p != last);
                self.last_altered = None;
                Some(last)
            }
            // positions are sorted ascending, the greatest one is last
            _ => self.positions.pop(),
        }
    }

    /// Apply a batch of drag relocations.
    ///
    /// Indices refer to the order *before* the batch, mirroring how
    /// simultaneous drag deltas are reported: all moves are applied against
    /// a snapshot, then the sorted, duplicate-free invariant is
    /// re-established once. The last applied move becomes the last-altered
    /// line. Out-of-range indices and non-finite positions are skipped.
    pub fn apply_moves(&mut self, moves: &[(usize, f64)]) {
        let mut updated = self.positions.clone();
        for &(index, new_position) in moves {
            if index < updated.len() && new_position.is_finite() {
                updated[index] = new_position;
                self.last_altered = Some(new_position);
            }
        }
        self.positions = updated;
        self.normalize();
    }

    /// Copy of this set with extra positions inserted and the last-altered
    /// marker pointing at `last_inserted`.
    pub fn extend_with(&self, insertions: &[f64], last_inserted: f64) -> BoundarySet {
        let mut positions = self.positions.clone();
        positions.extend_from_slice(insertions);
        let mut set = BoundarySet {
            positions,
            last_altered: Some(last_inserted),
        };
        set.normalize();
        set
    }

    /// Human-readable listing of the current positions, two decimal places.
    pub fn describe(&self) -> String {
        if self.positions.is_empty() {
            "No lines added yet.".to_string()
        } else {
            format!(
                "Lines: {}",
                self.positions.iter().map(|p| format!("{:.2}", p)).join(", ")
            )
        }
    }
}
