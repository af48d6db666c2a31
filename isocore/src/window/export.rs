use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::target::TargetRow;
use crate::window::boundary::BoundarySet;

/// Round to the nearest multiple of 0.5.
///
/// Exact quarter values round away from zero, following `f64::round`.
///
/// # Examples
///
/// ```
/// use isocore::window::export::round_half;
///
/// assert_eq!(round_half(421.3), 421.5);
/// assert_eq!(round_half(421.1), 421.0);
/// assert_eq!(round_half(500.0), 500.0);
/// ```
pub fn round_half(x: f64) -> f64 {
    (x * 2.0).round() / 2.0
}

/// One exported row: a gap paired with one of its targets, or a gap alone
/// when no target falls inside it. `None` fields are the "not applicable"
/// sentinel of the exported table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub start: f64,
    pub end: f64,
    pub name: Option<String>,
    pub types: Option<String>,
    pub charge: Option<i32>,
    pub rt: Option<f64>,
    pub mz: Option<f64>,
    pub mzp1: Option<f64>,
    pub mzp2: Option<f64>,
    pub round_start: f64,
    pub round_end: f64,
    pub mz_minus_round_start: Option<f64>,
    pub round_end_minus_mzp2: Option<f64>,
}

impl WindowRecord {
    /// Placeholder row for a gap without targets.
    fn empty_gap(start: f64, end: f64) -> Self {
        WindowRecord {
            start,
            end,
            name: None,
            types: None,
            charge: None,
            rt: None,
            mz: None,
            mzp1: None,
            mzp2: None,
            round_start: round_half(start),
            round_end: round_half(end),
            mz_minus_round_start: None,
            round_end_minus_mzp2: None,
        }
    }

    fn from_target(start: f64, end: f64, target: &TargetRow) -> Self {
        let round_start = round_half(start);
        let round_end = round_half(end);
        WindowRecord {
            start,
            end,
            name: target.name.clone(),
            types: target.types.clone(),
            charge: target.charge,
            rt: Some(target.rt),
            mz: Some(target.mz),
            mzp1: target.mzp1,
            mzp2: target.mzp2,
            round_start,
            round_end,
            mz_minus_round_start: Some(target.mz - round_start),
            round_end_minus_mzp2: target.mzp2.map(|mzp2| round_end - mzp2),
        }
    }
}

fn gap_records(start: f64, end: f64, targets: &[TargetRow]) -> Vec<WindowRecord> {
    let records: Vec<WindowRecord> = targets
        .iter()
        .filter(|t| t.mz >= start && t.mz < end)
        .map(|t| WindowRecord::from_target(start, end, t))
        .collect();
    if records.is_empty() {
        vec![WindowRecord::empty_gap(start, end)]
    } else {
        records
    }
}

/// Partition targets into the gaps of a boundary set.
///
/// Emits one record per (gap, target) pair, selecting targets by
/// `start <= mz < end`, and exactly one placeholder record per empty gap.
/// Gaps emit in ascending boundary order; within a gap, targets keep the
/// dataset's original order. Fewer than two boundaries yield no records.
pub fn export_windows(boundaries: &BoundarySet, targets: &[TargetRow]) -> Vec<WindowRecord> {
    boundaries
        .gaps()
        .into_iter()
        .flat_map(|(start, end)| gap_records(start, end, targets))
        .collect()
}

/// Parallel variant of [`export_windows`]; the record order is identical.
pub fn export_windows_par(boundaries: &BoundarySet, targets: &[TargetRow]) -> Vec<WindowRecord> {
    boundaries
        .gaps()
        .into_par_iter()
        .flat_map_iter(|(start, end)| gap_records(start, end, targets))
        .collect()
}
