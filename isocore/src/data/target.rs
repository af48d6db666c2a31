use serde::{Deserialize, Serialize};

/// One analyte from a loaded target list.
///
/// `mz` is the mandatory mass coordinate; `mzp1` and `mzp2` are only present
/// when the corresponding column carried a numeric value. Rows are immutable
/// once loaded, the engine only ever borrows them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetRow {
    pub name: Option<String>,
    pub types: Option<String>,
    pub charge: Option<i32>,
    pub rt: f64,
    pub mz: f64,
    pub mzp1: Option<f64>,
    pub mzp2: Option<f64>,
}

impl TargetRow {
    pub fn new(
        name: Option<String>,
        types: Option<String>,
        charge: Option<i32>,
        rt: f64,
        mz: f64,
        mzp1: Option<f64>,
        mzp2: Option<f64>,
    ) -> Self {
        TargetRow {
            name,
            types,
            charge,
            rt,
            mz,
            mzp1,
            mzp2,
        }
    }

    /// All mass coordinates present on this row, main coordinate first.
    pub fn mass_coordinates(&self) -> impl Iterator<Item = f64> + '_ {
        std::iter::once(self.mz).chain(self.mzp1).chain(self.mzp2)
    }
}

/// Observed min and max of the mandatory `mz` column, `None` for an empty list.
pub fn mz_bounds(targets: &[TargetRow]) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for target in targets {
        lo = lo.min(target.mz);
        hi = hi.max(target.mz);
    }
    if lo.is_finite() && hi.is_finite() {
        Some((lo, hi))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(mz: f64) -> TargetRow {
        TargetRow::new(None, None, None, 10.0, mz, None, None)
    }

    #[test]
    fn test_mass_coordinates() {
        let full = TargetRow::new(None, None, None, 10.0, 420.5, Some(421.0), Some(421.5));
        let coords: Vec<f64> = full.mass_coordinates().collect();
        assert_eq!(coords, vec![420.5, 421.0, 421.5]);

        let sparse = TargetRow::new(None, None, None, 10.0, 420.5, None, Some(421.5));
        let coords: Vec<f64> = sparse.mass_coordinates().collect();
        assert_eq!(coords, vec![420.5, 421.5]);
    }

    #[test]
    fn test_mz_bounds() {
        assert_eq!(mz_bounds(&[]), None);
        let targets = vec![row(880.2), row(420.5), row(1201.7)];
        assert_eq!(mz_bounds(&targets), Some((420.5, 1201.7)));
    }
}
