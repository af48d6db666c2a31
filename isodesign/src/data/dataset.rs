//! Target list loading.
//!
//! Reads a tabular target list into memory and derives the per-load state
//! the design session needs: boundary seeds from a `Win_start` column,
//! pooled mass coordinates from every mass column, and the observed m/z
//! bounds. A malformed file surfaces as an error, never as partial data.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use regex::Regex;
use thiserror::Error;
use tracing::info;

use isocore::data::target::{mz_bounds, TargetRow};

/// Column set assumed when no header matches the `mz` prefix.
const DEFAULT_MZ_COLUMNS: [&str; 3] = ["MZ", "MZp1", "MZp2"];

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("failed to read target list: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse target list: {0}")]
    Csv(#[from] csv::Error),
    #[error("required column '{0}' is missing")]
    MissingColumn(&'static str),
    #[error("row {row}: column '{column}' does not hold a number: '{value}'")]
    BadCell {
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// A loaded target list plus the state derived from it at load time.
pub struct TargetDataset {
    pub targets: Vec<TargetRow>,
    /// Unique `Win_start` values, the initial boundary seeds.
    pub seed_boundaries: Vec<f64>,
    /// Sorted unique mass coordinates pooled from every `mz`-prefixed column.
    pub pooled_mz: Vec<f64>,
}

impl TargetDataset {
    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse a target list from any reader.
    ///
    /// `MZ` and `RT` are required columns and must hold finite numbers on
    /// every row. `Name`, `Types`, `Charge`, `MZp1`, `MZp2` and `Win_start`
    /// are optional; their cells parse leniently, anything non-numeric
    /// (or `NA`, or empty) becomes an absent value.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers: Vec<String> = csv_reader.headers()?.iter().map(|h| h.to_string()).collect();
        let column = |name: &str| headers.iter().position(|h| h == name);

        let mz_idx = column("MZ").ok_or(DatasetError::MissingColumn("MZ"))?;
        let rt_idx = column("RT").ok_or(DatasetError::MissingColumn("RT"))?;
        let name_idx = column("Name");
        let types_idx = column("Types");
        let charge_idx = column("Charge");
        let mzp1_idx = column("MZp1");
        let mzp2_idx = column("MZp2");
        let win_start_idx = column("Win_start");

        // every column whose header starts with "mz", case-insensitively
        let mz_prefix = Regex::new(r"(?i)^mz").unwrap();
        let mut pooled_columns: Vec<usize> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| mz_prefix.is_match(h))
            .map(|(i, _)| i)
            .collect();
        if pooled_columns.is_empty() {
            pooled_columns = DEFAULT_MZ_COLUMNS.iter().filter_map(|&n| column(n)).collect();
        }

        let mut targets = Vec::new();
        let mut seeds: Vec<f64> = Vec::new();
        let mut pooled: Vec<f64> = Vec::new();

        for (row_number, record) in csv_reader.records().enumerate() {
            let record = record?;
            let row = row_number + 1;

            let mz = parse_required(&record, mz_idx, "MZ", row)?;
            let rt = parse_required(&record, rt_idx, "RT", row)?;

            targets.push(TargetRow {
                name: string_cell(&record, name_idx),
                types: string_cell(&record, types_idx),
                charge: cell(&record, charge_idx).and_then(|v| v.parse().ok()),
                rt,
                mz,
                mzp1: f64_cell(&record, mzp1_idx),
                mzp2: f64_cell(&record, mzp2_idx),
            });

            for &idx in &pooled_columns {
                if let Some(value) = f64_cell(&record, Some(idx)) {
                    pooled.push(value);
                }
            }
            if let Some(seed) = f64_cell(&record, win_start_idx) {
                seeds.push(seed);
            }
        }

        seeds.sort_by(|a, b| a.partial_cmp(b).unwrap());
        seeds.dedup();
        pooled.sort_by(|a, b| a.partial_cmp(b).unwrap());
        pooled.dedup();

        info!(
            targets = targets.len(),
            pooled = pooled.len(),
            seeds = seeds.len(),
            "loaded target list"
        );

        Ok(TargetDataset {
            targets,
            seed_boundaries: seeds,
            pooled_mz: pooled,
        })
    }

    /// Observed `mz` bounds of the loaded targets.
    pub fn mz_bounds(&self) -> Option<(f64, f64)> {
        mz_bounds(&self.targets)
    }
}

fn cell<'a>(record: &'a csv::StringRecord, index: Option<usize>) -> Option<&'a str> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != "NA")
}

fn string_cell(record: &csv::StringRecord, index: Option<usize>) -> Option<String> {
    cell(record, index).map(str::to_string)
}

fn f64_cell(record: &csv::StringRecord, index: Option<usize>) -> Option<f64> {
    cell(record, index)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn parse_required(
    record: &csv::StringRecord,
    index: usize,
    column: &'static str,
    row: usize,
) -> Result<f64, DatasetError> {
    let raw = record.get(index).unwrap_or("").trim();
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DatasetError::BadCell {
            row,
            column,
            value: raw.to_string(),
        })
}
