//! CSV export sink for derived isolation windows.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use isocore::window::export::WindowRecord;

/// Column header of the exported window table, in fixed order.
pub const EXPORT_COLUMNS: [&str; 13] = [
    "Start",
    "End",
    "Name",
    "Types",
    "Charge",
    "RT",
    "MZ",
    "MZp1",
    "MZp2",
    "Round_start",
    "Round_end",
    "MZ-Round_start",
    "Round_end-MZp2",
];

/// Sentinel written for fields that are not applicable to a row.
pub const NA: &str = "NA";

fn na_f64(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| NA.to_string())
}

fn na_i32(value: Option<i32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| NA.to_string())
}

fn na_str(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| NA.to_string())
}

/// Write the exported window rows as CSV, header first.
pub fn write_windows_csv<W: Write>(records: &[WindowRecord], writer: W) -> csv::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(EXPORT_COLUMNS)?;
    for record in records {
        csv_writer.write_record([
            record.start.to_string(),
            record.end.to_string(),
            na_str(&record.name),
            na_str(&record.types),
            na_i32(record.charge),
            na_f64(record.rt),
            na_f64(record.mz),
            na_f64(record.mzp1),
            na_f64(record.mzp2),
            record.round_start.to_string(),
            record.round_end.to_string(),
            na_f64(record.mz_minus_round_start),
            na_f64(record.round_end_minus_mzp2),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn save_windows_csv(path: &Path, records: &[WindowRecord]) -> csv::Result<()> {
    let file = File::create(path)?;
    write_windows_csv(records, BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use isocore::data::target::TargetRow;
    use isocore::window::boundary::BoundarySet;
    use isocore::window::export::export_windows;

    #[test]
    fn test_written_table_has_fixed_header_and_na_sentinels() {
        let boundaries = BoundarySet::from_positions(vec![100.0, 200.0, 300.0]);
        let targets = vec![TargetRow::new(
            Some("pep1".to_string()),
            Some("Heavy".to_string()),
            Some(2),
            12.5,
            150.0,
            Some(150.5),
            None,
        )];
        let records = export_windows(&boundaries, &targets);

        let mut buffer = Vec::new();
        write_windows_csv(&records, &mut buffer).unwrap();
        let written = String::from_utf8(buffer).unwrap();
        let mut lines = written.lines();

        assert_eq!(
            lines.next().unwrap(),
            "Start,End,Name,Types,Charge,RT,MZ,MZp1,MZp2,Round_start,Round_end,MZ-Round_start,Round_end-MZp2"
        );
        assert_eq!(
            lines.next().unwrap(),
            "100,200,pep1,Heavy,2,12.5,150,150.5,NA,100,200,50,NA"
        );
        assert_eq!(
            lines.next().unwrap(),
            "200,300,NA,NA,NA,NA,NA,NA,NA,200,300,NA,NA"
        );
        assert_eq!(lines.next(), None);
    }
}
