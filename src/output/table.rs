//! CSV and JSON export

use csv::WriterBuilder;
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::OutputError;
use crate::scenario::ScenarioReport;
use crate::sweep::SweepTable;

/// Write a sweep table as CSV
///
/// Header is `<axis column>,market,apr_type,value`. Non-finite values are
/// written as `NaN` / `inf`.
pub fn write_csv<W: Write>(table: &SweepTable, writer: W) -> Result<(), OutputError> {
    let mut csv = WriterBuilder::new().has_headers(false).from_writer(writer);

    csv.write_record([table.axis.column(), "market", "apr_type", "value"])?;
    for row in &table.rows {
        csv.serialize((row.x, row.market, row.component, row.value))?;
    }

    csv.flush()?;
    Ok(())
}

/// Write a sweep table as CSV to a file
pub fn write_csv_path(table: &SweepTable, path: &Path) -> Result<(), OutputError> {
    let file = File::create(path)?;
    write_csv(table, file)?;
    info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

/// Write every sweep table of a report into `dir` as CSV
///
/// Files share their stem with the charts, e.g. `apr_by_utilization.csv`.
pub fn write_tables(report: &ScenarioReport, dir: &Path) -> Result<Vec<PathBuf>, OutputError> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(3);
    for table in report.tables() {
        let path = dir.join(format!("{}.csv", table.axis.file_stem()));
        write_csv_path(table, &path)?;
        written.push(path);
    }

    Ok(written)
}

/// Pretty JSON; non-finite floats serialize as `null`
pub fn to_json<T: Serialize>(value: &T) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn write_json_path<T: Serialize>(value: &T, path: &Path) -> Result<(), OutputError> {
    std::fs::write(path, to_json(value)?)?;
    info!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::write_charts;
    use crate::scenario::ScenarioRunner;
    use crate::sweep::{sweep_borrow_rate, sweep_lend_rate, sweep_utilization};

    #[test]
    fn test_csv_header_and_rows() {
        let table = sweep_utilization(0.10, 0.08, 21);
        let mut buf = Vec::new();
        write_csv(&table, &mut buf).unwrap();

        let mut reader = csv::Reader::from_reader(buf.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers, vec!["utilization_rate", "market", "apr_type", "value"]);

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 126);
        assert_eq!(&records[0][1], "frxUSD");
        assert_eq!(&records[0][2], "lentAPR");
        assert_eq!(&records[5][1], "sfrxUSD");
        assert_eq!(&records[5][2], "borrowAPR");

        let value: f64 = records[3][3].parse().unwrap();
        assert!((value - 0.08).abs() < 1e-12);
    }

    #[test]
    fn test_csv_axis_column_follows_table() {
        let table = sweep_borrow_rate(0.85, 0.08, 0.05);
        let mut buf = Vec::new();
        write_csv(&table, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("borrow_rate,market,apr_type,value\n"));
        assert_eq!(text.lines().count(), 1 + 6 * 6);
    }

    #[test]
    fn test_tables_share_stems_with_charts() {
        let dir = std::env::temp_dir()
            .join(format!("fraxlend_apr_tables_{}", std::process::id()));
        let report = ScenarioRunner::default().run();

        let tables = write_tables(&report, &dir).unwrap();
        let charts = write_charts(&report, &dir).unwrap();
        assert_eq!(tables.len(), 3);
        for (csv_path, svg_path) in tables.iter().zip(&charts) {
            assert_eq!(csv_path.extension().unwrap(), "csv");
            assert_eq!(csv_path.file_stem(), svg_path.file_stem());
        }
        assert!(tables[1].ends_with("apr_by_borrow_rate.csv"));

        let text = std::fs::read_to_string(&tables[2]).unwrap();
        assert!(text.starts_with("lend_rate,market,apr_type,value\n"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_json_nulls_non_finite() {
        let table = sweep_lend_rate(0.0, 0.08, 0.01);
        let json: serde_json::Value = serde_json::from_str(&to_json(&table).unwrap()).unwrap();

        assert_eq!(json["axis"], "lend_rate");
        // Base borrow APR at lend rate 0.01 is +inf
        let row = &json["rows"][10];
        assert_eq!(row["apr_type"], "borrowAPR");
        assert!(row["value"].is_null());
    }
}
