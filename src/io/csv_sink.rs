//! CSV file sinks.
//!
//! A sink is a pre-existing CSV file keyed by a `Date` column, kept
//! newest-first. Rewrites are destructive, so the pre-write state is copied
//! to a sibling `.bak` path first. Callers skip the write entirely when a
//! merge appended nothing, leaving timestamps and backups untouched.

use std::path::{Path, PathBuf};

use crate::domain::{RawBatch, Series};
use crate::error::AppError;
use crate::sync::{ColumnSpec, ParseReport, normalize_batch};

/// Sibling backup path: `prices.csv` -> `prices.csv.bak`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".bak");
    PathBuf::from(os)
}

/// Read and normalize an existing sink.
///
/// A missing sink is a configuration error: sinks are created once, outside
/// these jobs, and runs only mutate them incrementally.
pub fn read_sink(path: &Path, spec: &ColumnSpec) -> Result<(Series, ParseReport), AppError> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| AppError::config(format!("Failed to open sink '{}': {e}", path.display())))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::config(format!("Failed to read sink header: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result
            .map_err(|e| AppError::config(format!("Failed to read sink row: {e}")))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    let batch = RawBatch {
        columns: headers,
        rows,
    };
    Ok(normalize_batch(&batch, spec))
}

/// Rewrite a sink with the given series, newest-first, backing up the
/// previous contents beside it.
pub fn write_sink(path: &Path, series: &Series, date_format: &str) -> Result<(), AppError> {
    if path.exists() {
        let backup = backup_path(path);
        std::fs::copy(path, &backup).map_err(|e| {
            AppError::persist(format!(
                "Failed to back up sink to '{}': {e}",
                backup.display()
            ))
        })?;
    }

    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::persist(format!("Failed to write sink '{}': {e}", path.display())))?;

    let mut header = vec!["Date".to_string()];
    header.extend(series.columns.iter().cloned());
    writer
        .write_record(&header)
        .map_err(|e| AppError::persist(format!("Failed to write sink header: {e}")))?;

    for record in &series.records {
        let mut row = vec![record.date.format(date_format).to_string()];
        row.extend(record.values.iter().map(|v| v.render()));
        writer
            .write_record(&row)
            .map_err(|e| AppError::persist(format!("Failed to write sink row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::persist(format!("Failed to flush sink: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldValue, TimeSeriesRecord};
    use crate::sync::FieldKind;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn spec() -> ColumnSpec {
        ColumnSpec::new(&["%Y-%m-%d"], &[("price", FieldKind::Number)])
    }

    fn sample_series() -> Series {
        Series {
            columns: vec!["price".to_string()],
            records: vec![
                TimeSeriesRecord {
                    date: date(2024, 1, 3),
                    values: vec![FieldValue::Number(77.1)],
                },
                TimeSeriesRecord {
                    date: date(2024, 1, 2),
                    values: vec![FieldValue::Number(76.24)],
                },
            ],
        }
    }

    #[test]
    fn write_then_read_round_trips_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.csv");

        write_sink(&path, &sample_series(), "%Y-%m-%d").unwrap();
        let (read_back, report) = read_sink(&path, &spec()).unwrap();

        assert!(!report.has_issues());
        assert_eq!(read_back, sample_series());
    }

    #[test]
    fn rewrite_backs_up_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.csv");

        write_sink(&path, &sample_series(), "%Y-%m-%d").unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let mut updated = sample_series();
        updated.records.insert(
            0,
            TimeSeriesRecord {
                date: date(2024, 1, 4),
                values: vec![FieldValue::Number(78.0)],
            },
        );
        write_sink(&path, &updated, "%Y-%m-%d").unwrap();

        let backup = std::fs::read_to_string(backup_path(&path)).unwrap();
        assert_eq!(backup, before);
        assert_ne!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn sheet_date_format_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rates.csv");
        let series = Series {
            columns: vec!["rate".to_string()],
            records: vec![TimeSeriesRecord {
                date: date(2025, 1, 5),
                values: vec![FieldValue::Number(2.75)],
            }],
        };

        write_sink(&path, &series, "%m/%d/%Y").unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("01/05/2025"));

        let sheet_spec = ColumnSpec::new(&["%m/%d/%Y"], &[("rate", FieldKind::Number)]);
        let (read_back, _) = read_sink(&path, &sheet_spec).unwrap();
        assert_eq!(read_back, series);
    }

    #[test]
    fn missing_sink_is_a_config_error() {
        let err = read_sink(Path::new("/nonexistent/sink.csv"), &spec()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
