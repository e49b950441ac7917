//! Incremental merge of freshly fetched records into an existing sink.
//!
//! Membership is by date key: a fresh record is appended only if its date is
//! not already present. Everything else is silently dropped (already there).
//! A zero-append outcome means the caller must not touch the sink at all.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::domain::{Series, TimeSeriesRecord};

#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// Existing records plus unseen fresh records, newest first.
    pub merged: Series,
    /// How many fresh records were actually appended.
    pub appended: usize,
}

/// Merge `fresh` into `existing` by date key.
///
/// Duplicates inside `fresh` itself are also collapsed: the first occurrence
/// wins, later ones are dropped like any other already-seen date.
pub fn merge(existing: &Series, fresh: &Series) -> MergeOutcome {
    let mut seen: HashSet<NaiveDate> = existing.dates();
    let mut merged = existing.clone();
    let mut appended = 0;

    for record in &fresh.records {
        if seen.insert(record.date) {
            merged.records.push(record.clone());
            appended += 1;
        }
    }
    merged.sort_newest_first();

    MergeOutcome { merged, appended }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldValue;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(d: NaiveDate, v: f64) -> TimeSeriesRecord {
        TimeSeriesRecord {
            date: d,
            values: vec![FieldValue::Number(v)],
        }
    }

    fn series(records: Vec<TimeSeriesRecord>) -> Series {
        Series {
            columns: vec!["price".to_string()],
            records,
        }
    }

    #[test]
    fn appends_only_unseen_dates() {
        // Existing Mon/Wed; fresh Wed/Fri. Only Friday is new.
        let existing = series(vec![
            record(date(2024, 1, 1), 1.0),
            record(date(2024, 1, 3), 3.0),
        ]);
        let fresh = series(vec![
            record(date(2024, 1, 3), 3.0),
            record(date(2024, 1, 5), 5.0),
        ]);

        let outcome = merge(&existing, &fresh);
        assert_eq!(outcome.appended, 1);

        let mut dates: Vec<NaiveDate> =
            outcome.merged.records.iter().map(|r| r.date).collect();
        dates.sort();
        assert_eq!(
            dates,
            vec![date(2024, 1, 1), date(2024, 1, 3), date(2024, 1, 5)]
        );
    }

    #[test]
    fn second_merge_with_same_batch_appends_nothing() {
        let existing = series(vec![record(date(2024, 1, 1), 1.0)]);
        let fresh = series(vec![
            record(date(2024, 1, 2), 2.0),
            record(date(2024, 1, 3), 3.0),
        ]);

        let first = merge(&existing, &fresh);
        assert_eq!(first.appended, 2);

        let second = merge(&first.merged, &fresh);
        assert_eq!(second.appended, 0);
        assert_eq!(second.merged, first.merged);
    }

    #[test]
    fn result_has_no_duplicate_dates() {
        let existing = series(vec![record(date(2024, 1, 2), 1.0)]);
        let fresh = series(vec![
            record(date(2024, 1, 2), 9.0),
            record(date(2024, 1, 4), 4.0),
            record(date(2024, 1, 4), 4.5),
        ]);

        let outcome = merge(&existing, &fresh);
        let dates: Vec<NaiveDate> = outcome.merged.records.iter().map(|r| r.date).collect();
        let unique: HashSet<NaiveDate> = dates.iter().copied().collect();
        assert_eq!(dates.len(), unique.len());
        // Existing record wins over a fresh record for the same date.
        let jan2 = outcome
            .merged
            .records
            .iter()
            .find(|r| r.date == date(2024, 1, 2))
            .unwrap();
        assert_eq!(jan2.values[0].as_number(), Some(1.0));
    }

    #[test]
    fn result_is_sorted_newest_first() {
        let existing = series(vec![record(date(2024, 1, 5), 5.0)]);
        let fresh = series(vec![
            record(date(2024, 1, 1), 1.0),
            record(date(2024, 1, 9), 9.0),
        ]);

        let outcome = merge(&existing, &fresh);
        let dates: Vec<NaiveDate> = outcome.merged.records.iter().map(|r| r.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 9), date(2024, 1, 5), date(2024, 1, 1)]
        );
    }
}
