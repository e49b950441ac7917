//! Dense business-day reconstruction of a sparse change-event series.
//!
//! The fuel-price source publishes a row only when a price actually changes.
//! Downstream joins against daily oil/currency data need one row per business
//! day, so the gaps are filled by carrying each price backward to the previous
//! change point, and the series is extended forward to "today" by repeating
//! the most recent observation.
//!
//! Business assumption (inherited from the source, not validated here): a
//! price takes effect on its announcement date and holds until the next
//! announcement. Synthesized rows are provisional; the next full reload
//! replaces them wherever a real observation exists.

use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::{Series, TimeSeriesRecord};

/// Monday through Friday. Weekend dates are never synthesized.
pub fn is_business_day(date: NaiveDate) -> bool {
    date.weekday().num_days_from_monday() < 5
}

/// Expand change events into one record per business day.
///
/// Duplicate event dates are collapsed first (the record listed first wins),
/// so the dense output never repeats a date. Then, for each adjacent pair of
/// events, the newer record is emitted, then one synthetic record per
/// business day strictly between the two dates, each copying the newer
/// record's values. The oldest event is emitted unchanged. Output is in
/// canonical newest-first order.
pub fn fill_business_days(series: &Series) -> Series {
    let mut events = series.records.clone();
    // Stable sort: records sharing a date keep their listing order, so
    // dedup keeps the first-listed record for each date.
    events.sort_by_key(|r| r.date);
    events.dedup_by_key(|r| r.date);

    let mut out: Vec<TimeSeriesRecord> = Vec::new();
    for i in (1..events.len()).rev() {
        let newer = &events[i];
        let older = &events[i - 1];
        out.push(newer.clone());

        let mut date = newer.date - Duration::days(1);
        while date > older.date {
            if is_business_day(date) {
                out.push(TimeSeriesRecord {
                    date,
                    values: newer.values.clone(),
                });
            }
            date -= Duration::days(1);
        }
    }
    if let Some(oldest) = events.first() {
        out.push(oldest.clone());
    }

    let mut dense = Series {
        columns: series.columns.clone(),
        records: out,
    };
    dense.sort_newest_first();
    dense
}

/// Extend the series forward from its most recent date (exclusive) through
/// `today` (inclusive), business days only, repeating the latest record.
pub fn extend_to(series: &mut Series, today: NaiveDate) {
    let Some(latest) = series.records.iter().max_by_key(|r| r.date).cloned() else {
        return;
    };
    let mut date = latest.date + Duration::days(1);
    while date <= today {
        if is_business_day(date) {
            series.records.push(TimeSeriesRecord {
                date,
                values: latest.values.clone(),
            });
        }
        date += Duration::days(1);
    }
    series.sort_newest_first();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldValue;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(d: NaiveDate, price: f64) -> TimeSeriesRecord {
        TimeSeriesRecord {
            date: d,
            values: vec![FieldValue::Number(price)],
        }
    }

    fn series(records: Vec<TimeSeriesRecord>) -> Series {
        Series {
            columns: vec!["price".to_string()],
            records,
        }
    }

    #[test]
    fn carries_newer_price_backward_over_business_days() {
        // Events Tue 2024-01-02 (2.50) and Fri 2024-01-05 (2.60).
        // Wed/Thu must be synthesized at the newer price, 2.60.
        let input = series(vec![
            event(date(2024, 1, 2), 2.50),
            event(date(2024, 1, 5), 2.60),
        ]);
        let dense = fill_business_days(&input);

        let got: Vec<(NaiveDate, Option<f64>)> = dense
            .records
            .iter()
            .map(|r| (r.date, r.values[0].as_number()))
            .collect();
        assert_eq!(
            got,
            vec![
                (date(2024, 1, 5), Some(2.60)),
                (date(2024, 1, 4), Some(2.60)),
                (date(2024, 1, 3), Some(2.60)),
                (date(2024, 1, 2), Some(2.50)),
            ]
        );
    }

    #[test]
    fn synthesizes_only_business_days() {
        // Fri 2024-01-05 to Wed 2024-01-10 spans a weekend.
        let input = series(vec![
            event(date(2024, 1, 5), 1.0),
            event(date(2024, 1, 10), 2.0),
        ]);
        let dense = fill_business_days(&input);
        for r in &dense.records {
            assert!(
                is_business_day(r.date),
                "synthesized weekend date {}",
                r.date
            );
        }
        // Mon 8th and Tue 9th filled, Sat/Sun skipped.
        assert_eq!(dense.records.len(), 4);
    }

    #[test]
    fn dense_over_business_days_with_no_duplicates() {
        let input = series(vec![
            event(date(2024, 1, 1), 1.0),
            event(date(2024, 1, 8), 2.0),
            event(date(2024, 1, 12), 3.0),
        ]);
        let dense = fill_business_days(&input);

        // Every business day in [oldest, newest] has exactly one record.
        let mut expected = Vec::new();
        let mut d = date(2024, 1, 1);
        while d <= date(2024, 1, 12) {
            if is_business_day(d) {
                expected.push(d);
            }
            d += Duration::days(1);
        }
        let mut got: Vec<NaiveDate> = dense.records.iter().map(|r| r.date).collect();
        got.sort();
        assert_eq!(got, expected);
    }

    #[test]
    fn duplicate_event_dates_collapse_before_filling() {
        let input = series(vec![
            event(date(2024, 1, 2), 2.50),
            event(date(2024, 1, 2), 9.99),
            event(date(2024, 1, 4), 2.60),
        ]);
        let dense = fill_business_days(&input);

        let dates: Vec<NaiveDate> = dense.records.iter().map(|r| r.date).collect();
        let unique: std::collections::HashSet<NaiveDate> = dates.iter().copied().collect();
        assert_eq!(dates.len(), unique.len(), "dense series repeats a date");
        assert_eq!(
            dates,
            vec![date(2024, 1, 4), date(2024, 1, 3), date(2024, 1, 2)]
        );
        // The first-listed record for the duplicated date wins.
        let jan2 = dense
            .records
            .iter()
            .find(|r| r.date == date(2024, 1, 2))
            .unwrap();
        assert_eq!(jan2.values[0].as_number(), Some(2.50));
    }

    #[test]
    fn single_event_passes_through() {
        let input = series(vec![event(date(2024, 1, 3), 2.5)]);
        let dense = fill_business_days(&input);
        assert_eq!(dense.records, input.records);
    }

    #[test]
    fn empty_series_stays_empty() {
        let input = series(vec![]);
        assert!(fill_business_days(&input).records.is_empty());
    }

    #[test]
    fn extend_to_stops_at_today_and_skips_weekends() {
        // Latest known Thu 2024-01-04; today is Tue 2024-01-09.
        let mut s = series(vec![event(date(2024, 1, 4), 2.5)]);
        extend_to(&mut s, date(2024, 1, 9));

        let got: Vec<NaiveDate> = s.records.iter().map(|r| r.date).collect();
        assert_eq!(
            got,
            vec![
                date(2024, 1, 9),
                date(2024, 1, 8),
                date(2024, 1, 5),
                date(2024, 1, 4),
            ]
        );
        // Extrapolated rows repeat the latest observation.
        assert!(s.records.iter().all(|r| r.values[0].as_number() == Some(2.5)));
        // Bound: nothing later than today.
        assert!(s.records.iter().all(|r| r.date <= date(2024, 1, 9)));
    }

    #[test]
    fn extend_to_is_a_noop_when_already_current() {
        let mut s = series(vec![event(date(2024, 1, 9), 2.5)]);
        extend_to(&mut s, date(2024, 1, 9));
        assert_eq!(s.records.len(), 1);
    }
}
