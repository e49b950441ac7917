//! Record normalization: raw scraped text to typed records.
//!
//! Sources disagree on locale formatting (thousands separators, percent
//! suffixes, mixed ISO date variants), so each source describes itself with a
//! `ColumnSpec` and all coercion happens here. Two rules hold everywhere:
//!
//! - an unparseable date drops the whole record (never stored as a sentinel)
//! - an unparseable number becomes an explicit missing value (never zero)
//!
//! Normalization is idempotent: rendering a normalized series back to text
//! and normalizing again yields the same series.

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::{FieldValue, MissingReason, RawBatch, Series, TimeSeriesRecord};

/// How to coerce one value column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain numeric, grouping separators stripped.
    Number,
    /// Numeric with a `%` suffix to strip.
    Percent,
    /// Kept verbatim (e.g. a volume column like `278.40K`).
    Text,
}

/// Per-source schema: accepted date formats plus value columns in order.
/// The first column of a batch is always the date column.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub date_formats: &'static [&'static str],
    pub fields: Vec<(String, FieldKind)>,
}

impl ColumnSpec {
    pub fn new(
        date_formats: &'static [&'static str],
        fields: &[(&str, FieldKind)],
    ) -> Self {
        Self {
            date_formats,
            fields: fields
                .iter()
                .map(|(name, kind)| (name.to_string(), *kind))
                .collect(),
        }
    }

    pub fn column_names(&self) -> Vec<String> {
        self.fields.iter().map(|(name, _)| name.clone()).collect()
    }
}

/// ISO-like variants seen in API payloads: `2025-11-13T17:01:11.812`,
/// `2025-11-14 00:00:00.000`, plain dates, optional trailing `Z`.
pub const ISO_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d",
];

/// Parse a date-like token against an ordered list of formats.
///
/// Formats containing time components are parsed as datetimes and truncated
/// to the calendar date; the series key never carries a time.
pub fn parse_date(raw: &str, formats: &[&str]) -> Option<NaiveDate> {
    let s = raw.trim().trim_end_matches('Z').trim();
    if s.is_empty() {
        return None;
    }
    for fmt in formats {
        if fmt.contains("%H") {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(dt.date());
            }
        } else if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

/// Coerce one raw cell according to its column kind.
pub fn normalize_value(raw: &str, kind: FieldKind) -> FieldValue {
    match kind {
        FieldKind::Text => FieldValue::Text(raw.trim().to_string()),
        FieldKind::Number | FieldKind::Percent => {
            let cleaned = raw.replace(',', "");
            let cleaned = cleaned.trim().trim_end_matches('%').trim();
            if cleaned.is_empty() {
                FieldValue::Missing(MissingReason::Empty)
            } else if cleaned.eq_ignore_ascii_case("nan") {
                FieldValue::Missing(MissingReason::NanToken)
            } else if cleaned == "None" {
                FieldValue::Missing(MissingReason::NoneToken)
            } else {
                match cleaned.parse::<f64>() {
                    Ok(v) if v.is_finite() => FieldValue::Number(v),
                    _ => FieldValue::Missing(MissingReason::Unparseable),
                }
            }
        }
    }
}

/// What normalization recovered from locally, aggregated per batch.
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    pub rows_in: usize,
    pub dropped_dates: usize,
    pub missing_empty: usize,
    pub missing_nan: usize,
    pub missing_none: usize,
    pub missing_unparseable: usize,
}

impl ParseReport {
    fn note_missing(&mut self, reason: MissingReason) {
        match reason {
            MissingReason::Empty => self.missing_empty += 1,
            MissingReason::NanToken => self.missing_nan += 1,
            MissingReason::NoneToken => self.missing_none += 1,
            MissingReason::Unparseable => self.missing_unparseable += 1,
        }
    }

    pub fn has_issues(&self) -> bool {
        self.dropped_dates > 0 || self.missing_nan > 0 || self.missing_unparseable > 0
    }

    pub fn summary(&self) -> String {
        format!(
            "Normalized {} rows: {} dropped (bad date); missing fields: {} empty, {} nan, {} none, {} unparseable.",
            self.rows_in,
            self.dropped_dates,
            self.missing_empty,
            self.missing_nan,
            self.missing_none,
            self.missing_unparseable,
        )
    }
}

/// Map a raw batch into a typed series, dropping records whose date does not
/// parse and recording every local recovery in the report.
pub fn normalize_batch(batch: &RawBatch, spec: &ColumnSpec) -> (Series, ParseReport) {
    let mut report = ParseReport {
        rows_in: batch.rows.len(),
        ..ParseReport::default()
    };
    let mut records = Vec::with_capacity(batch.rows.len());

    for row in &batch.rows {
        let Some(date_cell) = row.first() else {
            report.dropped_dates += 1;
            continue;
        };
        let Some(date) = parse_date(date_cell, spec.date_formats) else {
            report.dropped_dates += 1;
            continue;
        };

        let mut values = Vec::with_capacity(spec.fields.len());
        for (i, (_, kind)) in spec.fields.iter().enumerate() {
            let cell = row.get(i + 1).map(String::as_str).unwrap_or("");
            let value = normalize_value(cell, *kind);
            if let FieldValue::Missing(reason) = value {
                report.note_missing(reason);
            }
            values.push(value);
        }
        records.push(TimeSeriesRecord { date, values });
    }

    (
        Series {
            columns: spec.column_names(),
            records,
        },
        report,
    )
}
