//! Shared domain types.
//!
//! These types are intentionally lightweight so they can be:
//!
//! - built from scraped HTML, API JSON, or a CSV sink
//! - passed through gap filling and merging unchanged
//! - rendered back into a sink or a warehouse insert

use std::collections::HashSet;

use chrono::NaiveDate;

/// Why a numeric field has no value.
///
/// Parse problems are recovered locally, recorded with their cause, and
/// reported once per batch instead of being swallowed row by row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingReason {
    /// Cell was empty after trimming.
    Empty,
    /// Literal `nan` token.
    NanToken,
    /// Literal `None` token.
    NoneToken,
    /// Text that did not coerce to a finite number.
    Unparseable,
}

impl MissingReason {
    pub fn label(self) -> &'static str {
        match self {
            MissingReason::Empty => "empty",
            MissingReason::NanToken => "nan",
            MissingReason::NoneToken => "none",
            MissingReason::Unparseable => "unparseable",
        }
    }
}

/// One typed cell of a record: a number, free text (e.g. a volume column kept
/// verbatim), or an explicit missing value. Missing is never rendered as zero.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Missing(MissingReason),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Render back to sink text. Missing values render empty, so a rewrite
    /// followed by a re-read normalizes to the same missing state.
    pub fn render(&self) -> String {
        match self {
            FieldValue::Number(v) => format!("{v}"),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Missing(_) => String::new(),
        }
    }
}

/// A dated observation. `values` aligns positionally with the owning series'
/// `columns`. The date is the canonical key; records with unparseable dates
/// are dropped during normalization and never constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesRecord {
    pub date: NaiveDate,
    pub values: Vec<FieldValue>,
}

/// A typed series: value column names plus dated records.
///
/// File sinks hold this newest-first; warehouse tables are unordered and
/// ordered at query time.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub columns: Vec<String>,
    pub records: Vec<TimeSeriesRecord>,
}

impl Series {
    pub fn empty(columns: Vec<String>) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    pub fn dates(&self) -> HashSet<NaiveDate> {
        self.records.iter().map(|r| r.date).collect()
    }

    /// Canonical file-sink order: newest date first.
    pub fn sort_newest_first(&mut self) {
        self.records.sort_by(|a, b| b.date.cmp(&a.date));
    }
}

/// An untyped scraped table: header names plus rows of raw cell text.
/// Produced by a fetch strategy, consumed by the normalizer, then discarded.
#[derive(Debug, Clone)]
pub struct RawBatch {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// One joined warehouse row for the analysis step.
#[derive(Debug, Clone)]
pub struct AnalysisRow {
    pub date: NaiveDate,
    pub fuel: Option<f64>,
    pub oil: Option<f64>,
    pub rate: Option<f64>,
}

/// Knobs for the `analyze` subcommand.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Scenario oil price for the what-if prediction.
    pub scenario_oil: f64,
    /// Scenario currency rate for the what-if prediction.
    pub scenario_rate: f64,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
}
