//! Gulf fuel-price listing scraper.
//!
//! The listing publishes one row per price-change event: a date plus the four
//! pump prices in effect from that date. Rows come newest-first in the page's
//! first `<tbody>`.

use reqwest::blocking::Client;

use crate::data::{fetch, html};
use crate::domain::RawBatch;
use crate::error::AppError;
use crate::sync::{ColumnSpec, FieldKind};

pub const COLUMNS: &[&str] = &["Date", "Super", "Premium", "G-Force Regular", "Regular"];

/// Scrape one page of the fuel-price listing.
pub struct GulfPage {
    pub endpoint: String,
}

impl fetch::FetchStrategy for GulfPage {
    fn name(&self) -> &'static str {
        "gulf-listing"
    }

    fn fetch(&self, client: &Client) -> Result<RawBatch, AppError> {
        let body = fetch::get_text(client, &self.endpoint)?;
        html::extract_scoped_table(&body, "tbody", COLUMNS)
    }
}

pub fn column_spec() -> ColumnSpec {
    ColumnSpec::new(
        &["%Y-%m-%d"],
        &[
            ("Super", FieldKind::Number),
            ("Premium", FieldKind::Number),
            ("G-Force Regular", FieldKind::Number),
            ("Regular", FieldKind::Number),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::normalize_batch;

    #[test]
    fn column_spec_normalizes_a_listing_row() {
        let batch = RawBatch {
            columns: COLUMNS.iter().map(|s| s.to_string()).collect(),
            rows: vec![vec![
                "2024-03-11".to_string(),
                "3.05".to_string(),
                "2.95".to_string(),
                "2.85".to_string(),
                "2.75".to_string(),
            ]],
        };
        let (series, report) = normalize_batch(&batch, &column_spec());
        assert_eq!(series.records.len(), 1);
        assert!(!report.has_issues());
        assert_eq!(series.records[0].values[1].as_number(), Some(2.95));
    }
}
