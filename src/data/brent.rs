//! Brent oil historical-data scraper.
//!
//! Primary strategy: plain GET and parse the first table on the page.
//! Fallback: re-request with a full browser header set and read the rendered
//! `tbody` rows (the page sometimes serves the table only to clients that
//! look like real browsers). Both strategies produce the same column
//! contract, so downstream code never knows which one ran.

use reqwest::blocking::Client;
use reqwest::header;

use crate::data::{fetch, html};
use crate::domain::RawBatch;
use crate::error::AppError;
use crate::sync::{ColumnSpec, FieldKind};

pub const COLUMNS: &[&str] = &["Date", "Price", "Open", "High", "Low", "Vol.", "Change %"];

/// Plain GET, first table in the document.
pub struct PlainHtml {
    pub endpoint: String,
}

impl fetch::FetchStrategy for PlainHtml {
    fn name(&self) -> &'static str {
        "plain-html"
    }

    fn fetch(&self, client: &Client) -> Result<RawBatch, AppError> {
        let body = fetch::get_text(client, &self.endpoint)?;
        html::extract_table(&body, "table tr", COLUMNS)
    }
}

/// Browser-shaped request against the same endpoint.
pub struct RenderedPage {
    pub endpoint: String,
}

impl fetch::FetchStrategy for RenderedPage {
    fn name(&self) -> &'static str {
        "rendered-page"
    }

    fn fetch(&self, client: &Client) -> Result<RawBatch, AppError> {
        let resp = client
            .get(&self.endpoint)
            .header(header::USER_AGENT, fetch::BROWSER_USER_AGENT)
            .header(
                header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .map_err(|e| AppError::fetch(format!("Rendered-page request failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(AppError::fetch(format!(
                "Rendered-page request failed with status {}.",
                resp.status()
            )));
        }
        let body = resp
            .text()
            .map_err(|e| AppError::fetch(format!("Failed to read rendered page: {e}")))?;
        html::extract_table(&body, "table tbody tr", COLUMNS)
    }
}

/// Dates appear as `Nov 14, 2025` on the page and `2025-11-14` in the sink.
pub fn column_spec() -> ColumnSpec {
    ColumnSpec::new(
        &["%Y-%m-%d", "%b %d, %Y", "%m/%d/%Y"],
        &[
            ("Price", FieldKind::Number),
            ("Open", FieldKind::Number),
            ("High", FieldKind::Number),
            ("Low", FieldKind::Number),
            ("Vol.", FieldKind::Text),
            ("Change %", FieldKind::Percent),
        ],
    )
}
