//! Fetch strategies, tried in an explicit order.
//!
//! A source is fetched by walking an ordered strategy list until one returns
//! rows. The fallback never runs if the primary succeeded, and every
//! strategy must honor the same column contract so the caller cannot tell
//! which one produced the batch.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::domain::RawBatch;
use crate::error::AppError;

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

/// Blocking HTTP client with a bounded timeout. Fetch failures occur before
/// any sink mutation, so a timeout aborts the run with no partial writes.
pub fn http_client(timeout_secs: u64) -> Result<Client, AppError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| AppError::fetch(format!("Failed to build HTTP client: {e}")))
}

/// One way of obtaining a raw table from a source.
pub trait FetchStrategy {
    fn name(&self) -> &'static str;
    fn fetch(&self, client: &Client) -> Result<RawBatch, AppError>;
}

/// Try each strategy in order until one succeeds.
///
/// Engaging a fallback and the reason for it are both reported, so a run that
/// quietly degraded is still visible to the operator.
pub fn fetch_first_success(
    client: &Client,
    strategies: &[&dyn FetchStrategy],
) -> Result<RawBatch, AppError> {
    let mut last_err: Option<AppError> = None;
    for (i, strategy) in strategies.iter().enumerate() {
        if i > 0 {
            println!("Fetch fallback engaged: trying '{}'.", strategy.name());
        }
        match strategy.fetch(client) {
            Ok(batch) => return Ok(batch),
            Err(err) => {
                if i + 1 < strategies.len() {
                    println!("Strategy '{}' failed: {err}", strategy.name());
                }
                last_err = Some(err);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| AppError::fetch("No fetch strategies configured.")))
}

/// GET a URL and return the body text, treating non-success statuses as
/// fetch failures.
pub fn get_text(client: &Client, url: &str) -> Result<String, AppError> {
    let resp = client
        .get(url)
        .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
        .send()
        .map_err(|e| AppError::fetch(format!("Request to {url} failed: {e}")))?;
    if !resp.status().is_success() {
        return Err(AppError::fetch(format!(
            "Request to {url} failed with status {}.",
            resp.status()
        )));
    }
    resp.text()
        .map_err(|e| AppError::fetch(format!("Failed to read body from {url}: {e}")))
}
