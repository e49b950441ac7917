//! National-bank currency-rate API client (USD).
//!
//! The API returns a top-level list whose entries come in two shapes: a
//! container holding a `currencies` list (with optional container-level
//! dates) or a bare currency object. The shape is resolved by an explicit
//! discriminant check on the entry's keys, and the two shapes are modeled as
//! distinct structs rather than probed field by field.

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;
use crate::sync::{ISO_DATE_FORMATS, parse_date};

#[derive(Debug, Deserialize)]
pub struct ContainerEntry {
    pub currencies: Vec<CurrencyEntry>,
    #[serde(rename = "validFromDate")]
    pub valid_from_date: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CurrencyEntry {
    pub code: Option<String>,
    /// Numeric or string in the wild; coerced in `entry_rate`.
    pub rate: Option<Value>,
    #[serde(rename = "rateFormated")]
    pub rate_formated: Option<String>,
    #[serde(rename = "validFromDate")]
    pub valid_from_date: Option<String>,
    pub date: Option<String>,
}

/// The two entry shapes the API is known to produce.
#[derive(Debug)]
pub enum RateEntry {
    Container(ContainerEntry),
    Currency(CurrencyEntry),
}

/// Classify one JSON entry by its discriminant key.
///
/// `currencies` marks a container, `code` a bare currency object; anything
/// else is an unknown shape and is ignored.
pub fn classify(entry: &Value) -> Option<RateEntry> {
    let obj = entry.as_object()?;
    if obj.contains_key("currencies") {
        serde_json::from_value(entry.clone())
            .ok()
            .map(RateEntry::Container)
    } else if obj.contains_key("code") {
        serde_json::from_value(entry.clone())
            .ok()
            .map(RateEntry::Currency)
    } else {
        None
    }
}

/// A possible `(date, rate)` pair for USD, before the selection policy runs.
#[derive(Debug, Clone, PartialEq)]
pub struct RateCandidate {
    pub date: Option<NaiveDate>,
    pub rate: Option<f64>,
}

fn entry_rate(cur: &CurrencyEntry) -> Option<f64> {
    let direct = match &cur.rate {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.replace(',', "").trim().parse().ok(),
        _ => None,
    };
    direct.or_else(|| {
        cur.rate_formated
            .as_ref()
            .and_then(|rf| rf.replace(',', "").trim().parse().ok())
    })
}

/// The entry's own date, preferring `validFromDate` over `date`.
fn entry_date(cur: &CurrencyEntry) -> Option<NaiveDate> {
    cur.valid_from_date
        .as_deref()
        .and_then(|s| parse_date(s, ISO_DATE_FORMATS))
        .or_else(|| {
            cur.date
                .as_deref()
                .and_then(|s| parse_date(s, ISO_DATE_FORMATS))
        })
}

/// Walk the document and collect every USD candidate.
///
/// A currency-level date always beats the containing entry's date; the
/// container date is only used when the currency object carries none.
pub fn usd_candidates(doc: &Value) -> Result<Vec<RateCandidate>, AppError> {
    let list = doc.as_array().ok_or_else(|| {
        AppError::no_usable_data("Unexpected JSON structure: expected a top-level list.")
    })?;

    let mut candidates = Vec::new();
    for entry in list {
        match classify(entry) {
            Some(RateEntry::Container(container)) => {
                let container_date = container
                    .valid_from_date
                    .as_deref()
                    .and_then(|s| parse_date(s, ISO_DATE_FORMATS))
                    .or_else(|| {
                        container
                            .date
                            .as_deref()
                            .and_then(|s| parse_date(s, ISO_DATE_FORMATS))
                    });
                for cur in &container.currencies {
                    if cur.code.as_deref() == Some("USD") {
                        candidates.push(RateCandidate {
                            date: entry_date(cur).or(container_date),
                            rate: entry_rate(cur),
                        });
                    }
                }
            }
            Some(RateEntry::Currency(cur)) => {
                if cur.code.as_deref() == Some("USD") {
                    candidates.push(RateCandidate {
                        date: entry_date(&cur),
                        rate: entry_rate(&cur),
                    });
                }
            }
            None => {}
        }
    }
    Ok(candidates)
}

/// Selection policy over the candidate list.
///
/// Among candidates with both a usable date and a usable rate, pick the
/// maximum date. If none qualify, fall back to any candidate with a usable
/// rate (date unknown). With no usable rate at all, the whole fetch fails
/// rather than fabricating a value.
pub fn select_best(candidates: &[RateCandidate]) -> Result<(Option<NaiveDate>, f64), AppError> {
    let dated: Vec<(NaiveDate, f64)> = candidates
        .iter()
        .filter_map(|c| match (c.date, c.rate) {
            (Some(d), Some(r)) => Some((d, r)),
            _ => None,
        })
        .collect();
    if let Some(&(date, rate)) = dated.iter().max_by_key(|(d, _)| *d) {
        return Ok((Some(date), rate));
    }
    if let Some(rate) = candidates.iter().find_map(|c| c.rate) {
        return Ok((None, rate));
    }
    Err(AppError::no_usable_data(
        "USD entries found but none had a usable date or rate.",
    ))
}

/// Fetch the latest USD rate from the API.
///
/// Returns `(date, rate)`; the date is `None` when the selected candidate
/// carried no date (the caller decides what calendar day to file it under).
pub fn fetch_usd_rate(
    client: &Client,
    endpoint: &str,
) -> Result<(Option<NaiveDate>, f64), AppError> {
    let resp = client
        .get(endpoint)
        .send()
        .map_err(|e| AppError::fetch(format!("Rate API request failed: {e}")))?;
    if !resp.status().is_success() {
        return Err(AppError::fetch(format!(
            "Rate API request failed with status {}.",
            resp.status()
        )));
    }
    let doc: Value = resp
        .json()
        .map_err(|e| AppError::fetch(format!("Failed to parse rate API response: {e}")))?;

    let candidates = usd_candidates(&doc)?;
    if candidates.is_empty() {
        return Err(AppError::no_usable_data(
            "No USD candidates found in the rate API response.",
        ));
    }
    select_best(&candidates)
}
