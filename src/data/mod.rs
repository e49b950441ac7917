//! Source fetchers.
//!
//! - `fetch`: the strategy trait and ordered-fallback driver
//! - `html`: shared HTML table extraction
//! - `gulf`: fuel-price listing scraper
//! - `brent`: oil-price history scraper (with rendered-page fallback)
//! - `nbg`: central-bank currency-rate API client

pub mod brent;
pub mod fetch;
pub mod gulf;
pub mod html;
pub mod nbg;
