//! Explicit job configuration.
//!
//! Endpoints, sink paths and warehouse location are resolved once at startup
//! (CLI flag > environment variable > built-in default) and passed into each
//! component at construction. Nothing reads ambient globals after this point.

use std::path::PathBuf;

/// Default source endpoints (overridable per run).
pub const DEFAULT_GULF_ENDPOINT: &str = "https://gulf.ge/ge/fuel_prices?page=1";
pub const DEFAULT_BRENT_ENDPOINT: &str =
    "https://www.investing.com/commodities/brent-oil-historical-data";
pub const DEFAULT_NBG_ENDPOINT: &str =
    "https://nbg.gov.ge/gw/api/ct/monetarypolicy/currencies/en/json";

/// Default sink locations, relative to the working directory.
pub const DEFAULT_BRENT_SINK: &str = "brent_oil_history.csv";
pub const DEFAULT_RATES_SINK: &str = "gel_to_usd_rates.csv";
pub const DEFAULT_WAREHOUSE: &str = "oil_warehouse.duckdb";

/// Where the DuckDB warehouse lives.
#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    pub database: PathBuf,
}

/// Everything a single job run needs, resolved up front.
///
/// `source_endpoint` is empty for warehouse-only jobs (e.g. the brent-oil
/// load routine), and `sink_location` points at the warehouse file itself
/// for jobs whose only sink is a warehouse table.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub source_endpoint: String,
    pub sink_location: PathBuf,
    pub warehouse: WarehouseConfig,
}

/// Environment lookup with a fallback default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_path_or(key: &str, default: &str) -> PathBuf {
    PathBuf::from(env_or(key, default))
}
