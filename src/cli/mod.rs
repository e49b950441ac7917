//! Command-line parsing for the data-collection and analysis jobs.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the scraping/sync/analysis code. Each subcommand
//! corresponds to one standalone job; endpoints and sink paths default from
//! the environment (see `config`).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "fuelsync",
    version,
    about = "Fuel, crude-oil and currency price collection with warehouse loading and analysis"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands, one per job.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scrape the fuel-price listing, densify to business days, and reload bronze.gulf.
    Gulf(GulfArgs),
    /// Update the Brent oil CSV sink with newly published rows.
    Brent(BrentArgs),
    /// Fetch the latest USD rate, append it to the rates sheet, and reload bronze.currency_rates.
    Rates(RatesArgs),
    /// Reload bronze.brent_oil from the Brent CSV sink (warehouse load routine).
    LoadBrent(LoadBrentArgs),
    /// Correlation/regression analysis over the joined warehouse tables.
    Analyze(AnalyzeArgs),
}

#[derive(Debug, Parser)]
pub struct GulfArgs {
    /// Fuel-price listing URL (default: FUELSYNC_GULF_URL or the public listing).
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Warehouse database file (default: FUELSYNC_WAREHOUSE or oil_warehouse.duckdb).
    #[arg(long)]
    pub database: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct BrentArgs {
    /// Historical-data page URL (default: FUELSYNC_BRENT_URL or the public page).
    #[arg(long)]
    pub endpoint: Option<String>,

    /// CSV sink to update (default: FUELSYNC_BRENT_CSV or brent_oil_history.csv).
    #[arg(long)]
    pub sink: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct RatesArgs {
    /// Rate API endpoint (default: FUELSYNC_NBG_URL or the public API).
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Rates sheet to update (default: FUELSYNC_RATES_SHEET or gel_to_usd_rates.csv).
    #[arg(long)]
    pub sheet: Option<PathBuf>,

    /// Warehouse database file (default: FUELSYNC_WAREHOUSE or oil_warehouse.duckdb).
    #[arg(long)]
    pub database: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct LoadBrentArgs {
    /// CSV sink to load from (default: FUELSYNC_BRENT_CSV or brent_oil_history.csv).
    #[arg(long)]
    pub sink: Option<PathBuf>,

    /// Warehouse database file (default: FUELSYNC_WAREHOUSE or oil_warehouse.duckdb).
    #[arg(long)]
    pub database: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Warehouse database file (default: FUELSYNC_WAREHOUSE or oil_warehouse.duckdb).
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Scenario oil price for the what-if prediction.
    #[arg(long, default_value_t = 90.0)]
    pub oil: f64,

    /// Scenario currency rate for the what-if prediction.
    #[arg(long, default_value_t = 2.75)]
    pub rate: f64,

    /// Disable the terminal plots (rendered by default).
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 18)]
    pub height: usize,
}
