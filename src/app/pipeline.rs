//! Per-job pipelines.
//!
//! Every job is one pass of the same shape:
//!
//! fetch -> normalize -> (gap fill) -> merge -> persist
//!
//! Jobs run sequentially and synchronously; fetch failures happen before any
//! sink mutation, so an aborted run leaves sinks exactly as it found them.
//! Nothing guards against two concurrent runs over the same sink — that is a
//! known limitation, runs are expected to be scheduled one at a time.

use chrono::Local;

use crate::config::JobConfig;
use crate::data::fetch::{self, FetchStrategy};
use crate::data::{brent, gulf, nbg};
use crate::domain::{AnalysisConfig, FieldValue, Series, TimeSeriesRecord};
use crate::error::AppError;
use crate::io::csv_sink;
use crate::io::warehouse::Warehouse;
use crate::sync::{ColumnSpec, FieldKind, ParseReport, extend_to, fill_business_days, merge};

const SCRAPE_TIMEOUT_SECS: u64 = 20;
const RATE_API_TIMEOUT_SECS: u64 = 15;

fn report_if_noisy(report: &ParseReport) {
    if report.has_issues() {
        println!("{}", report.summary());
    }
}

/// Scrape the fuel-price listing, densify, and reload `bronze.gulf`.
pub fn run_gulf(config: &JobConfig) -> Result<(), AppError> {
    let client = fetch::http_client(SCRAPE_TIMEOUT_SECS)?;
    let page = gulf::GulfPage {
        endpoint: config.source_endpoint.clone(),
    };
    let strategies: [&dyn FetchStrategy; 1] = [&page];
    let batch = fetch::fetch_first_success(&client, &strategies)?;

    let (series, report) = crate::sync::normalize_batch(&batch, &gulf::column_spec());
    report_if_noisy(&report);
    if series.records.is_empty() {
        return Err(AppError::no_usable_data(
            "No fuel-price rows with a parseable date.",
        ));
    }

    let mut dense = fill_business_days(&series);
    extend_to(&mut dense, Local::now().date_naive());

    let mut warehouse = Warehouse::open(&config.warehouse)?;
    let n = warehouse.replace_gulf(&dense)?;
    println!("Fuel prices expanded, extended to today, and reloaded into bronze.gulf ({n} rows).");
    Ok(())
}

/// Update the Brent oil CSV sink with newly published rows.
pub fn run_brent(config: &JobConfig) -> Result<(), AppError> {
    let spec = brent::column_spec();
    let (existing, existing_report) = csv_sink::read_sink(&config.sink_location, &spec)?;
    report_if_noisy(&existing_report);

    let client = fetch::http_client(SCRAPE_TIMEOUT_SECS)?;
    let primary = brent::PlainHtml {
        endpoint: config.source_endpoint.clone(),
    };
    let fallback = brent::RenderedPage {
        endpoint: config.source_endpoint.clone(),
    };
    let strategies: [&dyn FetchStrategy; 2] = [&primary, &fallback];
    let batch = fetch::fetch_first_success(&client, &strategies)?;

    let (fresh, fresh_report) = crate::sync::normalize_batch(&batch, &spec);
    report_if_noisy(&fresh_report);

    let outcome = merge(&existing, &fresh);
    if outcome.appended == 0 {
        println!("No new rows to append - sink is already up to date.");
        return Ok(());
    }

    println!("Appending {} new rows...", outcome.appended);
    csv_sink::write_sink(&config.sink_location, &outcome.merged, "%Y-%m-%d")?;
    println!("Sink updated: {}", config.sink_location.display());
    println!(
        "Backup saved to {}",
        csv_sink::backup_path(&config.sink_location).display()
    );
    Ok(())
}

fn rates_sheet_spec() -> ColumnSpec {
    ColumnSpec::new(
        &["%m/%d/%Y", "%Y-%m-%d"],
        &[("rate", FieldKind::Number)],
    )
}

/// Fetch the latest USD rate, append to the sheet, mirror into the warehouse.
pub fn run_rates(config: &JobConfig) -> Result<(), AppError> {
    let client = fetch::http_client(RATE_API_TIMEOUT_SECS)?;
    let (date, rate) = nbg::fetch_usd_rate(&client, &config.source_endpoint)?;
    // An undated candidate is filed under today; a real date from the next
    // publication supersedes nothing since the date key is already taken.
    let date = date.unwrap_or_else(|| Local::now().date_naive());

    let spec = rates_sheet_spec();
    let (existing, report) = csv_sink::read_sink(&config.sink_location, &spec)?;
    report_if_noisy(&report);

    let fresh = Series {
        columns: vec!["rate".to_string()],
        records: vec![TimeSeriesRecord {
            date,
            values: vec![FieldValue::Number(rate)],
        }],
    };

    let outcome = merge(&existing, &fresh);
    if outcome.appended == 0 {
        println!("No new data - this date already exists in the sheet.");
    } else {
        csv_sink::write_sink(&config.sink_location, &outcome.merged, "%m/%d/%Y")?;
        println!("Appended {} -> {rate} to the sheet.", date.format("%m/%d/%Y"));
    }

    let mut warehouse = Warehouse::open(&config.warehouse)?;
    let n = warehouse.replace_currency_rates(&outcome.merged)?;
    println!("Loaded {n} sheet rows into bronze.currency_rates.");
    Ok(())
}

/// Warehouse load routine: reload `bronze.brent_oil` from the CSV sink.
pub fn run_load_brent(config: &JobConfig) -> Result<(), AppError> {
    if !config.sink_location.exists() {
        return Err(AppError::config(format!(
            "Brent CSV sink not found at '{}'.",
            config.sink_location.display()
        )));
    }
    let mut warehouse = Warehouse::open(&config.warehouse)?;
    let n = warehouse.load_brent_oil(&config.sink_location)?;
    println!("Warehouse load routine completed: {n} rows into bronze.brent_oil.");
    Ok(())
}

/// Correlation/regression analysis over the joined warehouse.
pub fn run_analyze(job: &JobConfig, config: &AnalysisConfig) -> Result<(), AppError> {
    let warehouse = Warehouse::open(&job.warehouse)?;
    let rows = warehouse.analysis_rows()?;
    if rows.is_empty() {
        return Err(AppError::no_usable_data(
            "No joined rows in the warehouse - load bronze.gulf and bronze.brent_oil first.",
        ));
    }

    let summary = crate::report::analyze(&rows, config)?;
    println!(
        "{}",
        crate::report::format::format_analysis_report(&summary, config)
    );

    if config.plot {
        // Partial-dependence lines hold the other regressor at its mean.
        let mean_rate = mean_of(rows.iter().filter_map(|r| r.rate));
        let mean_oil = mean_of(rows.iter().filter_map(|r| r.oil));

        let fuel_oil: Vec<(f64, f64)> = rows
            .iter()
            .filter_map(|r| Some((r.oil?, r.fuel?)))
            .collect();
        let oil_line = fitted_line_over(&fuel_oil, &summary, 1, mean_rate);
        println!(
            "{}",
            crate::plot::render_scatter(
                &fuel_oil,
                oil_line.as_deref(),
                "oil price",
                "fuel price",
                config.plot_width,
                config.plot_height,
            )
        );

        let fuel_rate: Vec<(f64, f64)> = rows
            .iter()
            .filter_map(|r| Some((r.rate?, r.fuel?)))
            .collect();
        let rate_line = fitted_line_over(&fuel_rate, &summary, 2, mean_oil);
        println!(
            "{}",
            crate::plot::render_scatter(
                &fuel_rate,
                rate_line.as_deref(),
                "currency rate",
                "fuel price",
                config.plot_width,
                config.plot_height,
            )
        );
    }
    Ok(())
}

fn mean_of(values: impl Iterator<Item = f64>) -> f64 {
    let collected: Vec<f64> = values.collect();
    if collected.is_empty() {
        return 0.0;
    }
    collected.iter().sum::<f64>() / collected.len() as f64
}

/// Partial-dependence line for one regressor, holding the other at `held`.
fn fitted_line_over(
    points: &[(f64, f64)],
    summary: &crate::report::AnalysisSummary,
    coefficient_index: usize,
    held: f64,
) -> Option<Vec<(f64, f64)>> {
    if points.is_empty() {
        return None;
    }
    let x_min = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let x_max = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let other_index = if coefficient_index == 1 { 2 } else { 1 };
    let intercept =
        summary.fit.coefficients[0] + summary.fit.coefficients[other_index] * held;
    let slope = summary.fit.coefficients[coefficient_index];
    Some(crate::plot::sample_line(intercept, slope, x_min, x_max, 64))
}
