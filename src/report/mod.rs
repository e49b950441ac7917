//! Analysis over the joined warehouse: summary stats, correlations,
//! regression, and a what-if prediction.

pub mod format;

use crate::domain::{AnalysisConfig, AnalysisRow};
use crate::error::AppError;
use crate::math::{ColumnStats, OlsFit, correlation, describe, fit_ols, predict};

/// Everything the analysis run computes, ready for formatting.
#[derive(Debug, Clone)]
pub struct AnalysisSummary {
    pub rows: usize,
    pub complete: usize,
    pub stats: Vec<ColumnStats>,
    /// Pairwise correlations: (fuel, oil), (fuel, rate), (oil, rate).
    pub corr_fuel_oil: Option<f64>,
    pub corr_fuel_rate: Option<f64>,
    pub corr_oil_rate: Option<f64>,
    pub fit: OlsFit,
    pub scenario_prediction: f64,
}

/// Run the full analysis over the joined rows.
///
/// The regression uses complete cases only (fuel, oil and rate all present);
/// too few complete rows is a no-usable-data condition, not a crash.
pub fn analyze(rows: &[AnalysisRow], config: &AnalysisConfig) -> Result<AnalysisSummary, AppError> {
    let fuel: Vec<Option<f64>> = rows.iter().map(|r| r.fuel).collect();
    let oil: Vec<Option<f64>> = rows.iter().map(|r| r.oil).collect();
    let rate: Vec<Option<f64>> = rows.iter().map(|r| r.rate).collect();

    let stats = vec![
        describe("Fuel_price", &fuel),
        describe("Oil_price", &oil),
        describe("Currency_rate", &rate),
    ];

    let complete: Vec<(f64, f64, f64)> = rows
        .iter()
        .filter_map(|r| match (r.fuel, r.oil, r.rate) {
            (Some(f), Some(o), Some(c)) => Some((f, o, c)),
            _ => None,
        })
        .collect();
    if complete.len() < 4 {
        return Err(AppError::no_usable_data(format!(
            "Only {} complete rows (need at least 4 for the regression).",
            complete.len()
        )));
    }

    let x_rows: Vec<Vec<f64>> = complete.iter().map(|&(_, o, c)| vec![o, c]).collect();
    let y: Vec<f64> = complete.iter().map(|&(f, _, _)| f).collect();
    let fit = fit_ols(&x_rows, &y).ok_or_else(|| {
        AppError::no_usable_data("Regression did not converge (degenerate inputs).")
    })?;

    let scenario_prediction = predict(&fit, &[config.scenario_oil, config.scenario_rate]);

    Ok(AnalysisSummary {
        rows: rows.len(),
        complete: complete.len(),
        stats,
        corr_fuel_oil: correlation(&fuel, &oil),
        corr_fuel_rate: correlation(&fuel, &rate),
        corr_oil_rate: correlation(&oil, &rate),
        fit,
        scenario_prediction,
    })
}
