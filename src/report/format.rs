//! Formatted terminal output for the analysis run.
//!
//! Formatting lives in one place so the statistics code stays clean and the
//! output is easy to change (or snapshot-test) later.

use crate::domain::AnalysisConfig;
use crate::math::ColumnStats;
use crate::report::AnalysisSummary;

fn fmt_corr(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:+.4}"),
        None => "n/a".to_string(),
    }
}

fn stats_line(s: &ColumnStats) -> String {
    if s.count == 0 {
        return format!("{:<14} n=0 (all {} rows missing)\n", s.name, s.missing);
    }
    format!(
        "{:<14} n={:<5} missing={:<4} mean={:>9.4} std={:>8.4} min={:>9.4} max={:>9.4}\n",
        s.name, s.count, s.missing, s.mean, s.std, s.min, s.max
    )
}

/// Format the full analysis report.
pub fn format_analysis_report(summary: &AnalysisSummary, config: &AnalysisConfig) -> String {
    let mut out = String::new();

    out.push_str("=== fuelsync - fuel price analysis ===\n");
    out.push_str(&format!(
        "Joined rows: {} ({} complete for regression)\n\n",
        summary.rows, summary.complete
    ));

    out.push_str("Column summary:\n");
    for s in &summary.stats {
        out.push_str(&stats_line(s));
    }

    out.push_str("\nCorrelations (pairwise complete):\n");
    out.push_str(&format!(
        "  fuel ~ oil:  {}\n",
        fmt_corr(summary.corr_fuel_oil)
    ));
    out.push_str(&format!(
        "  fuel ~ rate: {}\n",
        fmt_corr(summary.corr_fuel_rate)
    ));
    out.push_str(&format!(
        "  oil ~ rate:  {}\n",
        fmt_corr(summary.corr_oil_rate)
    ));

    out.push_str("\nOLS: fuel ~ const + oil + rate\n");
    out.push_str(&format!(
        "  const: {:>10.6}\n  oil:   {:>10.6}\n  rate:  {:>10.6}\n",
        summary.fit.coefficients[0], summary.fit.coefficients[1], summary.fit.coefficients[2]
    ));
    out.push_str(&format!(
        "  n={} | R^2={:.4} | RMSE={:.4}\n",
        summary.fit.n, summary.fit.r_squared, summary.fit.rmse
    ));

    out.push_str(&format!(
        "\nScenario: oil={:.2}, rate={:.2} -> predicted fuel price {:.4}\n",
        config.scenario_oil, config.scenario_rate, summary.scenario_prediction
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AnalysisRow;
    use crate::report::analyze;
    use chrono::NaiveDate;

    #[test]
    fn report_mentions_every_section() {
        let rows: Vec<AnalysisRow> = (0..10i64)
            .map(|i| AnalysisRow {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i),
                fuel: Some(2.0 + 0.01 * i as f64),
                oil: Some(70.0 + i as f64),
                rate: Some(2.5 + 0.02 * i as f64),
            })
            .collect();
        let config = AnalysisConfig {
            scenario_oil: 90.0,
            scenario_rate: 2.75,
            plot: false,
            plot_width: 60,
            plot_height: 15,
        };
        let summary = analyze(&rows, &config).unwrap();
        let text = format_analysis_report(&summary, &config);

        for needle in [
            "Column summary:",
            "Correlations",
            "OLS: fuel ~ const + oil + rate",
            "Scenario: oil=90.00, rate=2.75",
            "Fuel_price",
            "Oil_price",
            "Currency_rate",
        ] {
            assert!(text.contains(needle), "missing section: {needle}");
        }
    }
}
