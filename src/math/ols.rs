//! Ordinary least squares for the price regression.
//!
//! The analysis fits one small model:
//!
//! ```text
//! fuel_price = b0 + b1 * oil_price + b2 * currency_rate
//! ```
//!
//! Implementation choices:
//! - SVD solve rather than QR: the design matrix is tall (one row per joined
//!   day, three columns), and nalgebra's `QR::solve` targets square systems.
//! - Oil prices and currency rates move together over long windows, so the
//!   columns can be nearly collinear; we retry with progressively looser
//!   tolerances before giving up.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// A fitted regression with its in-sample diagnostics.
#[derive(Debug, Clone)]
pub struct OlsFit {
    /// Intercept first, then one coefficient per regressor.
    pub coefficients: Vec<f64>,
    pub r_squared: f64,
    pub rmse: f64,
    pub n: usize,
}

/// Fit `y ~ const + regressors` over complete rows.
///
/// `rows` holds one regressor vector per observation; an intercept column is
/// prepended internally. Returns `None` when there are fewer observations
/// than parameters or the solve fails.
pub fn fit_ols(rows: &[Vec<f64>], y: &[f64]) -> Option<OlsFit> {
    if rows.is_empty() || rows.len() != y.len() {
        return None;
    }
    let k = rows[0].len() + 1;
    if rows.len() < k {
        return None;
    }

    let mut data = Vec::with_capacity(rows.len() * k);
    for row in rows {
        if row.len() + 1 != k {
            return None;
        }
        data.push(1.0);
        data.extend_from_slice(row);
    }
    let x = DMatrix::from_row_slice(rows.len(), k, &data);
    let yv = DVector::from_row_slice(y);

    let beta = solve_least_squares(&x, &yv)?;

    let fitted = &x * &beta;
    let residuals = &yv - &fitted;
    let n = y.len() as f64;
    let mean = yv.iter().sum::<f64>() / n;
    let ss_tot: f64 = yv.iter().map(|v| (v - mean).powi(2)).sum();
    let ss_res: f64 = residuals.iter().map(|r| r * r).sum();
    let r_squared = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else {
        0.0
    };
    let rmse = (ss_res / n).sqrt();

    Some(OlsFit {
        coefficients: beta.iter().copied().collect(),
        r_squared,
        rmse,
        n: y.len(),
    })
}

/// Evaluate a fit at one regressor vector.
pub fn predict(fit: &OlsFit, inputs: &[f64]) -> f64 {
    let mut out = fit.coefficients[0];
    for (coef, value) in fit.coefficients.iter().skip(1).zip(inputs) {
        out += coef * value;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn fit_ols_recovers_known_coefficients() {
        // y = 1.5 + 0.02*a - 0.4*b, exactly.
        let rows: Vec<Vec<f64>> = (0..12)
            .map(|i| vec![70.0 + i as f64, 2.5 + 0.05 * i as f64])
            .collect();
        let y: Vec<f64> = rows
            .iter()
            .map(|r| 1.5 + 0.02 * r[0] - 0.4 * r[1])
            .collect();

        let fit = fit_ols(&rows, &y).unwrap();
        assert!((fit.coefficients[0] - 1.5).abs() < 1e-6);
        assert!((fit.coefficients[1] - 0.02).abs() < 1e-6);
        assert!((fit.coefficients[2] + 0.4).abs() < 1e-6);
        assert!(fit.r_squared > 0.999999);
        assert!(fit.rmse < 1e-6);

        let predicted = predict(&fit, &[90.0, 2.75]);
        assert!((predicted - (1.5 + 0.02 * 90.0 - 0.4 * 2.75)).abs() < 1e-6);
    }

    #[test]
    fn underdetermined_systems_are_rejected() {
        assert!(fit_ols(&[vec![1.0, 2.0]], &[1.0]).is_none());
        assert!(fit_ols(&[], &[]).is_none());
    }
}
