//! ASCII scatter plots for terminal output.
//!
//! Intentionally "dumb" (fixed-size character grid), optimized for:
//! - quick visual sanity checks of the fitted relationship
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed points: `o`
//! - fitted regression line: `-`

/// Render a scatter of `points` with an optional fitted line, both mapped to
/// a `width` x `height` character grid.
pub fn render_scatter(
    points: &[(f64, f64)],
    line: Option<&[(f64, f64)]>,
    x_label: &str,
    y_label: &str,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let Some((x_min, x_max)) = axis_range(points.iter().map(|p| p.0), line, |p| p.0) else {
        return format!("{y_label} vs {x_label}: no data to plot\n");
    };
    let Some((y_min, y_max)) = axis_range(points.iter().map(|p| p.1), line, |p| p.1) else {
        return format!("{y_label} vs {x_label}: no data to plot\n");
    };
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Line first so observed points overlay it.
    if let Some(line) = line {
        for &(x, y) in line {
            if x < x_min || x > x_max || y < y_min || y > y_max {
                continue;
            }
            let col = map_x(x, x_min, x_max, width);
            let row = map_y(y, y_min, y_max, height);
            grid[row][col] = '-';
        }
    }

    for &(x, y) in points {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{y_label} vs {x_label} | x=[{x_min:.2}, {x_max:.2}] y=[{y_min:.4}, {y_max:.4}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

/// Sample a fitted line `y = intercept + slope * x` across an x-range.
pub fn sample_line(
    intercept: f64,
    slope: f64,
    x_min: f64,
    x_max: f64,
    samples: usize,
) -> Vec<(f64, f64)> {
    let samples = samples.max(2);
    (0..samples)
        .map(|i| {
            let x = x_min + (x_max - x_min) * i as f64 / (samples - 1) as f64;
            (x, intercept + slope * x)
        })
        .collect()
}

fn axis_range<I, F>(values: I, line: Option<&[(f64, f64)]>, pick: F) -> Option<(f64, f64)>
where
    I: Iterator<Item = f64>,
    F: Fn(&(f64, f64)) -> f64,
{
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values.chain(line.unwrap_or(&[]).iter().map(pick)) {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if min > max {
        return None;
    }
    if min == max {
        // Degenerate axis: widen so the single value maps mid-grid.
        return Some((min - 0.5, max + 0.5));
    }
    Some((min, max))
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let pad = (max - min) * frac;
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let t = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    ((t * (width - 1) as f64).round() as usize).min(width - 1)
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let t = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // Row 0 is the top of the grid.
    let row = ((1.0 - t) * (height - 1) as f64).round() as usize;
    row.min(height - 1)
}
