//! NaN-aware reductions used by the metric reducers and the threshold policy.
//!
//! Missing observations are `NaN` and are skipped inside a single stream. Degenerate
//! inputs (too few observations, zero variance) produce `NaN` rather than a default.

use statrs::statistics::Statistics;

/// Observed (non-NaN) values of a column.
pub fn observed(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| !v.is_nan()).collect()
}

/// Arithmetic mean of the observed values. `NaN` when nothing was observed.
pub fn mean(values: &[f64]) -> f64 {
    observed(values).iter().mean()
}

/// Sample (n−1) standard deviation of the observed values.
/// `NaN` with fewer than two observations.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    observed(values).iter().std_dev()
}

/// Pearson correlation over the rows where both columns were observed.
///
/// `NaN` with fewer than two complete pairs or when either side is constant over
/// those pairs. Finite results are clamped into `[-1, 1]` to absorb rounding.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let (px, py): (Vec<f64>, Vec<f64>) = xs
        .iter()
        .zip(ys)
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .map(|(x, y)| (*x, *y))
        .unzip();

    if px.len() < 2 {
        return f64::NAN;
    }

    let covariance = px.iter().covariance(py.iter());
    let r = covariance / (px.iter().std_dev() * py.iter().std_dev());

    if r.is_finite() {
        r.clamp(-1.0, 1.0)
    } else {
        f64::NAN
    }
}
