//! Descriptive statistics, kernel density estimation and the chi-squared
//! contingency test used by the analysis routines.
//!
//! All functions take already-filtered values: callers drop missing ratios
//! before calling in here.

use crate::error::{AnalyzerError, Result};
use statrs::distribution::{ChiSquared, ContinuousCDF};
use std::f64::consts::PI;

/// Number of points a density curve is evaluated on
pub const KDE_GRID_POINTS: usize = 200;

/// How many bandwidths the density grid extends past the data
const KDE_CUT: f64 = 3.0;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator)
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Min / mean / std / max of a set of values
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Describe {
    pub count: usize,
    pub min: Option<f64>,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub max: Option<f64>,
}

impl Describe {
    pub fn of(values: &[f64]) -> Self {
        Self {
            count: values.len(),
            min: min(values),
            mean: mean(values),
            std: sample_std(values),
            max: max(values),
        }
    }
}

/// Scott's rule bandwidth for a gaussian kernel, `None` for constant samples
pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    // rounding in the mean leaves a tiny nonzero std for constant input
    if min(values)? == max(values)? {
        return None;
    }
    let std = sample_std(values)?;
    let h = std * (values.len() as f64).powf(-0.2);
    if h > 0.0 && h.is_finite() {
        Some(h)
    } else {
        None
    }
}

/// Gaussian kernel density estimate sampled on an even grid.
///
/// Returns `None` when the data has fewer than two points or no spread.
pub fn gaussian_kde(values: &[f64], points: usize) -> Option<Vec<(f64, f64)>> {
    let h = scott_bandwidth(values)?;
    let lo = min(values)? - KDE_CUT * h;
    let hi = max(values)? + KDE_CUT * h;
    let points = points.max(2);
    let step = (hi - lo) / (points - 1) as f64;
    let norm = 1.0 / (values.len() as f64 * h * (2.0 * PI).sqrt());

    let curve = (0..points)
        .map(|i| {
            let x = lo + step * i as f64;
            let density: f64 = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / h).powi(2)).exp())
                .sum();
            (x, density * norm)
        })
        .collect();
    Some(curve)
}

/// Outcome of a chi-squared test of independence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquaredResult {
    pub statistic: f64,
    pub p_value: f64,
    pub dof: usize,
}

/// Pearson chi-squared test of independence on a two-row contingency table.
///
/// Both rows must have the same length (one column per category). Yates'
/// continuity correction is applied when there is a single degree of freedom.
pub fn chi_squared_two_rows(first: &[f64], second: &[f64]) -> Result<ChiSquaredResult> {
    if first.len() != second.len() {
        return Err(AnalyzerError::DegenerateContingency(format!(
            "row lengths differ ({} vs {})",
            first.len(),
            second.len()
        )));
    }

    let rows = [first, second];
    let row_totals: Vec<f64> = rows.iter().map(|r| r.iter().sum()).collect();
    if row_totals.iter().any(|t| *t <= 0.0) {
        return Err(AnalyzerError::DegenerateContingency(
            "a row has no observations".to_string(),
        ));
    }
    let col_totals: Vec<f64> = (0..first.len()).map(|c| first[c] + second[c]).collect();
    if col_totals.iter().any(|t| *t <= 0.0) {
        return Err(AnalyzerError::DegenerateContingency(
            "a column has no observations".to_string(),
        ));
    }
    let grand_total: f64 = row_totals.iter().sum();

    let dof = first.len().saturating_sub(1);
    if dof == 0 {
        return Ok(ChiSquaredResult {
            statistic: 0.0,
            p_value: 1.0,
            dof,
        });
    }

    let mut statistic = 0.0;
    for (r, row) in rows.iter().enumerate() {
        for (c, observed) in row.iter().enumerate() {
            let expected = row_totals[r] * col_totals[c] / grand_total;
            let mut diff = observed - expected;
            if dof == 1 {
                diff = diff.signum() * (diff.abs() - 0.5).max(0.0);
            }
            statistic += diff * diff / expected;
        }
    }

    let p_value = if statistic <= 0.0 {
        1.0
    } else {
        let dist = ChiSquared::new(dof as f64).map_err(|e| AnalyzerError::Stats(e.to_string()))?;
        dist.sf(statistic)
    };

    Ok(ChiSquaredResult {
        statistic,
        p_value,
        dof,
    })
}
