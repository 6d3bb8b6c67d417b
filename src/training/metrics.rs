//! Regression metrics.
//!
//! Metrics for evaluating regression model quality. All metrics take
//! predictions and targets of equal length and return `0.0` for empty input.

use serde::{Deserialize, Serialize};

/// A regression quality metric.
pub trait MetricFn: Send + Sync {
    /// Compute the metric value.
    fn compute(&self, predictions: &[f64], targets: &[f64]) -> f64;

    /// Name of the metric (for logging).
    fn name(&self) -> &'static str;
}

// =============================================================================
// RMSE (Root Mean Squared Error)
// =============================================================================

/// Root Mean Squared Error: sqrt(mean((pred - label)²))
#[derive(Debug, Clone, Copy, Default)]
pub struct Rmse;

impl MetricFn for Rmse {
    fn compute(&self, predictions: &[f64], targets: &[f64]) -> f64 {
        debug_assert_eq!(predictions.len(), targets.len());
        if targets.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = predictions
            .iter()
            .zip(targets)
            .map(|(&p, &l)| (p - l) * (p - l))
            .sum();
        (sum_sq / targets.len() as f64).sqrt()
    }

    fn name(&self) -> &'static str {
        "rmse"
    }
}

// =============================================================================
// MAE (Mean Absolute Error)
// =============================================================================

/// Mean Absolute Error: mean(|pred - label|)
#[derive(Debug, Clone, Copy, Default)]
pub struct Mae;

impl MetricFn for Mae {
    fn compute(&self, predictions: &[f64], targets: &[f64]) -> f64 {
        debug_assert_eq!(predictions.len(), targets.len());
        if targets.is_empty() {
            return 0.0;
        }
        let sum: f64 = predictions
            .iter()
            .zip(targets)
            .map(|(&p, &l)| (p - l).abs())
            .sum();
        sum / targets.len() as f64
    }

    fn name(&self) -> &'static str {
        "mae"
    }
}

// =============================================================================
// MAPE (Mean Absolute Percentage Error)
// =============================================================================

/// Mean Absolute Percentage Error: mean(|pred - label| / |label|) * 100
///
/// Rows with a zero label are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mape;

impl MetricFn for Mape {
    fn compute(&self, predictions: &[f64], targets: &[f64]) -> f64 {
        debug_assert_eq!(predictions.len(), targets.len());
        let (sum, count) = predictions
            .iter()
            .zip(targets)
            .filter(|&(_, &l)| l != 0.0)
            .fold((0.0f64, 0usize), |(s, c), (&p, &l)| {
                (s + ((p - l) / l).abs(), c + 1)
            });
        if count == 0 {
            0.0
        } else {
            sum / count as f64 * 100.0
        }
    }

    fn name(&self) -> &'static str {
        "mape"
    }
}

// =============================================================================
// R² (Coefficient of Determination)
// =============================================================================

/// Coefficient of determination: 1 - SS_res / SS_tot
///
/// Returns `0.0` when the targets are constant.
#[derive(Debug, Clone, Copy, Default)]
pub struct R2;

impl MetricFn for R2 {
    fn compute(&self, predictions: &[f64], targets: &[f64]) -> f64 {
        debug_assert_eq!(predictions.len(), targets.len());
        if targets.is_empty() {
            return 0.0;
        }
        let mean = targets.iter().sum::<f64>() / targets.len() as f64;
        let ss_tot: f64 = targets.iter().map(|&l| (l - mean) * (l - mean)).sum();
        if ss_tot == 0.0 {
            return 0.0;
        }
        let ss_res: f64 = predictions
            .iter()
            .zip(targets)
            .map(|(&p, &l)| (p - l) * (p - l))
            .sum();
        1.0 - ss_res / ss_tot
    }

    fn name(&self) -> &'static str {
        "r2"
    }
}

// =============================================================================
// RegressionSummary
// =============================================================================

/// All regression metrics for one set of predictions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionSummary {
    pub n_rows: usize,
    pub rmse: f64,
    pub mae: f64,
    pub mape: f64,
    pub r2: f64,
}

impl RegressionSummary {
    pub fn compute(predictions: &[f64], targets: &[f64]) -> Self {
        Self {
            n_rows: targets.len(),
            rmse: Rmse.compute(predictions, targets),
            mae: Mae.compute(predictions, targets),
            mape: Mape.compute(predictions, targets),
            r2: R2.compute(predictions, targets),
        }
    }
}

impl std::fmt::Display for RegressionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "rows={} {}={:.2} {}={:.2} {}={:.2}% {}={:.4}",
            self.n_rows,
            Rmse.name(),
            self.rmse,
            Mae.name(),
            self.mae,
            Mape.name(),
            self.mape,
            R2.name(),
            self.r2
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn perfect_predictions() {
        let y = [1.0, 2.0, 3.0];
        let s = RegressionSummary::compute(&y, &y);
        assert_eq!(s.n_rows, 3);
        assert_abs_diff_eq!(s.rmse, 0.0);
        assert_abs_diff_eq!(s.mae, 0.0);
        assert_abs_diff_eq!(s.mape, 0.0);
        assert_abs_diff_eq!(s.r2, 1.0);
    }

    #[test]
    fn known_values() {
        let preds = [110.0, 190.0, 300.0, 400.0];
        let targets = [100.0, 200.0, 300.0, 400.0];
        assert_abs_diff_eq!(Rmse.compute(&preds, &targets), (200.0f64 / 4.0).sqrt());
        assert_abs_diff_eq!(Mae.compute(&preds, &targets), 5.0);
        assert_abs_diff_eq!(Mape.compute(&preds, &targets), 3.75, epsilon = 1e-12);
        // SS_tot = 50000, SS_res = 200
        assert_abs_diff_eq!(R2.compute(&preds, &targets), 1.0 - 200.0 / 50000.0);
    }

    #[test]
    fn mape_skips_zero_targets() {
        assert_abs_diff_eq!(Mape.compute(&[1.0, 11.0], &[0.0, 10.0]), 10.0, epsilon = 1e-12);
        assert_eq!(Mape.compute(&[1.0], &[0.0]), 0.0);
    }

    #[test]
    fn summary_display_names_each_metric() {
        let s = RegressionSummary::compute(&[110.0, 190.0], &[100.0, 200.0]);
        assert_eq!(s.to_string(), "rows=2 rmse=10.00 mae=10.00 mape=7.50% r2=0.9600");
    }

    #[test]
    fn empty_is_zero() {
        let s = RegressionSummary::compute(&[], &[]);
        assert_eq!(s.rmse, 0.0);
        assert_eq!(s.r2, 0.0);
    }
}
