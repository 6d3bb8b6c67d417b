//! Per-row predictions over the evaluation split, with aggregates.

use serde::Serialize;

use super::histogram::{histogram, HistogramBin};
use crate::data::{EvaluationSplit, FeatureRecord};
use crate::model::SalaryModel;
use crate::preprocess::TransformError;
use crate::training::RegressionSummary;

/// Number of bins in the error histogram.
pub const ERROR_HISTOGRAM_BINS: usize = 30;

/// Errors from computing an [`EvaluationReport`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DiagnosticsError {
    #[error("evaluation split is empty")]
    EmptySplit,

    #[error("failed to transform evaluation row {row}: {source}")]
    Transform {
        row: usize,
        #[source]
        source: TransformError,
    },

    #[error("evaluation row {row} has non-positive salary {actual}")]
    NonPositiveTarget { row: usize, actual: f64 },
}

/// One evaluated row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationRow {
    #[serde(flatten)]
    pub record: FeatureRecord,
    pub actual: f64,
    pub predicted: f64,
    /// `predicted - actual`.
    pub error: f64,
    /// `|error| / actual * 100`.
    pub error_pct: f64,
}

impl EvaluationRow {
    fn new(record: FeatureRecord, actual: f64, predicted: f64) -> Self {
        let error = predicted - actual;
        Self {
            record,
            actual,
            predicted,
            error,
            error_pct: error.abs() / actual * 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub actual: f64,
    pub predicted: f64,
}

/// Actual-vs-predicted points plus the identity reference line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterData {
    pub points: Vec<ScatterPoint>,
    /// Endpoints of `y = x` from the smallest to the largest actual value.
    pub identity: [ScatterPoint; 2],
}

impl ScatterData {
    fn from_rows(rows: &[EvaluationRow]) -> Self {
        let (lo, hi) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
            (lo.min(r.actual), hi.max(r.actual))
        });
        Self {
            points: rows
                .iter()
                .map(|r| ScatterPoint {
                    actual: r.actual,
                    predicted: r.predicted,
                })
                .collect(),
            identity: [
                ScatterPoint {
                    actual: lo,
                    predicted: lo,
                },
                ScatterPoint {
                    actual: hi,
                    predicted: hi,
                },
            ],
        }
    }
}

/// Accuracy diagnostics for a model over its evaluation split.
///
/// Computing a report is pure: the model and split are only read, and the
/// same inputs always give the same report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub summary: RegressionSummary,
    pub scatter: ScatterData,
    pub histogram: Vec<HistogramBin>,
    pub rows: Vec<EvaluationRow>,
}

impl EvaluationReport {
    /// Predict every split row and aggregate the results.
    pub fn compute(model: &SalaryModel, split: &EvaluationSplit) -> Result<Self, DiagnosticsError> {
        if split.table.is_empty() {
            return Err(DiagnosticsError::EmptySplit);
        }

        let mut rows = Vec::with_capacity(split.table.len());
        for (row, (record, actual)) in split.table.rows().enumerate() {
            if actual <= 0.0 {
                return Err(DiagnosticsError::NonPositiveTarget { row, actual });
            }
            let predicted = model
                .predict_record(record)
                .map_err(|source| DiagnosticsError::Transform { row, source })?;
            rows.push(EvaluationRow::new(record.clone(), actual, predicted));
        }

        let predicted: Vec<f64> = rows.iter().map(|r| r.predicted).collect();
        let errors: Vec<f64> = rows.iter().map(|r| r.error).collect();

        Ok(Self {
            summary: RegressionSummary::compute(&predicted, split.table.salaries()),
            scatter: ScatterData::from_rows(&rows),
            histogram: histogram(&errors, ERROR_HISTOGRAM_BINS),
            rows,
        })
    }

    /// Copy of the report keeping only the first `limit` rows.
    ///
    /// Summary, scatter and histogram still cover the whole split.
    pub fn truncated(&self, limit: usize) -> Self {
        Self {
            rows: self.rows.iter().take(limit).cloned().collect(),
            ..self.clone()
        }
    }
}
