//! Model diagnostics over the held-out evaluation split.
//!
//! [`EvaluationReport::compute`] re-runs the fitted pipeline on every split
//! row and aggregates the results into summary metrics, an actual-vs-predicted
//! scatter and an error histogram.

mod histogram;
mod report;

pub use histogram::{histogram, HistogramBin};
pub use report::{
    DiagnosticsError, EvaluationReport, EvaluationRow, ScatterData, ScatterPoint, ERROR_HISTOGRAM_BINS,
};
