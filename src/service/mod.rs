//! Prediction service: a loaded model and evaluation split shared read-only
//! by every request.
//!
//! A [`PredictionService`] is built once at startup and never mutated, so it
//! can sit behind an `Arc` without locks.

mod format;
mod options;

use std::path::{Path, PathBuf};

use serde::Serialize;

pub use format::{format_currency, format_currency_whole, CURRENCY_SYMBOL};
pub use options::{FormOptions, NumericField};

use crate::data::{EvaluationSplit, FeatureRecord, RecordError};
use crate::evaluation::{DiagnosticsError, EvaluationReport};
use crate::model::SalaryModel;
use crate::persist::ReadError;
use crate::preprocess::{TransformError, UnknownPolicy};

/// Errors from loading the service artifacts.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to load model from {path}: {source}")]
    Model {
        path: PathBuf,
        #[source]
        source: ReadError,
    },

    #[error("failed to load evaluation split from {path}: {source}")]
    Split {
        path: PathBuf,
        #[source]
        source: ReadError,
    },
}

/// Errors from a single prediction request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictError {
    #[error("invalid input: {0}")]
    Invalid(#[from] RecordError),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// A predicted salary with its display form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub salary: f64,
    pub formatted: String,
}

impl Prediction {
    fn new(salary: f64) -> Self {
        Self {
            salary,
            formatted: format_currency(salary),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PredictionService {
    model: SalaryModel,
    split: EvaluationSplit,
    options: FormOptions,
}

impl PredictionService {
    /// Build a service from already loaded artifacts.
    pub fn from_parts(model: SalaryModel, split: EvaluationSplit) -> Self {
        let options = FormOptions::from_table(&split.table);
        Self {
            model,
            split,
            options,
        }
    }

    /// Load both artifacts, optionally overriding the model's unknown-category
    /// policy.
    pub fn load(
        model_path: impl AsRef<Path>,
        split_path: impl AsRef<Path>,
        policy: Option<UnknownPolicy>,
    ) -> Result<Self, LoadError> {
        let model_path = model_path.as_ref();
        let split_path = split_path.as_ref();

        let mut model = SalaryModel::load_json(model_path).map_err(|source| LoadError::Model {
            path: model_path.to_path_buf(),
            source,
        })?;
        if let Some(policy) = policy {
            model = model.with_unknown_policy(policy);
        }
        let split = EvaluationSplit::load_json(split_path).map_err(|source| LoadError::Split {
            path: split_path.to_path_buf(),
            source,
        })?;

        log::info!(
            "loaded model ({} trees, {} features, unknown categories: {}) and {} evaluation rows",
            model.forest().n_trees(),
            model.forest().n_features(),
            model.unknown_policy(),
            split.table.len()
        );
        Ok(Self::from_parts(model, split))
    }

    pub fn model(&self) -> &SalaryModel {
        &self.model
    }

    pub fn split(&self) -> &EvaluationSplit {
        &self.split
    }

    pub fn form_options(&self) -> &FormOptions {
        &self.options
    }

    /// Validate one record and predict its salary.
    pub fn predict(&self, record: &FeatureRecord) -> Result<Prediction, PredictError> {
        record.validate()?;
        let salary = self.model.predict_record(record)?;
        Ok(Prediction::new(salary))
    }

    /// Evaluate the model over the stored split.
    pub fn evaluation(&self) -> Result<EvaluationReport, DiagnosticsError> {
        EvaluationReport::compute(&self.model, &self.split)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{holdout, CategoricalColumn, NumericColumn};
    use crate::model::SalaryModelConfig;
    use crate::testing::{sample_record, synthetic_table};

    fn service() -> PredictionService {
        let (train, split) = holdout(&synthetic_table(80, 21), 0.2, 42);
        let config = SalaryModelConfig::builder().n_trees(6).n_threads(1).build().unwrap();
        PredictionService::from_parts(SalaryModel::train(&train, &config).unwrap(), split)
    }

    #[test]
    fn predicts_and_formats() {
        let service = service();
        let prediction = service.predict(&sample_record()).unwrap();
        assert!(prediction.salary > 0.0);
        assert_eq!(prediction.formatted, format_currency(prediction.salary));
        assert_eq!(service.predict(&sample_record()).unwrap(), prediction);
    }

    #[test]
    fn rejects_invalid_input() {
        let service = service();
        let mut record = sample_record();
        record.age = 17.0;
        assert!(matches!(
            service.predict(&record),
            Err(PredictError::Invalid(RecordError::OutOfRange {
                column: NumericColumn::Age,
                ..
            }))
        ));

        let mut record = sample_record();
        record.gender = "  ".into();
        assert_eq!(
            service.predict(&record),
            Err(PredictError::Invalid(RecordError::EmptyCategory(CategoricalColumn::Gender)))
        );
    }

    #[test]
    fn load_reports_missing_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let err = PredictionService::load(dir.path().join("m.json"), dir.path().join("t.json"), None)
            .unwrap_err();
        assert!(matches!(err, LoadError::Model { .. }));

        let service = service();
        let model_path = dir.path().join("model.json");
        service.model().save_json(&model_path).unwrap();
        let err = PredictionService::load(&model_path, dir.path().join("t.json"), None).unwrap_err();
        assert!(matches!(err, LoadError::Split { .. }));
    }

    #[test]
    fn load_applies_policy_override() {
        let dir = tempfile::tempdir().unwrap();
        let service = service();
        let (model_path, split_path) = (dir.path().join("model.json"), dir.path().join("test.json"));
        service.model().save_json(&model_path).unwrap();
        service.split().save_json(&split_path).unwrap();

        let loaded = PredictionService::load(&model_path, &split_path, Some(UnknownPolicy::Error)).unwrap();
        assert_eq!(loaded.model().unknown_policy(), UnknownPolicy::Error);
        assert_eq!(loaded.form_options(), service.form_options());
    }
}
