//! Salary model: fitted preprocessing plus random forest.

use ndarray::Array1;

use super::config::SalaryModelConfig;
use super::meta::ModelMeta;
use crate::data::{FeatureRecord, SalaryTable};
use crate::preprocess::{EmptyFitError, Preprocessor, TransformError, UnknownPolicy};
use crate::repr::Forest;
use crate::training::{FitError, ForestTrainer};
use crate::utils::{run_with_threads, Parallelism};

/// Errors from fitting a [`SalaryModel`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrainError {
    #[error(transparent)]
    Preprocess(#[from] EmptyFitError),
    #[error("failed to transform training rows: {0}")]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Fit(#[from] FitError),
}

/// Trained salary regressor.
///
/// Owns the fitted [`Preprocessor`] and [`Forest`]. Immutable after training
/// except for the unknown-category policy, which may be overridden when the
/// model is loaded for serving.
#[derive(Debug, Clone, PartialEq)]
pub struct SalaryModel {
    preprocessor: Preprocessor,
    forest: Forest,
    meta: ModelMeta,
}

impl SalaryModel {
    /// Assemble a model from fitted parts.
    pub fn from_parts(preprocessor: Preprocessor, forest: Forest, meta: ModelMeta) -> Self {
        Self {
            preprocessor,
            forest,
            meta,
        }
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn meta(&self) -> &ModelMeta {
        &self.meta
    }

    pub fn unknown_policy(&self) -> UnknownPolicy {
        self.preprocessor.unknown_policy()
    }

    /// Replace the unknown-category policy.
    pub fn with_unknown_policy(mut self, policy: UnknownPolicy) -> Self {
        self.preprocessor = self.preprocessor.with_unknown_policy(policy);
        self
    }

    // =========================================================================
    // Training
    // =========================================================================

    /// Fit preprocessing and the forest on a training partition.
    ///
    /// Uses `config.n_threads`: 0 = auto, 1 = sequential, >1 = exact count.
    pub fn train(train: &SalaryTable, config: &SalaryModelConfig) -> Result<Self, TrainError> {
        run_with_threads(config.n_threads, |parallelism| {
            Self::train_inner(train, config, parallelism)
        })
    }

    fn train_inner(
        train: &SalaryTable,
        config: &SalaryModelConfig,
        parallelism: Parallelism,
    ) -> Result<Self, TrainError> {
        let preprocessor = Preprocessor::fit(train.records(), config.unknown_policy)?;
        let x = preprocessor.transform(train.records())?;
        log::info!(
            "fitted preprocessing: {} rows -> {} features",
            train.len(),
            preprocessor.n_features()
        );

        let params = config.forest_params();
        let forest = ForestTrainer::new(params.clone()).train(x.view(), train.salaries(), parallelism)?;
        log::info!(
            "trained forest: {} trees, {} nodes",
            forest.n_trees(),
            forest.n_nodes()
        );

        let meta = ModelMeta::new(preprocessor.feature_names(), train.len(), params);
        Ok(Self {
            preprocessor,
            forest,
            meta,
        })
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    /// Predict the salary for one record.
    pub fn predict_record(&self, record: &FeatureRecord) -> Result<f64, TransformError> {
        let row = self.preprocessor.transform_record(record)?;
        Ok(match row.as_slice() {
            Some(slice) => self.forest.predict_row(slice),
            None => self.forest.predict_row(&row.to_vec()),
        })
    }

    /// Predict salaries for many records.
    ///
    /// `n_threads`: 0 = auto, 1 = sequential, >1 = exact count.
    pub fn predict(&self, records: &[FeatureRecord], n_threads: usize) -> Result<Array1<f64>, TransformError> {
        let x = self.preprocessor.transform(records)?;
        Ok(run_with_threads(n_threads, |parallelism| {
            self.forest.predict(x.view(), parallelism)
        }))
    }
}
