//! Offline training job: dataset in, model and evaluation split out.
//!
//! The job runs once and either writes both artifacts or fails. Both
//! artifacts come from the same split, so they are always written together.

use std::fmt;
use std::path::PathBuf;

use crate::data::{holdout, load_csv, DatasetLoadError};
use crate::evaluation::EvaluationReport;
use crate::model::{SalaryModel, SalaryModelConfig, TrainError};
use crate::persist::{commit_all, StagedFile, WriteError};
use crate::training::RegressionSummary;

/// Errors from running a [`TrainingJob`].
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("failed to load dataset {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: DatasetLoadError,
    },

    #[error("training partition is empty ({rows} rows loaded, test fraction {test_fraction})")]
    EmptyTrainingPartition { rows: usize, test_fraction: f64 },

    #[error(transparent)]
    Train(#[from] TrainError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: WriteError,
    },

    #[error("failed to replace artifacts: {0}")]
    Commit(#[source] WriteError),
}

/// Paths and configuration for one training run.
#[derive(Debug, Clone)]
pub struct TrainingJob {
    pub data_path: PathBuf,
    pub model_path: PathBuf,
    pub split_path: PathBuf,
    pub config: SalaryModelConfig,
}

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingOutcome {
    pub loaded_rows: usize,
    pub dropped_rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    /// Holdout metrics; `None` when the split could not be scored.
    pub holdout: Option<RegressionSummary>,
}

impl fmt::Display for TrainingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "trained on {} rows, held out {} ({} dropped for missing values)",
            self.train_rows, self.test_rows, self.dropped_rows
        )?;
        if let Some(summary) = &self.holdout {
            write!(f, "; holdout {summary}")?;
        }
        Ok(())
    }
}

impl TrainingJob {
    pub fn new(
        data_path: impl Into<PathBuf>,
        model_path: impl Into<PathBuf>,
        split_path: impl Into<PathBuf>,
        config: SalaryModelConfig,
    ) -> Self {
        Self {
            data_path: data_path.into(),
            model_path: model_path.into(),
            split_path: split_path.into(),
            config,
        }
    }

    /// Load, split, fit, score and persist.
    pub fn run(&self) -> Result<TrainingOutcome, JobError> {
        let loaded = load_csv(&self.data_path).map_err(|source| JobError::Load {
            path: self.data_path.clone(),
            source,
        })?;
        let dataset = loaded.table;
        log::info!(
            "loaded {} rows from {}",
            dataset.len(),
            self.data_path.display()
        );
        if loaded.dropped_rows > 0 {
            log::warn!("dropped {} rows with missing values", loaded.dropped_rows);
        }

        let (train, split) = holdout(&dataset, self.config.test_fraction, self.config.seed);
        log::info!(
            "split: {} training rows, {} evaluation rows (seed {})",
            train.len(),
            split.table.len(),
            self.config.seed
        );
        if train.is_empty() {
            return Err(JobError::EmptyTrainingPartition {
                rows: dataset.len(),
                test_fraction: self.config.test_fraction,
            });
        }

        let model = SalaryModel::train(&train, &self.config)?;

        let summary = if split.table.is_empty() {
            None
        } else {
            match EvaluationReport::compute(&model, &split) {
                Ok(report) => {
                    log::info!("holdout: {}", report.summary);
                    Some(report.summary)
                }
                Err(e) => {
                    log::warn!("could not score evaluation split: {e}");
                    None
                }
            }
        };

        // Both files are staged before either target is touched.
        let staged_model =
            StagedFile::create(&self.model_path, |w| model.write_json(w)).map_err(|source| JobError::Write {
                path: self.model_path.clone(),
                source,
            })?;
        let staged_split =
            StagedFile::create(&self.split_path, |w| split.write_json(w)).map_err(|source| JobError::Write {
                path: self.split_path.clone(),
                source,
            })?;
        commit_all(vec![staged_model, staged_split]).map_err(JobError::Commit)?;
        log::info!(
            "saved model to {} and evaluation split to {}",
            self.model_path.display(),
            self.split_path.display()
        );

        Ok(TrainingOutcome {
            loaded_rows: dataset.len(),
            dropped_rows: loaded.dropped_rows,
            train_rows: train.len(),
            test_rows: split.table.len(),
            holdout: summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::EvaluationSplit;
    use crate::testing::{synthetic_table, write_dataset};

    #[test]
    fn writes_both_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("salaries.csv");
        write_dataset(&synthetic_table(60, 8), &data).unwrap();

        let config = SalaryModelConfig::builder().n_trees(5).n_threads(1).build().unwrap();
        let job = TrainingJob::new(
            &data,
            dir.path().join("model.json"),
            dir.path().join("test_data.json"),
            config,
        );
        let outcome = job.run().unwrap();
        assert_eq!(outcome.loaded_rows, 60);
        assert_eq!(outcome.test_rows, 12);
        assert_eq!(outcome.train_rows, 48);
        assert!(outcome.holdout.is_some());

        let model = SalaryModel::load_json(&job.model_path).unwrap();
        assert_eq!(model.meta().n_train_rows, 48);
        let split = EvaluationSplit::load_json(&job.split_path).unwrap();
        assert_eq!(split.table.len(), 12);
    }

    #[test]
    fn missing_dataset_fails() {
        let dir = tempfile::tempdir().unwrap();
        let job = TrainingJob::new(
            dir.path().join("absent.csv"),
            dir.path().join("model.json"),
            dir.path().join("test_data.json"),
            SalaryModelConfig::default(),
        );
        assert!(matches!(job.run(), Err(JobError::Load { .. })));
        assert!(!job.model_path.exists());
    }

    #[test]
    fn failed_split_write_keeps_previous_model() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("salaries.csv");
        write_dataset(&synthetic_table(40, 3), &data).unwrap();
        let model_path = dir.path().join("model.json");
        std::fs::write(&model_path, "previous model").unwrap();
        let split_path = dir.path().join("test_data.json");
        std::fs::create_dir(&split_path).unwrap();

        let config = SalaryModelConfig::builder().n_trees(3).n_threads(1).build().unwrap();
        let job = TrainingJob::new(&data, &model_path, &split_path, config);
        assert!(matches!(job.run(), Err(JobError::Commit(_))));

        assert_eq!(std::fs::read_to_string(&model_path).unwrap(), "previous model");
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .filter(|name| name.ends_with(".tmp") || name.ends_with(".bak"))
            .collect();
        assert!(leftovers.is_empty(), "{leftovers:?}");
    }

    #[test]
    fn failed_split_write_leaves_no_new_model() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("salaries.csv");
        write_dataset(&synthetic_table(40, 3), &data).unwrap();
        let split_path = dir.path().join("test_data.json");
        std::fs::create_dir(&split_path).unwrap();

        let config = SalaryModelConfig::builder().n_trees(3).n_threads(1).build().unwrap();
        let job = TrainingJob::new(&data, dir.path().join("model.json"), &split_path, config);
        assert!(job.run().is_err());
        assert!(!job.model_path.exists());
    }
}
