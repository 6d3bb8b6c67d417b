//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use salary_forest::data::holdout;
use salary_forest::testing::{synthetic_table, write_dataset};
use salary_forest::{EvaluationSplit, PredictionService, SalaryModel, SalaryModelConfig, SalaryTable};

/// Small, fast configuration for tests.
pub fn quick_config() -> SalaryModelConfig {
    SalaryModelConfig::builder()
        .n_trees(8)
        .n_threads(1)
        .build()
        .expect("valid config")
}

/// Model trained on the synthetic table plus its evaluation split.
pub fn trained(rows: usize, seed: u64) -> (SalaryModel, EvaluationSplit) {
    let (train, split) = holdout(&synthetic_table(rows, seed), 0.2, 42);
    let model = SalaryModel::train(&train, &quick_config()).expect("training succeeds");
    (model, split)
}

pub fn service() -> PredictionService {
    let (model, split) = trained(120, 5);
    PredictionService::from_parts(model, split)
}

/// Write `table` as CSV into `dir` and return its path.
pub fn dataset_file(dir: &Path, table: &SalaryTable) -> PathBuf {
    let path = dir.join("salary_prediction_data.csv");
    write_dataset(table, &path).expect("dataset written");
    path
}
