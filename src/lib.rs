//! salary-forest: random-forest salary regression.
//!
//! The crate has two halves that share artifacts on disk:
//!
//! - **Training** ([`job::TrainingJob`]): load a CSV dataset, hold out a seeded
//!   evaluation split, fit one-hot encoding, standard scaling and a random
//!   forest, then persist the model and the split as JSON.
//! - **Serving** ([`service::PredictionService`], [`server`]): load both
//!   artifacts once, predict single records and report accuracy diagnostics
//!   over the held-out rows.
//!
//! # Example
//!
//! ```
//! use salary_forest::data::holdout;
//! use salary_forest::testing::{sample_record, synthetic_table};
//! use salary_forest::{SalaryModel, SalaryModelConfig};
//!
//! let (train, _split) = holdout(&synthetic_table(100, 7), 0.2, 42);
//! let config = SalaryModelConfig::builder().n_trees(10).build().unwrap();
//! let model = SalaryModel::train(&train, &config).unwrap();
//!
//! let salary = model.predict_record(&sample_record()).unwrap();
//! assert!(salary > 0.0);
//! ```

// Re-export approx traits for users who want to compare predictions
pub use approx;

pub mod data;
pub mod evaluation;
pub mod job;
pub mod model;
pub mod persist;
pub mod preprocess;
pub mod repr;
pub mod server;
pub mod service;
pub mod testing;
pub mod training;
pub mod utils;

pub use data::{EvaluationSplit, FeatureRecord, SalaryTable};
pub use evaluation::{DiagnosticsError, EvaluationReport};
pub use job::{JobError, TrainingJob, TrainingOutcome};
pub use model::{SalaryModel, SalaryModelConfig};
pub use preprocess::UnknownPolicy;
pub use service::{PredictError, Prediction, PredictionService};
pub use utils::{run_with_threads, Parallelism};
