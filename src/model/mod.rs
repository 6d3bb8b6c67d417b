//! High-level salary model API.
//!
//! - [`SalaryModelConfig`]: validated training configuration (`bon` builder)
//! - [`SalaryModel`]: fitted preprocessing + forest, with train/predict
//! - [`ModelMeta`]: training context recorded with the model

mod config;
mod meta;
mod salary;

pub use config::{ConfigError, SalaryModelConfig};
pub use meta::ModelMeta;
pub use salary::{SalaryModel, TrainError};
