//! Random forest training.
//!
//! This module provides the pieces used to fit a [`Forest`](crate::repr::Forest):
//!
//! - [`ForestParams`]: tree count, depth and sampling hyperparameters
//! - [`ForestTrainer`]: bags trees over a sample-major feature matrix
//! - [`TreeGrower`]: depth-first CART growth with squared-error splits
//!
//! ## Metrics
//!
//! - [`Rmse`]: Root mean squared error
//! - [`Mae`]: Mean absolute error
//! - [`Mape`]: Mean absolute percentage error
//! - [`R2`]: Coefficient of determination

pub mod metrics;
pub mod sampling;

mod grower;
mod params;
mod split;
mod trainer;

pub use grower::TreeGrower;
pub use metrics::{Mae, Mape, MetricFn, RegressionSummary, Rmse, R2};
pub use params::{ForestParams, MaxFeatures};
pub use split::{find_best_split, SplitCandidate, SplitScratch};
pub use trainer::{FitError, ForestTrainer};
