//! Salary model configuration with builder pattern.
//!
//! [`SalaryModelConfig`] collects the random forest hyperparameters, the
//! holdout split settings and the unknown-category policy. It uses the `bon`
//! crate for builder generation with validation at build time.
//!
//! # Example
//!
//! ```
//! use salary_forest::model::SalaryModelConfig;
//! use salary_forest::preprocess::UnknownPolicy;
//!
//! // All defaults: 100 trees, seed 42, 20% holdout
//! let config = SalaryModelConfig::builder().build().unwrap();
//! assert_eq!(config.n_trees, 100);
//!
//! let config = SalaryModelConfig::builder()
//!     .n_trees(50)
//!     .max_depth(12)
//!     .unknown_policy(UnknownPolicy::Error)
//!     .build()
//!     .unwrap();
//! ```

use bon::Builder;

use crate::preprocess::UnknownPolicy;
use crate::training::{ForestParams, MaxFeatures};

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Number of trees must be at least 1.
    InvalidNTrees,
    /// Depth limit must be at least 1 when set.
    InvalidMaxDepth,
    /// A minimum sample count is below its floor.
    InvalidMinSamples { field: &'static str, value: u32, min: u32 },
    /// Feature fraction must be in (0, 1].
    InvalidMaxFeatures(f64),
    /// Holdout fraction must be in (0, 1).
    InvalidTestFraction(f64),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNTrees => write!(f, "n_trees must be at least 1"),
            Self::InvalidMaxDepth => write!(f, "max_depth must be at least 1"),
            Self::InvalidMinSamples { field, value, min } => {
                write!(f, "{} must be at least {}, got {}", field, min, value)
            }
            Self::InvalidMaxFeatures(v) => {
                write!(f, "max_features fraction must be in (0, 1], got {}", v)
            }
            Self::InvalidTestFraction(v) => {
                write!(f, "test_fraction must be in (0, 1), got {}", v)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// SalaryModelConfig
// =============================================================================

/// Configuration for training a salary model.
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct SalaryModelConfig {
    // === Forest ===
    /// Number of trees. Default: 100.
    #[builder(default = 100)]
    pub n_trees: u32,

    /// Maximum tree depth. `None` grows until leaves are pure.
    pub max_depth: Option<u32>,

    /// Minimum samples required to split a node. Default: 2.
    #[builder(default = 2)]
    pub min_samples_split: u32,

    /// Minimum samples in each leaf. Default: 1.
    #[builder(default = 1)]
    pub min_samples_leaf: u32,

    /// Features considered per split. Default: all.
    #[builder(default)]
    pub max_features: MaxFeatures,

    /// Bootstrap rows per tree. Default: true.
    #[builder(default = true)]
    pub bootstrap: bool,

    // === Holdout ===
    /// Fraction of rows held out for evaluation. Default: 0.2.
    #[builder(default = 0.2)]
    pub test_fraction: f64,

    // === Preprocessing ===
    /// Handling of categories unseen during fitting. Default: ignore.
    #[builder(default)]
    pub unknown_policy: UnknownPolicy,

    // === Reproducibility ===
    /// Random seed for the split and every tree. Default: 42.
    #[builder(default = 42)]
    pub seed: u64,

    // === Resource control ===
    /// Thread count: 0 = auto, 1 = sequential, >1 = exact count. Default: 0.
    #[builder(default = 0)]
    pub n_threads: usize,
}

/// Custom finishing function that validates the config.
impl<S: salary_model_config_builder::IsComplete> SalaryModelConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any parameter is invalid.
    pub fn build(self) -> Result<SalaryModelConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl Default for SalaryModelConfig {
    fn default() -> Self {
        Self::builder().__build_internal()
    }
}

impl SalaryModelConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_trees == 0 {
            return Err(ConfigError::InvalidNTrees);
        }
        if self.max_depth == Some(0) {
            return Err(ConfigError::InvalidMaxDepth);
        }
        if self.min_samples_split < 2 {
            return Err(ConfigError::InvalidMinSamples {
                field: "min_samples_split",
                value: self.min_samples_split,
                min: 2,
            });
        }
        if self.min_samples_leaf < 1 {
            return Err(ConfigError::InvalidMinSamples {
                field: "min_samples_leaf",
                value: self.min_samples_leaf,
                min: 1,
            });
        }
        if let MaxFeatures::Fraction(f) = self.max_features {
            if !(f > 0.0 && f <= 1.0) {
                return Err(ConfigError::InvalidMaxFeatures(f));
            }
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(ConfigError::InvalidTestFraction(self.test_fraction));
        }
        Ok(())
    }

    /// Forest hyperparameters for the trainer.
    pub fn forest_params(&self) -> ForestParams {
        ForestParams {
            n_trees: self.n_trees,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            max_features: self.max_features,
            bootstrap: self.bootstrap,
            seed: self.seed,
        }
    }
}
