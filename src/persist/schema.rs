//! Schema types for artifact serialization.
//!
//! These types provide a stable JSON format independent of runtime types.
//! Runtime types are rebuilt from them through validated `TryFrom`
//! conversions, so a hand-edited or truncated artifact fails to load instead
//! of producing a broken model.

use serde::{Deserialize, Serialize};

use crate::data::{CategoricalColumn, FeatureRecord, NumericColumn};
use crate::preprocess::UnknownPolicy;
use crate::training::MaxFeatures;

/// Format tag written into every artifact envelope.
pub const FORMAT_NAME: &str = "salary-forest";

/// Current artifact schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Kind of payload carried by an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Model,
    EvaluationSplit,
}

/// Versioned wrapper around a payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub format: String,
    pub version: u32,
    pub kind: ArtifactKind,
    pub payload: T,
}

// =============================================================================
// Model
// =============================================================================

/// Forest hyperparameters as recorded in the artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestParamsSchema {
    pub n_trees: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,
    pub min_samples_split: u32,
    pub min_samples_leaf: u32,
    pub max_features: MaxFeatures,
    pub bootstrap: bool,
    pub seed: u64,
}

/// Model metadata schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetaSchema {
    pub feature_names: Vec<String>,
    pub n_train_rows: usize,
    pub params: ForestParamsSchema,
    pub crate_version: String,
}

/// Fitted vocabulary of one categorical column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryBlockSchema {
    pub column: CategoricalColumn,
    pub categories: Vec<String>,
}

/// Fitted standardization of one numeric column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericScalingSchema {
    pub column: NumericColumn,
    pub mean: f64,
    pub scale: f64,
}

/// Preprocessor schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessorSchema {
    pub unknown_policy: UnknownPolicy,
    pub categorical: Vec<CategoryBlockSchema>,
    pub numeric: Vec<NumericScalingSchema>,
}

/// Tree schema (SoA layout).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSchema {
    /// Number of nodes (internal + leaves).
    pub num_nodes: u32,
    /// Split feature index for each node (unused for leaves).
    pub split_indices: Vec<u32>,
    /// Split threshold for each node (unused for leaves).
    pub thresholds: Vec<f64>,
    /// Left child index for each node (0 = leaf).
    pub children_left: Vec<u32>,
    /// Right child index for each node (0 = leaf).
    pub children_right: Vec<u32>,
    /// Prediction for each node (meaningful for leaves).
    pub leaf_values: Vec<f64>,
}

/// Forest schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestSchema {
    pub n_features: usize,
    pub trees: Vec<TreeSchema>,
}

/// Complete salary model schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryModelSchema {
    pub meta: ModelMetaSchema,
    pub preprocessor: PreprocessorSchema,
    pub forest: ForestSchema,
}

// =============================================================================
// Evaluation split
// =============================================================================

/// One held-out row: the untransformed features plus the salary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRowSchema {
    #[serde(flatten)]
    pub record: FeatureRecord,
    #[serde(rename = "Salary")]
    pub salary: f64,
}

/// Evaluation split schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationSplitSchema {
    pub seed: u64,
    pub test_fraction: f64,
    pub rows: Vec<EvaluationRowSchema>,
}
