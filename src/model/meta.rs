//! Model metadata.
//!
//! Introspection data recorded when a model is trained.

use crate::training::ForestParams;

/// Training context stored alongside a fitted model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMeta {
    /// Names of the transformed feature columns, in matrix order.
    pub feature_names: Vec<String>,
    /// Rows in the training partition.
    pub n_train_rows: usize,
    /// Hyperparameters the forest was grown with.
    pub params: ForestParams,
    /// Version of this crate that produced the model.
    pub crate_version: String,
}

impl ModelMeta {
    pub fn new(feature_names: Vec<String>, n_train_rows: usize, params: ForestParams) -> Self {
        Self {
            feature_names,
            n_train_rows,
            params,
            crate_version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }
}
