//! Averaging ensemble of regression trees.

use ndarray::{Array1, ArrayView2};

use super::tree::{Tree, TreeValidationError};
use crate::utils::Parallelism;

/// Structural validation errors for [`Forest`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ForestValidationError {
    #[error("forest has no trees")]
    Empty,
    #[error("tree {tree_idx} splits on feature {feature}, but the forest has {n_features} features")]
    FeatureOutOfRange {
        tree_idx: usize,
        feature: u32,
        n_features: usize,
    },
    #[error("tree {tree_idx}: {error}")]
    InvalidTree {
        tree_idx: usize,
        error: TreeValidationError,
    },
}

/// Random forest regressor: prediction is the mean of all tree outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Forest {
    trees: Vec<Tree>,
    n_features: usize,
}

impl Forest {
    pub fn new(trees: Vec<Tree>, n_features: usize) -> Self {
        Self { trees, n_features }
    }

    #[inline]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Width of the feature rows this forest expects.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn tree(&self, idx: usize) -> &Tree {
        &self.trees[idx]
    }

    pub fn trees(&self) -> impl Iterator<Item = &Tree> {
        self.trees.iter()
    }

    /// Total node count across trees.
    pub fn n_nodes(&self) -> usize {
        self.trees.iter().map(Tree::n_nodes).sum()
    }

    /// Validate every tree and every split feature index.
    pub fn validate(&self) -> Result<(), ForestValidationError> {
        if self.trees.is_empty() {
            return Err(ForestValidationError::Empty);
        }
        for (tree_idx, tree) in self.trees.iter().enumerate() {
            tree.validate()
                .map_err(|error| ForestValidationError::InvalidTree { tree_idx, error })?;
            if let Some(feature) = tree.max_split_index() {
                if feature as usize >= self.n_features {
                    return Err(ForestValidationError::FeatureOutOfRange {
                        tree_idx,
                        feature,
                        n_features: self.n_features,
                    });
                }
            }
        }
        Ok(())
    }

    /// Predict a single row.
    ///
    /// # Panics
    ///
    /// Panics if `features` is shorter than [`n_features`](Self::n_features).
    pub fn predict_row(&self, features: &[f64]) -> f64 {
        assert!(features.len() >= self.n_features, "feature row too short");
        let sum: f64 = self.trees.iter().map(|t| t.predict_row(features)).sum();
        sum / self.trees.len() as f64
    }

    /// Predict every row of a sample-major matrix `[n_samples, n_features]`.
    pub fn predict(&self, features: ArrayView2<f64>, parallelism: Parallelism) -> Array1<f64> {
        let rows: Vec<usize> = (0..features.nrows()).collect();
        let preds = parallelism.maybe_par_map(rows, |i| {
            let row = features.row(i);
            match row.as_slice() {
                Some(slice) => self.predict_row(slice),
                None => self.predict_row(&row.to_vec()),
            }
        });
        Array1::from_vec(preds)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    use super::*;
    use crate::repr::MutableTree;

    fn stump(feature: u32, threshold: f64, left: f64, right: f64) -> Tree {
        let mut t = MutableTree::default();
        let root = t.push_leaf(0.0);
        let l = t.push_leaf(left);
        let r = t.push_leaf(right);
        t.make_split(root, feature, threshold, l, r);
        t.freeze()
    }

    #[test]
    fn prediction_is_tree_mean() {
        let forest = Forest::new(vec![stump(0, 0.0, 1.0, 3.0), stump(1, 0.0, 10.0, 20.0)], 2);
        assert_abs_diff_eq!(forest.predict_row(&[-1.0, 1.0]), 10.5);
        assert_abs_diff_eq!(forest.predict_row(&[1.0, -1.0]), 6.5);

        let x = array![[-1.0, 1.0], [1.0, -1.0]];
        let seq = forest.predict(x.view(), Parallelism::Sequential);
        let par = forest.predict(x.view(), Parallelism::Parallel);
        assert_eq!(seq, par);
        assert_abs_diff_eq!(seq[1], 6.5);
    }

    #[test]
    fn validate_checks_feature_range() {
        assert_eq!(Forest::new(vec![], 1).validate(), Err(ForestValidationError::Empty));

        let forest = Forest::new(vec![Tree::constant(1.0), stump(3, 0.0, 1.0, 2.0)], 2);
        assert!(matches!(
            forest.validate(),
            Err(ForestValidationError::FeatureOutOfRange { tree_idx: 1, feature: 3, .. })
        ));
        assert!(Forest::new(vec![stump(1, 0.0, 1.0, 2.0)], 2).validate().is_ok());
    }
}
