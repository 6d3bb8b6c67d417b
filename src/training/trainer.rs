//! Random forest trainer.

use ndarray::ArrayView2;

use super::grower::TreeGrower;
use super::params::ForestParams;
use super::sampling::{all_indices, bootstrap_indices, tree_rng};
use crate::repr::Forest;
use crate::utils::Parallelism;

/// Errors from fitting a forest on a feature matrix.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FitError {
    #[error("training set is empty")]
    EmptyTrainingSet,
    #[error("feature matrix has {rows} rows but {targets} targets were given")]
    ShapeMismatch { rows: usize, targets: usize },
    #[error("feature matrix has no columns")]
    NoFeatures,
    #[error("target at row {row} is not finite")]
    NonFiniteTarget { row: usize },
}

/// Fits a [`Forest`] from a sample-major matrix.
///
/// Tree `t` draws its bootstrap sample and feature candidates from an RNG
/// seeded by `(params.seed, t)`, so the result is the same for any
/// [`Parallelism`].
#[derive(Debug, Clone)]
pub struct ForestTrainer {
    params: ForestParams,
}

impl ForestTrainer {
    pub fn new(params: ForestParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    /// Train on `x` (`[n_samples, n_features]`) and `y`.
    pub fn train(&self, x: ArrayView2<f64>, y: &[f64], parallelism: Parallelism) -> Result<Forest, FitError> {
        let (n_rows, n_features) = x.dim();
        if n_rows != y.len() {
            return Err(FitError::ShapeMismatch {
                rows: n_rows,
                targets: y.len(),
            });
        }
        if n_rows == 0 {
            return Err(FitError::EmptyTrainingSet);
        }
        if n_features == 0 {
            return Err(FitError::NoFeatures);
        }
        if let Some(row) = y.iter().position(|v| !v.is_finite()) {
            return Err(FitError::NonFiniteTarget { row });
        }

        let grower = TreeGrower::new(x.view(), y, &self.params);
        let tree_ids: Vec<usize> = (0..self.params.n_trees as usize).collect();
        let trees = parallelism.maybe_par_map(tree_ids, |t| {
            let mut rng = tree_rng(self.params.seed, t);
            let samples = if self.params.bootstrap {
                bootstrap_indices(n_rows, &mut rng)
            } else {
                all_indices(n_rows)
            };
            grower.grow(samples, &mut rng)
        });

        let forest = Forest::new(trees, n_features);
        log::debug!(
            "grew {} trees ({} nodes) on {} rows x {} features",
            forest.n_trees(),
            forest.n_nodes(),
            n_rows,
            n_features
        );
        Ok(forest)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::Array2;

    use super::*;
    use crate::testing::DEFAULT_TOLERANCE_F64;
    use crate::utils::run_with_threads;

    fn data() -> (Array2<f64>, Vec<f64>) {
        let x = Array2::from_shape_fn((60, 3), |(i, j)| ((i * (j + 3)) % 17) as f64);
        let y = x.rows().into_iter().map(|r| 2.0 * r[0] - r[1] + 0.5 * r[2]).collect();
        (x, y)
    }

    #[test]
    fn same_forest_for_any_thread_count() {
        let (x, y) = data();
        let trainer = ForestTrainer::new(ForestParams {
            n_trees: 8,
            ..Default::default()
        });
        let seq = run_with_threads(1, |p| trainer.train(x.view(), &y, p)).unwrap();
        let par = run_with_threads(4, |p| trainer.train(x.view(), &y, p)).unwrap();
        assert_eq!(seq, par);
        assert_eq!(seq.n_trees(), 8);
        assert!(seq.validate().is_ok());
    }

    #[test]
    fn different_seeds_differ() {
        let (x, y) = data();
        let a = ForestTrainer::new(ForestParams { n_trees: 4, seed: 1, ..Default::default() })
            .train(x.view(), &y, Parallelism::Sequential)
            .unwrap();
        let b = ForestTrainer::new(ForestParams { n_trees: 4, seed: 2, ..Default::default() })
            .train(x.view(), &y, Parallelism::Sequential)
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn without_bootstrap_fits_training_rows() {
        let (x, y) = data();
        let forest = ForestTrainer::new(ForestParams {
            n_trees: 2,
            bootstrap: false,
            ..Default::default()
        })
        .train(x.view(), &y, Parallelism::Sequential)
        .unwrap();
        let preds = forest.predict(x.view(), Parallelism::Sequential);
        for (p, t) in preds.iter().zip(&y) {
            assert_abs_diff_eq!(*p, *t, epsilon = DEFAULT_TOLERANCE_F64);
        }
    }

    #[test]
    fn trains_on_a_borrowed_row_range() {
        let (x, y) = data();
        let trainer = ForestTrainer::new(ForestParams {
            n_trees: 3,
            ..Default::default()
        });
        let forest = {
            let head = x.slice(ndarray::s![..30, ..]);
            trainer.train(head, &y[..30], Parallelism::Sequential).unwrap()
        };
        assert_eq!(forest.n_trees(), 3);
        assert_eq!(forest.predict(x.view(), Parallelism::Sequential).len(), 60);
    }

    #[test]
    fn rejects_bad_input() {
        let trainer = ForestTrainer::new(ForestParams::default());
        let x = Array2::<f64>::zeros((3, 2));
        assert_eq!(
            trainer.train(x.view(), &[1.0, 2.0], Parallelism::Sequential),
            Err(FitError::ShapeMismatch { rows: 3, targets: 2 })
        );
        assert_eq!(
            trainer.train(Array2::zeros((0, 2)).view(), &[], Parallelism::Sequential),
            Err(FitError::EmptyTrainingSet)
        );
        assert_eq!(
            trainer.train(x.view(), &[1.0, f64::NAN, 2.0], Parallelism::Sequential),
            Err(FitError::NonFiniteTarget { row: 1 })
        );
    }
}
