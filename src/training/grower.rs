//! Depth-first growth of a single regression tree.

use ndarray::ArrayView2;
use rand::rngs::StdRng;

use super::params::ForestParams;
use super::sampling::sample_features;
use super::split::{find_best_split, SplitScratch};
use crate::repr::{MutableTree, NodeId, Tree};

/// Pending node: a range of the sample buffer and its depth.
struct NodeTask {
    node: NodeId,
    start: usize,
    end: usize,
    depth: u32,
}

/// Grows CART regression trees on a fixed training matrix.
pub struct TreeGrower<'a> {
    x: ArrayView2<'a, f64>,
    y: &'a [f64],
    params: &'a ForestParams,
    n_candidates: usize,
}

impl<'a> TreeGrower<'a> {
    /// `x` is sample-major `[n_samples, n_features]`, `y` has one target per sample.
    pub fn new(x: ArrayView2<'a, f64>, y: &'a [f64], params: &'a ForestParams) -> Self {
        debug_assert_eq!(x.nrows(), y.len());
        let n_candidates = params.max_features.resolve(x.ncols());
        Self {
            x,
            y,
            params,
            n_candidates,
        }
    }

    /// Grow one tree on `samples` (row indices, duplicates allowed).
    pub fn grow(&self, mut samples: Vec<u32>, rng: &mut StdRng) -> Tree {
        let mut tree = MutableTree::with_capacity(2 * samples.len().max(1));
        let mut scratch = SplitScratch::default();
        let mut buffer: Vec<u32> = Vec::with_capacity(samples.len());

        let root = tree.push_leaf(self.mean(&samples));
        let mut stack = vec![NodeTask {
            node: root,
            start: 0,
            end: samples.len(),
            depth: 0,
        }];

        while let Some(task) = stack.pop() {
            let node_samples = &samples[task.start..task.end];
            if !self.can_split(node_samples, task.depth) {
                continue;
            }

            let features = sample_features(self.x.ncols(), self.n_candidates, rng);
            let Some(split) = find_best_split(
                self.x,
                self.y,
                node_samples,
                &features,
                self.params.min_samples_leaf as usize,
                &mut scratch,
            ) else {
                continue;
            };

            let mid = self.partition(
                &mut samples[task.start..task.end],
                split.feature,
                split.threshold,
                &mut buffer,
            );
            debug_assert_eq!(mid, split.n_left);
            let mid = task.start + mid;

            let left = tree.push_leaf(self.mean(&samples[task.start..mid]));
            let right = tree.push_leaf(self.mean(&samples[mid..task.end]));
            tree.make_split(task.node, split.feature as u32, split.threshold, left, right);

            stack.push(NodeTask {
                node: right,
                start: mid,
                end: task.end,
                depth: task.depth + 1,
            });
            stack.push(NodeTask {
                node: left,
                start: task.start,
                end: mid,
                depth: task.depth + 1,
            });
        }

        tree.freeze()
    }

    fn can_split(&self, samples: &[u32], depth: u32) -> bool {
        if samples.len() < self.params.min_samples_split as usize {
            return false;
        }
        if self.params.max_depth.is_some_and(|max| depth >= max) {
            return false;
        }
        let first = self.y[samples[0] as usize];
        samples.iter().any(|&i| self.y[i as usize] != first)
    }

    fn mean(&self, samples: &[u32]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().map(|&i| self.y[i as usize]).sum::<f64>() / samples.len() as f64
    }

    /// Stable partition: rows with `x[feature] <= threshold` first. Returns the left count.
    fn partition(&self, samples: &mut [u32], feature: usize, threshold: f64, buffer: &mut Vec<u32>) -> usize {
        buffer.clear();
        let mut n_left = 0;
        for i in 0..samples.len() {
            let s = samples[i];
            if self.x[[s as usize, feature]] <= threshold {
                samples[n_left] = s;
                n_left += 1;
            } else {
                buffer.push(s);
            }
        }
        samples[n_left..].copy_from_slice(buffer);
        n_left
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2};
    use rand::SeedableRng;

    use super::*;
    use crate::training::sampling::all_indices;

    fn params() -> ForestParams {
        ForestParams {
            n_trees: 1,
            bootstrap: false,
            ..Default::default()
        }
    }

    #[test]
    fn fully_grown_tree_fits_training_data() {
        let x = array![[0.0, 1.0], [1.0, 0.0], [2.0, 1.0], [3.0, 0.0], [4.0, 1.0]];
        let y = [1.0, 2.0, 3.0, 4.0, 5.0];
        let p = params();
        let grower = TreeGrower::new(x.view(), &y, &p);
        let tree = grower.grow(all_indices(5), &mut StdRng::seed_from_u64(0));
        assert!(tree.validate().is_ok());
        assert_eq!(tree.n_leaves(), 5);
        for (row, &target) in x.rows().into_iter().zip(&y) {
            assert_abs_diff_eq!(tree.predict_row(row.as_slice().unwrap()), target);
        }
    }

    #[test]
    fn max_depth_limits_growth() {
        let x = Array2::from_shape_fn((16, 1), |(i, _)| i as f64);
        let y: Vec<f64> = (0..16).map(|i| i as f64).collect();
        let p = ForestParams {
            max_depth: Some(2),
            ..params()
        };
        let tree = TreeGrower::new(x.view(), &y, &p).grow(all_indices(16), &mut StdRng::seed_from_u64(0));
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.n_leaves(), 4);
    }

    #[test]
    fn min_samples_leaf_is_respected() {
        let x = Array2::from_shape_fn((10, 1), |(i, _)| i as f64);
        let y: Vec<f64> = (0..10).map(|i| (i * i) as f64).collect();
        let p = ForestParams {
            min_samples_leaf: 3,
            ..params()
        };
        let grower = TreeGrower::new(x.view(), &y, &p);
        let tree = grower.grow(all_indices(10), &mut StdRng::seed_from_u64(0));
        // Count samples landing in each leaf.
        let mut counts = std::collections::HashMap::new();
        for row in x.rows() {
            *counts.entry(tree.traverse_to_leaf(row.as_slice().unwrap())).or_insert(0) += 1;
        }
        assert!(counts.values().all(|&c| c >= 3), "{counts:?}");
    }

    #[test]
    fn constant_target_is_single_leaf() {
        let x = array![[0.0], [1.0], [2.0]];
        let y = [7.0, 7.0, 7.0];
        let p = params();
        let tree = TreeGrower::new(x.view(), &y, &p).grow(all_indices(3), &mut StdRng::seed_from_u64(0));
        assert_eq!(tree.n_nodes(), 1);
        assert_abs_diff_eq!(tree.predict_row(&[5.0]), 7.0);
    }
}
