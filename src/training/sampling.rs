//! Row and feature sampling for bagging.
//!
//! Every tree owns an RNG derived from `(seed, tree_idx)`, so the samples a
//! tree sees do not depend on which thread builds it.

use rand::prelude::*;
use rand::seq::index;

/// Golden-ratio increment used to spread per-tree seeds.
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Deterministic RNG for one tree.
pub fn tree_rng(seed: u64, tree_idx: usize) -> StdRng {
    StdRng::seed_from_u64(seed.wrapping_add((tree_idx as u64 + 1).wrapping_mul(SEED_STRIDE)))
}

/// `n_rows` row indices drawn uniformly with replacement.
pub fn bootstrap_indices(n_rows: usize, rng: &mut impl Rng) -> Vec<u32> {
    (0..n_rows)
        .map(|_| rng.random_range(0..n_rows) as u32)
        .collect()
}

/// All row indices in order.
pub fn all_indices(n_rows: usize) -> Vec<u32> {
    (0..n_rows as u32).collect()
}

/// Feature candidates for one split: `k` distinct indices out of `n_features`.
///
/// When `k >= n_features` the full range is returned in order.
pub fn sample_features(n_features: usize, k: usize, rng: &mut impl Rng) -> Vec<usize> {
    if k >= n_features {
        return (0..n_features).collect();
    }
    let mut picked = index::sample(rng, n_features, k).into_vec();
    picked.sort_unstable();
    picked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_rngs_are_reproducible_and_distinct() {
        let a: Vec<u32> = bootstrap_indices(20, &mut tree_rng(42, 0));
        let b: Vec<u32> = bootstrap_indices(20, &mut tree_rng(42, 0));
        let c: Vec<u32> = bootstrap_indices(20, &mut tree_rng(42, 1));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.iter().all(|&i| i < 20));
    }

    #[test]
    fn feature_sample_is_distinct_and_sorted() {
        let mut rng = tree_rng(1, 0);
        let picked = sample_features(10, 4, &mut rng);
        assert_eq!(picked.len(), 4);
        assert!(picked.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(sample_features(3, 5, &mut rng), [0, 1, 2]);
    }
}
