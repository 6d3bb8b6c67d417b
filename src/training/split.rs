//! Exhaustive squared-error split search.
//!
//! For each candidate feature the node's samples are sorted by value and every
//! boundary between distinct values is scored. The score of a split is the
//! reduction in sum of squared errors:
//!
//! `gain = S_L² / n_L + S_R² / n_R - S² / n`
//!
//! where `S` is a target sum and `n` a sample count.

use ndarray::ArrayView2;

/// Best split found for a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitCandidate {
    pub feature: usize,
    /// Samples with `value <= threshold` go left.
    pub threshold: f64,
    pub gain: f64,
    pub n_left: usize,
}

/// Reusable buffer for `(value, target)` pairs.
#[derive(Debug, Default)]
pub struct SplitScratch {
    pairs: Vec<(f64, f64)>,
}

/// Find the best threshold split for `samples` over `features`.
///
/// Returns `None` when no split leaves at least `min_samples_leaf` samples on
/// both sides, or no split reduces the squared error.
pub fn find_best_split(
    x: ArrayView2<f64>,
    y: &[f64],
    samples: &[u32],
    features: &[usize],
    min_samples_leaf: usize,
    scratch: &mut SplitScratch,
) -> Option<SplitCandidate> {
    let n = samples.len();
    let min_leaf = min_samples_leaf.max(1);
    if n < 2 * min_leaf {
        return None;
    }

    let total: f64 = samples.iter().map(|&i| y[i as usize]).sum();
    let parent_score = total * total / n as f64;
    let mut best: Option<SplitCandidate> = None;

    for &feature in features {
        let pairs = &mut scratch.pairs;
        pairs.clear();
        pairs.extend(samples.iter().map(|&i| (x[[i as usize, feature]], y[i as usize])));
        pairs.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

        if pairs[0].0 == pairs[n - 1].0 {
            continue;
        }

        let mut left_sum = 0.0;
        for split_at in 1..n {
            left_sum += pairs[split_at - 1].1;
            let (lo, hi) = (pairs[split_at - 1].0, pairs[split_at].0);
            if lo == hi || split_at < min_leaf || n - split_at < min_leaf {
                continue;
            }

            let n_left = split_at as f64;
            let n_right = (n - split_at) as f64;
            let right_sum = total - left_sum;
            let gain = left_sum * left_sum / n_left + right_sum * right_sum / n_right - parent_score;

            if best.map_or(true, |b| gain > b.gain) {
                best = Some(SplitCandidate {
                    feature,
                    threshold: midpoint(lo, hi),
                    gain,
                    n_left: split_at,
                });
            }
        }
    }

    best.filter(|b| b.gain > 0.0)
}

/// Threshold between two adjacent distinct values that keeps `lo` on the left
/// and `hi` on the right.
fn midpoint(lo: f64, hi: f64) -> f64 {
    let mid = lo + (hi - lo) / 2.0;
    if mid >= hi {
        lo
    } else {
        mid
    }
}
