//! Equal-width histograms.

use serde::{Deserialize, Serialize};

/// One histogram bin covering `[lower, upper)` (the last bin is closed).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Bin `values` into `n_bins` equal-width bins spanning their range.
///
/// When every value is equal the single value sits in the middle of a
/// unit-wide range. Non-finite values are skipped. Returns no bins for empty
/// input or `n_bins == 0`.
pub fn histogram(values: &[f64], n_bins: usize) -> Vec<HistogramBin> {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.clone().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if n_bins == 0 || min > max {
        return Vec::new();
    }
    let (min, max) = if min == max { (min - 0.5, max + 0.5) } else { (min, max) };
    let width = (max - min) / n_bins as f64;

    let mut bins: Vec<HistogramBin> = (0..n_bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == n_bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for v in finite {
        let idx = (((v - min) / width).floor() as usize).min(n_bins - 1);
        bins[idx].count += 1;
    }
    bins
}
