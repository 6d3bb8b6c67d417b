//! Seeded train/test partitioning.

use rand::prelude::*;

use super::table::SalaryTable;

/// Deterministic train/test split indices.
///
/// Shuffles `0..rows` with a seeded RNG and takes the first
/// `round(rows * test_fraction)` indices as the test partition.
///
/// Returns `(train_idx, test_idx)`.
///
/// # Panics
///
/// Panics if `test_fraction` is outside `[0, 1)`.
pub fn split_indices(rows: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    assert!((0.0..1.0).contains(&test_fraction));
    let mut idx: Vec<usize> = (0..rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    idx.shuffle(&mut rng);

    let test_len = test_len(rows, test_fraction);
    let (test, train) = idx.split_at(test_len);
    (train.to_vec(), test.to_vec())
}

/// Number of rows held out for a given fraction.
pub fn test_len(rows: usize, test_fraction: f64) -> usize {
    (((rows as f64) * test_fraction).round() as usize).min(rows)
}

/// Split a table into `(train, test)` partitions.
pub fn train_test_split(table: &SalaryTable, test_fraction: f64, seed: u64) -> (SalaryTable, SalaryTable) {
    let (train_idx, test_idx) = split_indices(table.len(), test_fraction, seed);
    (table.select(&train_idx), table.select(&test_idx))
}

/// Held-out rows kept untransformed for diagnostics, with the split settings
/// that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationSplit {
    pub table: SalaryTable,
    pub seed: u64,
    pub test_fraction: f64,
}

/// Split `table` into a training partition and an [`EvaluationSplit`].
pub fn holdout(table: &SalaryTable, test_fraction: f64, seed: u64) -> (SalaryTable, EvaluationSplit) {
    let (train, test) = train_test_split(table, test_fraction, seed);
    let split = EvaluationSplit {
        table: test,
        seed,
        test_fraction,
    };
    (train, split)
}
