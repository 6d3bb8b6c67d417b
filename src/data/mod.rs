//! Salary dataset: column contract, typed records, tables and I/O.
//!
//! # Overview
//!
//! - [`schema`]: the column names and kinds every source file must provide
//! - [`FeatureRecord`]: one employee's features (no target)
//! - [`SalaryTable`]: records paired with salary targets
//! - [`split`]: seeded train/test partitioning
//! - [`io`]: CSV loading through Arrow record batches
//!
//! Missing values are never imputed. Loading drops any row with a missing
//! required field.

pub mod io;
pub mod schema;
pub mod split;

mod record;
mod table;

pub use io::{load_csv, DatasetLoadError, LoadedTable};
pub use record::{FeatureRecord, RecordError};
pub use schema::{CategoricalColumn, NumericColumn, TARGET_COLUMN};
pub use split::{holdout, split_indices, train_test_split, EvaluationSplit};
pub use table::SalaryTable;
