//! Dataset file I/O.
//!
//! CSV files are parsed with the Arrow CSV reader into `RecordBatch`es and
//! then converted into a typed [`SalaryTable`](crate::data::SalaryTable).

pub mod csv;

mod error;
mod record_batches;

pub use csv::{load_csv, save_csv, write_csv};
pub use error::DatasetLoadError;
pub use record_batches::LoadedTable;
