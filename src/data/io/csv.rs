//! CSV dataset loader built on the Arrow CSV reader.
//!
//! # Supported files
//!
//! A header row naming at least the required columns (see
//! [`required_columns`](crate::data::schema::required_columns)). Numeric
//! columns are parsed as `Float64`, everything else as `Utf8`. Extra columns
//! are read as text and ignored. Empty cells are missing values.

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;
use std::sync::Arc;

use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use super::error::DatasetLoadError;
use super::record_batches::{table_to_batch, LoadedBatches, LoadedTable};
use crate::data::schema::{is_numeric_column, required_columns};
use crate::data::SalaryTable;

/// Rows sampled when reading the header.
const HEADER_SAMPLE_ROWS: usize = 1;

/// Rows per Arrow batch.
const BATCH_SIZE: usize = 8192;

// =============================================================================
// Public API
// =============================================================================

/// Load a salary CSV, dropping rows with missing required values.
pub fn load_csv(path: impl AsRef<Path>) -> Result<LoadedTable, DatasetLoadError> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    let schema = read_schema(&mut file)?;
    file.rewind()?;

    let reader = ReaderBuilder::new(Arc::new(schema))
        .with_header(true)
        .with_batch_size(BATCH_SIZE)
        .build(file)?;
    let batches = reader.collect::<Result<Vec<RecordBatch>, _>>()?;

    let loaded = LoadedBatches::new(batches).to_table()?;
    if loaded.table.is_empty() {
        return Err(DatasetLoadError::Empty {
            dropped: loaded.dropped_rows,
        });
    }
    log::debug!(
        "loaded {} rows from {} ({} dropped)",
        loaded.table.len(),
        path.display(),
        loaded.dropped_rows
    );
    Ok(loaded)
}

/// Write a table as CSV with the required columns in header order.
pub fn write_csv<W: Write>(table: &SalaryTable, writer: W) -> Result<(), DatasetLoadError> {
    let batch = table_to_batch(table)?;
    let mut writer = WriterBuilder::new().with_header(true).build(writer);
    writer.write(&batch)?;
    Ok(())
}

/// Write a table to a CSV file at `path`.
pub fn save_csv(table: &SalaryTable, path: impl AsRef<Path>) -> Result<(), DatasetLoadError> {
    let file = File::create(path)?;
    write_csv(table, file)
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Read the header and build the typed schema used for parsing.
fn read_schema(file: &mut File) -> Result<Schema, DatasetLoadError> {
    let (inferred, _) = Format::default()
        .with_header(true)
        .infer_schema(&mut *file, Some(HEADER_SAMPLE_ROWS))?;

    for name in required_columns() {
        if inferred.field_with_name(name).is_err() {
            return Err(DatasetLoadError::MissingColumn(name.into()));
        }
    }

    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|f| {
            let data_type = if is_numeric_column(f.name()) {
                DataType::Float64
            } else {
                DataType::Utf8
            };
            Field::new(f.name(), data_type, true)
        })
        .collect();
    Ok(Schema::new(fields))
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    fn write_tmp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_and_drops_incomplete_rows() {
        let file = write_tmp(
            "Education,Experience,Location,Job_Title,Age,Gender,Salary,Notes\n\
             Bachelor,5,Urban,Engineer,29,Male,600000,x\n\
             Master,,Rural,Analyst,35,Female,500000,\n\
             PhD,12.5,Suburban,Director,44,Female,,y\n\
             High School,1,Rural,Analyst,22,Male,250000,\n",
        );
        let loaded = load_csv(file.path()).unwrap();
        assert_eq!(loaded.table.len(), 2);
        assert_eq!(loaded.dropped_rows, 2);
        assert_eq!(loaded.table.records()[1].education, "High School");
        assert_eq!(loaded.table.salaries(), &[600000.0, 250000.0]);
    }

    #[test]
    fn missing_column_is_fatal() {
        let file = write_tmp("Education,Experience,Location,Age,Gender,Salary\nBachelor,5,Urban,29,Male,1\n");
        let err = load_csv(file.path()).unwrap_err();
        assert!(matches!(err, DatasetLoadError::MissingColumn(ref c) if c == "Job_Title"), "got: {err:?}");
    }

    #[test]
    fn unparsable_number_is_fatal() {
        let file = write_tmp(
            "Education,Experience,Location,Job_Title,Age,Gender,Salary\n\
             Bachelor,five,Urban,Engineer,29,Male,600000\n",
        );
        assert!(matches!(load_csv(file.path()), Err(DatasetLoadError::Arrow(_))));
    }

    #[test]
    fn all_rows_missing_is_empty() {
        let file = write_tmp(
            "Education,Experience,Location,Job_Title,Age,Gender,Salary\n\
             ,5,Urban,Engineer,29,Male,600000\n",
        );
        assert!(matches!(
            load_csv(file.path()),
            Err(DatasetLoadError::Empty { dropped: 1 })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            load_csv("/definitely/not/here.csv"),
            Err(DatasetLoadError::Io(_))
        ));
    }

    #[test]
    fn written_csv_loads_back() {
        let file = write_tmp(
            "Education,Experience,Location,Job_Title,Age,Gender,Salary\n\
             Bachelor,5,Urban,Engineer,29,Male,600000\n\
             PhD,20,Rural,Director,50,Female,1200000\n",
        );
        let table = load_csv(file.path()).unwrap().table;
        let out = tempfile::NamedTempFile::new().unwrap();
        save_csv(&table, out.path()).unwrap();
        assert_eq!(load_csv(out.path()).unwrap().table, table);
    }
}
