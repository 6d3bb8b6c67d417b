//! Arrow `RecordBatch` conversion to and from [`SalaryTable`].

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use super::error::DatasetLoadError;
use crate::data::schema::{CategoricalColumn, NumericColumn, TARGET_COLUMN};
use crate::data::{FeatureRecord, SalaryTable};

/// Batches read from a source file, not yet converted to typed rows.
pub(super) struct LoadedBatches {
    batches: Vec<RecordBatch>,
}

/// Result of converting batches: complete rows plus the count of dropped ones.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: SalaryTable,
    /// Rows discarded because a required field was missing.
    pub dropped_rows: usize,
}

impl LoadedBatches {
    pub(super) fn new(batches: Vec<RecordBatch>) -> Self {
        Self { batches }
    }

    /// Convert to typed rows, dropping any row with a missing required value.
    pub(super) fn to_table(&self) -> Result<LoadedTable, DatasetLoadError> {
        let mut table = SalaryTable::default();
        let mut dropped_rows = 0;

        for batch in &self.batches {
            let categorical = CategoricalColumn::ALL
                .iter()
                .map(|c| string_column(batch, c.name()))
                .collect::<Result<Vec<_>, _>>()?;
            let numeric = NumericColumn::ALL
                .iter()
                .map(|c| float64_column(batch, c.name()))
                .collect::<Result<Vec<_>, _>>()?;
            let target = float64_column(batch, TARGET_COLUMN)?;

            for row in 0..batch.num_rows() {
                let labels: Option<Vec<&str>> =
                    categorical.iter().map(|col| present_str(col, row)).collect();
                let numbers: Option<Vec<f64>> =
                    numeric.iter().map(|col| present_f64(col, row)).collect();

                match (labels, numbers, present_f64(target, row)) {
                    (Some(labels), Some(numbers), Some(salary)) => {
                        table.push(record_from_parts(&labels, &numbers), salary);
                    }
                    _ => dropped_rows += 1,
                }
            }
        }

        Ok(LoadedTable {
            table,
            dropped_rows,
        })
    }
}

fn record_from_parts(labels: &[&str], numbers: &[f64]) -> FeatureRecord {
    // Order follows CategoricalColumn::ALL and NumericColumn::ALL.
    FeatureRecord {
        education: labels[0].to_owned(),
        location: labels[1].to_owned(),
        job_title: labels[2].to_owned(),
        gender: labels[3].to_owned(),
        experience: numbers[0],
        age: numbers[1],
    }
}

fn present_str(col: &StringArray, row: usize) -> Option<&str> {
    if col.is_null(row) {
        return None;
    }
    let value = col.value(row).trim();
    (!value.is_empty()).then_some(value)
}

fn present_f64(col: &Float64Array, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    let value = col.value(row);
    value.is_finite().then_some(value)
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray, DatasetLoadError> {
    let col = batch
        .column_by_name(name)
        .ok_or_else(|| DatasetLoadError::MissingColumn(name.into()))?;
    col.as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| DatasetLoadError::UnsupportedType {
            column: name.into(),
            expected: "Utf8".into(),
            got: format!("{:?}", col.data_type()),
        })
}

fn float64_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Float64Array, DatasetLoadError> {
    let col = batch
        .column_by_name(name)
        .ok_or_else(|| DatasetLoadError::MissingColumn(name.into()))?;
    col.as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| DatasetLoadError::UnsupportedType {
            column: name.into(),
            expected: "Float64".into(),
            got: format!("{:?}", col.data_type()),
        })
}

// =============================================================================
// Table -> RecordBatch
// =============================================================================

/// Schema with the required columns in CSV order.
pub(crate) fn salary_schema() -> Schema {
    Schema::new(vec![
        Field::new(CategoricalColumn::Education.name(), DataType::Utf8, true),
        Field::new(NumericColumn::Experience.name(), DataType::Float64, true),
        Field::new(CategoricalColumn::Location.name(), DataType::Utf8, true),
        Field::new(CategoricalColumn::JobTitle.name(), DataType::Utf8, true),
        Field::new(NumericColumn::Age.name(), DataType::Float64, true),
        Field::new(CategoricalColumn::Gender.name(), DataType::Utf8, true),
        Field::new(TARGET_COLUMN, DataType::Float64, true),
    ])
}

/// Convert a table into one batch using [`salary_schema`].
pub(crate) fn table_to_batch(table: &SalaryTable) -> Result<RecordBatch, DatasetLoadError> {
    let records = table.records();
    let strings = |col: CategoricalColumn| -> ArrayRef {
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.category(col)),
        ))
    };
    let floats = |col: NumericColumn| -> ArrayRef {
        Arc::new(Float64Array::from_iter_values(
            records.iter().map(|r| r.numeric(col)),
        ))
    };

    let columns: Vec<ArrayRef> = vec![
        strings(CategoricalColumn::Education),
        floats(NumericColumn::Experience),
        strings(CategoricalColumn::Location),
        strings(CategoricalColumn::JobTitle),
        floats(NumericColumn::Age),
        strings(CategoricalColumn::Gender),
        Arc::new(Float64Array::from(table.salaries().to_vec())),
    ];

    Ok(RecordBatch::try_new(Arc::new(salary_schema()), columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(education: Vec<Option<&str>>, salary: Vec<Option<f64>>) -> RecordBatch {
        let n = education.len();
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(education)),
            Arc::new(Float64Array::from(vec![Some(5.0); n])),
            Arc::new(StringArray::from(vec![Some("Urban"); n])),
            Arc::new(StringArray::from(vec![Some("Engineer"); n])),
            Arc::new(Float64Array::from(vec![Some(29.0); n])),
            Arc::new(StringArray::from(vec![Some("Male"); n])),
            Arc::new(Float64Array::from(salary)),
        ];
        RecordBatch::try_new(Arc::new(salary_schema()), columns).unwrap()
    }

    #[test]
    fn drops_rows_with_missing_values() {
        let b = batch(
            vec![Some("Bachelor"), None, Some(" "), Some("PhD")],
            vec![Some(1.0), Some(2.0), Some(3.0), None],
        );
        let loaded = LoadedBatches::new(vec![b]).to_table().unwrap();
        assert_eq!(loaded.table.len(), 1);
        assert_eq!(loaded.dropped_rows, 3);
        assert_eq!(loaded.table.records()[0].education, "Bachelor");
    }

    #[test]
    fn trims_labels() {
        let b = batch(vec![Some(" Master ")], vec![Some(10.0)]);
        let loaded = LoadedBatches::new(vec![b]).to_table().unwrap();
        assert_eq!(loaded.table.records()[0].education, "Master");
    }

    #[test]
    fn table_batch_round_trip() {
        let b = batch(vec![Some("Bachelor"), Some("PhD")], vec![Some(1.0), Some(2.0)]);
        let table = LoadedBatches::new(vec![b]).to_table().unwrap().table;
        let again = LoadedBatches::new(vec![table_to_batch(&table).unwrap()])
            .to_table()
            .unwrap()
            .table;
        assert_eq!(table, again);
    }

    #[test]
    fn wrong_type_is_reported() {
        let schema = Schema::new(vec![Field::new("Education", DataType::Float64, true)]);
        let b = RecordBatch::try_new(
            Arc::new(schema),
            vec![Arc::new(Float64Array::from(vec![1.0])) as ArrayRef],
        )
        .unwrap();
        let err = LoadedBatches::new(vec![b]).to_table().unwrap_err();
        assert!(matches!(err, DatasetLoadError::UnsupportedType { .. }), "got: {err:?}");
    }
}
