//! Typed feature records.

use serde::{Deserialize, Serialize};

use super::schema::{CategoricalColumn, NumericColumn};

/// One employee's features, without the salary target.
///
/// Field names serialize to the CSV header names. Snake-case aliases are
/// accepted when deserializing so JSON clients can use either spelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    #[serde(rename = "Education", alias = "education")]
    pub education: String,
    #[serde(rename = "Experience", alias = "experience")]
    pub experience: f64,
    #[serde(rename = "Location", alias = "location")]
    pub location: String,
    #[serde(rename = "Job_Title", alias = "job_title")]
    pub job_title: String,
    #[serde(rename = "Age", alias = "age")]
    pub age: f64,
    #[serde(rename = "Gender", alias = "gender")]
    pub gender: String,
}

/// A request field that failed validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("{column} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        column: NumericColumn,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{0} must not be empty")]
    EmptyCategory(CategoricalColumn),
}

impl FeatureRecord {
    /// Label stored for a categorical column.
    pub fn category(&self, column: CategoricalColumn) -> &str {
        match column {
            CategoricalColumn::Education => &self.education,
            CategoricalColumn::Location => &self.location,
            CategoricalColumn::JobTitle => &self.job_title,
            CategoricalColumn::Gender => &self.gender,
        }
    }

    /// Value stored for a numeric column.
    pub fn numeric(&self, column: NumericColumn) -> f64 {
        match column {
            NumericColumn::Experience => self.experience,
            NumericColumn::Age => self.age,
        }
    }

    /// Check that a user-supplied record is inside the accepted input domain.
    ///
    /// Categories must be non-blank and numerics finite and inside
    /// [`NumericColumn::input_range`]. Training data is not range-checked.
    pub fn validate(&self) -> Result<(), RecordError> {
        for column in CategoricalColumn::ALL {
            if self.category(column).trim().is_empty() {
                return Err(RecordError::EmptyCategory(column));
            }
        }
        for column in NumericColumn::ALL {
            let value = self.numeric(column);
            let range = column.input_range();
            if !value.is_finite() || !range.contains(&value) {
                return Err(RecordError::OutOfRange {
                    column,
                    value,
                    min: *range.start(),
                    max: *range.end(),
                });
            }
        }
        Ok(())
    }
}
