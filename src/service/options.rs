//! Choices and defaults offered by the prediction form.

use serde::{Deserialize, Serialize};

use crate::data::{CategoricalColumn, NumericColumn, SalaryTable};

/// Bounds and starting value of a numeric input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericField {
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl NumericField {
    /// Field for `column` defaulting to the truncated column mean of `table`.
    ///
    /// The default is clamped into the accepted input range, and falls back
    /// to the lower bound when the table is empty.
    pub fn from_table(table: &SalaryTable, column: NumericColumn) -> Self {
        let range = column.input_range();
        let (min, max) = (*range.start(), *range.end());
        let default = table
            .mean(column)
            .filter(|m| m.is_finite())
            .map_or(min, |m| m.trunc().clamp(min, max));
        Self { min, max, default }
    }
}

/// Everything the form needs to render its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormOptions {
    pub education: Vec<String>,
    pub experience: NumericField,
    pub location: Vec<String>,
    pub job_title: Vec<String>,
    pub age: NumericField,
    pub gender: Vec<String>,
}

impl FormOptions {
    /// Derive choices from the distinct values in `table`.
    pub fn from_table(table: &SalaryTable) -> Self {
        Self {
            education: table.vocabulary(CategoricalColumn::Education),
            experience: NumericField::from_table(table, NumericColumn::Experience),
            location: table.vocabulary(CategoricalColumn::Location),
            job_title: table.vocabulary(CategoricalColumn::JobTitle),
            age: NumericField::from_table(table, NumericColumn::Age),
            gender: table.vocabulary(CategoricalColumn::Gender),
        }
    }

    /// Choices for one categorical column.
    pub fn choices(&self, column: CategoricalColumn) -> &[String] {
        match column {
            CategoricalColumn::Education => &self.education,
            CategoricalColumn::Location => &self.location,
            CategoricalColumn::JobTitle => &self.job_title,
            CategoricalColumn::Gender => &self.gender,
        }
    }

    pub fn numeric(&self, column: NumericColumn) -> &NumericField {
        match column {
            NumericColumn::Experience => &self.experience,
            NumericColumn::Age => &self.age,
        }
    }
}
