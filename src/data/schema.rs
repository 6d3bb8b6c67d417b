//! Column contract for the salary dataset.
//!
//! The dataset has four categorical feature columns, two numeric feature
//! columns and one numeric target. Column names match the CSV header exactly.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Name of the target column.
pub const TARGET_COLUMN: &str = "Salary";

/// Accepted years of experience for a prediction request.
pub const EXPERIENCE_RANGE: RangeInclusive<f64> = 0.0..=50.0;

/// Accepted age for a prediction request.
pub const AGE_RANGE: RangeInclusive<f64> = 18.0..=80.0;

// =============================================================================
// CategoricalColumn
// =============================================================================

/// Unordered label columns, one-hot encoded before training.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CategoricalColumn {
    #[serde(rename = "Education")]
    Education,
    #[serde(rename = "Location")]
    Location,
    #[serde(rename = "Job_Title")]
    JobTitle,
    #[serde(rename = "Gender")]
    Gender,
}

impl CategoricalColumn {
    /// All categorical columns in encoding order.
    pub const ALL: [CategoricalColumn; 4] = [
        CategoricalColumn::Education,
        CategoricalColumn::Location,
        CategoricalColumn::JobTitle,
        CategoricalColumn::Gender,
    ];

    /// CSV header name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Education => "Education",
            Self::Location => "Location",
            Self::JobTitle => "Job_Title",
            Self::Gender => "Gender",
        }
    }

    /// Look up a column by its CSV header name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for CategoricalColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// NumericColumn
// =============================================================================

/// Continuous feature columns, standardized before training.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NumericColumn {
    #[serde(rename = "Experience")]
    Experience,
    #[serde(rename = "Age")]
    Age,
}

impl NumericColumn {
    /// All numeric columns in encoding order.
    pub const ALL: [NumericColumn; 2] = [NumericColumn::Experience, NumericColumn::Age];

    /// CSV header name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Experience => "Experience",
            Self::Age => "Age",
        }
    }

    /// Look up a column by its CSV header name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Inclusive range accepted from prediction requests.
    pub fn input_range(self) -> RangeInclusive<f64> {
        match self {
            Self::Experience => EXPERIENCE_RANGE,
            Self::Age => AGE_RANGE,
        }
    }
}

impl fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every column a source CSV must provide, target last.
pub fn required_columns() -> impl Iterator<Item = &'static str> {
    CategoricalColumn::ALL
        .into_iter()
        .map(CategoricalColumn::name)
        .chain(NumericColumn::ALL.into_iter().map(NumericColumn::name))
        .chain(std::iter::once(TARGET_COLUMN))
}

/// Returns true if `name` is a numeric column (feature or target).
pub fn is_numeric_column(name: &str) -> bool {
    name == TARGET_COLUMN || NumericColumn::from_name(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for col in CategoricalColumn::ALL {
            assert_eq!(CategoricalColumn::from_name(col.name()), Some(col));
        }
        for col in NumericColumn::ALL {
            assert_eq!(NumericColumn::from_name(col.name()), Some(col));
        }
        assert_eq!(CategoricalColumn::from_name("Salary"), None);
    }

    #[test]
    fn required_columns_are_complete() {
        let cols: Vec<_> = required_columns().collect();
        assert_eq!(
            cols,
            ["Education", "Location", "Job_Title", "Gender", "Experience", "Age", "Salary"]
        );
    }

    #[test]
    fn serde_uses_header_names() {
        let json = serde_json::to_string(&CategoricalColumn::JobTitle).unwrap();
        assert_eq!(json, r#""Job_Title""#);
        let parsed: NumericColumn = serde_json::from_str(r#""Age""#).unwrap();
        assert_eq!(parsed, NumericColumn::Age);
    }
}
