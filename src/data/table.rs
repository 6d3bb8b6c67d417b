//! In-memory salary table: feature records plus targets.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::record::FeatureRecord;
use super::schema::{CategoricalColumn, NumericColumn};

/// Cleaned dataset rows with their salary targets.
///
/// `records[i]` pairs with `salaries[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryTable {
    records: Vec<FeatureRecord>,
    salaries: Vec<f64>,
}

impl SalaryTable {
    /// Build a table from parallel vectors.
    ///
    /// # Panics
    ///
    /// Panics if the lengths differ.
    pub fn new(records: Vec<FeatureRecord>, salaries: Vec<f64>) -> Self {
        assert_eq!(
            records.len(),
            salaries.len(),
            "records and salaries must have equal length"
        );
        Self { records, salaries }
    }

    /// Append one row.
    pub fn push(&mut self, record: FeatureRecord, salary: f64) {
        self.records.push(record);
        self.salaries.push(salary);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[FeatureRecord] {
        &self.records
    }

    pub fn salaries(&self) -> &[f64] {
        &self.salaries
    }

    /// Iterate `(record, salary)` pairs.
    pub fn rows(&self) -> impl Iterator<Item = (&FeatureRecord, f64)> {
        self.records.iter().zip(self.salaries.iter().copied())
    }

    /// New table containing the given row indices, in the given order.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            records: indices.iter().map(|&i| self.records[i].clone()).collect(),
            salaries: indices.iter().map(|&i| self.salaries[i]).collect(),
        }
    }

    /// Sorted distinct labels of a categorical column.
    pub fn vocabulary(&self, column: CategoricalColumn) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.category(column))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// Arithmetic mean of a numeric column, `None` when empty.
    pub fn mean(&self, column: NumericColumn) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }
        let sum: f64 = self.records.iter().map(|r| r.numeric(column)).sum();
        Some(sum / self.records.len() as f64)
    }

    pub fn into_parts(self) -> (Vec<FeatureRecord>, Vec<f64>) {
        (self.records, self.salaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(education: &str, experience: f64) -> FeatureRecord {
        FeatureRecord {
            education: education.into(),
            experience,
            location: "Urban".into(),
            job_title: "Engineer".into(),
            age: 30.0,
            gender: "Male".into(),
        }
    }

    #[test]
    fn vocabulary_is_sorted_and_unique() {
        let table = SalaryTable::new(
            vec![rec("PhD", 1.0), rec("Bachelor", 2.0), rec("PhD", 3.0), rec("Master", 4.0)],
            vec![1.0, 2.0, 3.0, 4.0],
        );
        assert_eq!(
            table.vocabulary(CategoricalColumn::Education),
            ["Bachelor", "Master", "PhD"]
        );
    }

    #[test]
    fn select_keeps_pairs_together() {
        let table = SalaryTable::new(
            vec![rec("A", 1.0), rec("B", 2.0), rec("C", 3.0)],
            vec![10.0, 20.0, 30.0],
        );
        let sub = table.select(&[2, 0]);
        assert_eq!(sub.salaries(), &[30.0, 10.0]);
        assert_eq!(sub.records()[0].education, "C");
        assert_eq!(sub.mean(NumericColumn::Experience), Some(2.0));
    }

    #[test]
    fn empty_mean_is_none() {
        assert_eq!(SalaryTable::default().mean(NumericColumn::Age), None);
    }
}
