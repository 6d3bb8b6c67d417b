//! One-hot encoding of categorical columns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::{CategoricalColumn, FeatureRecord};

// =============================================================================
// UnknownPolicy
// =============================================================================

/// What to do with a label that was not seen during fitting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownPolicy {
    /// Encode the whole block as zeros.
    #[default]
    Ignore,
    /// Fail the transform with [`TransformError::UnknownCategory`].
    Error,
}

impl UnknownPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for UnknownPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnknownPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown policy '{other}', expected 'ignore' or 'error'")),
        }
    }
}

// =============================================================================
// TransformError
// =============================================================================

/// Errors from applying a fitted preprocessor.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransformError {
    #[error("unknown category '{value}' for column {column}")]
    UnknownCategory {
        column: CategoricalColumn,
        value: String,
    },
}

// =============================================================================
// OneHotEncoder
// =============================================================================

/// Fitted vocabulary for one categorical column.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBlock {
    column: CategoricalColumn,
    /// Sorted, distinct.
    categories: Vec<String>,
}

impl CategoryBlock {
    /// Build a block, sorting and de-duplicating `categories`.
    pub fn new(column: CategoricalColumn, mut categories: Vec<String>) -> Self {
        categories.sort();
        categories.dedup();
        Self { column, categories }
    }

    pub fn column(&self) -> CategoricalColumn {
        self.column
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Slot of `label` within this block.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.categories
            .binary_search_by(|c| c.as_str().cmp(label))
            .ok()
    }
}

/// One-hot encoder over every [`CategoricalColumn`], in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct OneHotEncoder {
    blocks: Vec<CategoryBlock>,
    unknown_policy: UnknownPolicy,
}

impl OneHotEncoder {
    /// Fit vocabularies from `records`.
    pub fn fit(records: &[FeatureRecord], unknown_policy: UnknownPolicy) -> Self {
        let blocks = CategoricalColumn::ALL
            .into_iter()
            .map(|column| {
                let labels = records
                    .iter()
                    .map(|r| r.category(column).trim().to_owned())
                    .collect();
                CategoryBlock::new(column, labels)
            })
            .collect();
        Self {
            blocks,
            unknown_policy,
        }
    }

    /// Rebuild from already fitted blocks.
    pub fn from_blocks(blocks: Vec<CategoryBlock>, unknown_policy: UnknownPolicy) -> Self {
        Self {
            blocks,
            unknown_policy,
        }
    }

    pub fn blocks(&self) -> &[CategoryBlock] {
        &self.blocks
    }

    pub fn unknown_policy(&self) -> UnknownPolicy {
        self.unknown_policy
    }

    pub fn set_unknown_policy(&mut self, policy: UnknownPolicy) {
        self.unknown_policy = policy;
    }

    /// Total number of one-hot slots.
    pub fn n_outputs(&self) -> usize {
        self.blocks.iter().map(|b| b.categories.len()).sum()
    }

    /// Slot names as `Column=label`.
    pub fn feature_names(&self) -> Vec<String> {
        self.blocks
            .iter()
            .flat_map(|b| {
                b.categories
                    .iter()
                    .map(move |c| format!("{}={}", b.column.name(), c))
            })
            .collect()
    }

    /// Write the encoding of `record` into `out` (length [`n_outputs`](Self::n_outputs)).
    ///
    /// Labels are matched after trimming surrounding whitespace, the same
    /// normalization the dataset loader applies.
    pub fn encode_into(&self, record: &FeatureRecord, out: &mut [f64]) -> Result<(), TransformError> {
        debug_assert_eq!(out.len(), self.n_outputs());
        out.fill(0.0);

        let mut offset = 0;
        for block in &self.blocks {
            let label = record.category(block.column).trim();
            match block.position(label) {
                Some(pos) => out[offset + pos] = 1.0,
                None if self.unknown_policy == UnknownPolicy::Ignore => {}
                None => {
                    return Err(TransformError::UnknownCategory {
                        column: block.column,
                        value: label.to_owned(),
                    });
                }
            }
            offset += block.categories.len();
        }
        Ok(())
    }
}
