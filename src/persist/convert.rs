//! Conversion between runtime types and schema types.
//!
//! Runtime -> schema conversions are lossless `From` impls. Schema -> runtime
//! conversions are `TryFrom` impls that validate every invariant the runtime
//! relies on and report failures as [`ReadError::Validation`].

use super::error::ReadError;
use super::schema::{
    CategoryBlockSchema, EvaluationRowSchema, EvaluationSplitSchema, ForestParamsSchema,
    ForestSchema, ModelMetaSchema, NumericScalingSchema, PreprocessorSchema, SalaryModelSchema,
    TreeSchema,
};
use crate::data::{CategoricalColumn, EvaluationSplit, NumericColumn, SalaryTable};
use crate::model::{ModelMeta, SalaryModel};
use crate::preprocess::{CategoryBlock, OneHotEncoder, Preprocessor, StandardScaler};
use crate::repr::{Forest, Tree};
use crate::training::{ForestParams, MaxFeatures};

fn invalid(msg: impl Into<String>) -> ReadError {
    ReadError::Validation(msg.into())
}

// =============================================================================
// Forest params / meta
// =============================================================================

impl From<&ForestParams> for ForestParamsSchema {
    fn from(p: &ForestParams) -> Self {
        Self {
            n_trees: p.n_trees,
            max_depth: p.max_depth,
            min_samples_split: p.min_samples_split,
            min_samples_leaf: p.min_samples_leaf,
            max_features: p.max_features,
            bootstrap: p.bootstrap,
            seed: p.seed,
        }
    }
}

impl From<ForestParamsSchema> for ForestParams {
    fn from(s: ForestParamsSchema) -> Self {
        Self {
            n_trees: s.n_trees,
            max_depth: s.max_depth,
            min_samples_split: s.min_samples_split,
            min_samples_leaf: s.min_samples_leaf,
            max_features: s.max_features,
            bootstrap: s.bootstrap,
            seed: s.seed,
        }
    }
}

impl From<&ModelMeta> for ModelMetaSchema {
    fn from(meta: &ModelMeta) -> Self {
        Self {
            feature_names: meta.feature_names.clone(),
            n_train_rows: meta.n_train_rows,
            params: (&meta.params).into(),
            crate_version: meta.crate_version.clone(),
        }
    }
}

impl From<ModelMetaSchema> for ModelMeta {
    fn from(s: ModelMetaSchema) -> Self {
        Self {
            feature_names: s.feature_names,
            n_train_rows: s.n_train_rows,
            params: s.params.into(),
            crate_version: s.crate_version,
        }
    }
}

// =============================================================================
// Preprocessor
// =============================================================================

impl From<&Preprocessor> for PreprocessorSchema {
    fn from(pre: &Preprocessor) -> Self {
        let encoder = pre.encoder();
        let scaler = pre.scaler();
        Self {
            unknown_policy: encoder.unknown_policy(),
            categorical: encoder
                .blocks()
                .iter()
                .map(|b| CategoryBlockSchema {
                    column: b.column(),
                    categories: b.categories().to_vec(),
                })
                .collect(),
            numeric: NumericColumn::ALL
                .iter()
                .zip(scaler.means().iter().zip(scaler.scales()))
                .map(|(&column, (&mean, &scale))| NumericScalingSchema {
                    column,
                    mean,
                    scale,
                })
                .collect(),
        }
    }
}

impl TryFrom<PreprocessorSchema> for Preprocessor {
    type Error = ReadError;

    fn try_from(schema: PreprocessorSchema) -> Result<Self, Self::Error> {
        let columns: Vec<CategoricalColumn> = schema.categorical.iter().map(|b| b.column).collect();
        if columns != CategoricalColumn::ALL {
            return Err(invalid(format!(
                "categorical columns must be {:?}, got {:?}",
                CategoricalColumn::ALL,
                columns
            )));
        }

        let mut blocks = Vec::with_capacity(schema.categorical.len());
        for block in schema.categorical {
            if block.categories.is_empty() {
                return Err(invalid(format!("column {} has no categories", block.column)));
            }
            if !block.categories.windows(2).all(|w| w[0] < w[1]) {
                return Err(invalid(format!(
                    "categories of column {} must be sorted and distinct",
                    block.column
                )));
            }
            blocks.push(CategoryBlock::new(block.column, block.categories));
        }

        let columns: Vec<NumericColumn> = schema.numeric.iter().map(|n| n.column).collect();
        if columns != NumericColumn::ALL {
            return Err(invalid(format!(
                "numeric columns must be {:?}, got {:?}",
                NumericColumn::ALL,
                columns
            )));
        }
        for n in &schema.numeric {
            if !n.mean.is_finite() || !n.scale.is_finite() || n.scale <= 0.0 {
                return Err(invalid(format!(
                    "column {} has invalid scaling (mean {}, scale {})",
                    n.column, n.mean, n.scale
                )));
            }
        }
        let scaler = StandardScaler::from_parts(
            schema.numeric.iter().map(|n| n.mean).collect(),
            schema.numeric.iter().map(|n| n.scale).collect(),
        );

        Ok(Preprocessor::from_parts(
            OneHotEncoder::from_blocks(blocks, schema.unknown_policy),
            scaler,
        ))
    }
}

// =============================================================================
// Tree / Forest
// =============================================================================

impl From<&Tree> for TreeSchema {
    fn from(tree: &Tree) -> Self {
        Self {
            num_nodes: tree.n_nodes() as u32,
            split_indices: tree.split_indices().to_vec(),
            thresholds: tree.thresholds().to_vec(),
            children_left: tree.left_children().to_vec(),
            children_right: tree.right_children().to_vec(),
            leaf_values: tree.leaf_values().to_vec(),
        }
    }
}

impl TryFrom<TreeSchema> for Tree {
    type Error = ReadError;

    fn try_from(schema: TreeSchema) -> Result<Self, Self::Error> {
        let n = schema.num_nodes as usize;
        if schema.children_left.len() != n || schema.children_right.len() != n {
            return Err(invalid(format!(
                "child arrays have lengths {}/{}, expected {n}",
                schema.children_left.len(),
                schema.children_right.len()
            )));
        }
        let is_leaf: Vec<bool> = schema
            .children_left
            .iter()
            .zip(&schema.children_right)
            .map(|(&l, &r)| l == 0 && r == 0)
            .collect();

        let tree = Tree::new(
            schema.split_indices,
            schema.thresholds,
            schema.children_left,
            schema.children_right,
            is_leaf,
            schema.leaf_values,
        );
        tree.validate().map_err(|e| invalid(e.to_string()))?;
        Ok(tree)
    }
}

impl From<&Forest> for ForestSchema {
    fn from(forest: &Forest) -> Self {
        Self {
            n_features: forest.n_features(),
            trees: forest.trees().map(TreeSchema::from).collect(),
        }
    }
}

impl TryFrom<ForestSchema> for Forest {
    type Error = ReadError;

    fn try_from(schema: ForestSchema) -> Result<Self, Self::Error> {
        let trees = schema
            .trees
            .into_iter()
            .enumerate()
            .map(|(i, t)| Tree::try_from(t).map_err(|e| invalid(format!("tree {i}: {e}"))))
            .collect::<Result<Vec<_>, _>>()?;
        let forest = Forest::new(trees, schema.n_features);
        forest.validate().map_err(|e| invalid(e.to_string()))?;
        Ok(forest)
    }
}

// =============================================================================
// Model
// =============================================================================

impl From<&SalaryModel> for SalaryModelSchema {
    fn from(model: &SalaryModel) -> Self {
        Self {
            meta: model.meta().into(),
            preprocessor: model.preprocessor().into(),
            forest: model.forest().into(),
        }
    }
}

impl TryFrom<SalaryModelSchema> for SalaryModel {
    type Error = ReadError;

    fn try_from(schema: SalaryModelSchema) -> Result<Self, Self::Error> {
        let preprocessor = Preprocessor::try_from(schema.preprocessor)?;
        let forest = Forest::try_from(schema.forest)?;

        if forest.n_features() != preprocessor.n_features() {
            return Err(invalid(format!(
                "forest expects {} features but preprocessing produces {}",
                forest.n_features(),
                preprocessor.n_features()
            )));
        }
        if schema.meta.feature_names.len() != preprocessor.n_features() {
            return Err(invalid(format!(
                "metadata lists {} feature names, expected {}",
                schema.meta.feature_names.len(),
                preprocessor.n_features()
            )));
        }
        if let MaxFeatures::Fraction(f) = schema.meta.params.max_features {
            if !(f > 0.0 && f <= 1.0) {
                return Err(invalid(format!("max_features fraction {f} out of range")));
            }
        }

        Ok(SalaryModel::from_parts(preprocessor, forest, schema.meta.into()))
    }
}

// =============================================================================
// Evaluation split
// =============================================================================

impl From<&EvaluationSplit> for EvaluationSplitSchema {
    fn from(split: &EvaluationSplit) -> Self {
        Self {
            seed: split.seed,
            test_fraction: split.test_fraction,
            rows: split
                .table
                .rows()
                .map(|(record, salary)| EvaluationRowSchema {
                    record: record.clone(),
                    salary,
                })
                .collect(),
        }
    }
}

impl TryFrom<EvaluationSplitSchema> for EvaluationSplit {
    type Error = ReadError;

    fn try_from(schema: EvaluationSplitSchema) -> Result<Self, Self::Error> {
        if !(schema.test_fraction > 0.0 && schema.test_fraction < 1.0) {
            return Err(invalid(format!(
                "test_fraction {} out of range",
                schema.test_fraction
            )));
        }
        let mut table = SalaryTable::default();
        for (i, row) in schema.rows.into_iter().enumerate() {
            let numerics_ok = NumericColumn::ALL
                .iter()
                .all(|&c| row.record.numeric(c).is_finite());
            if !numerics_ok || !row.salary.is_finite() {
                return Err(invalid(format!("row {i} has a non-finite value")));
            }
            table.push(row.record, row.salary);
        }
        Ok(EvaluationSplit {
            table,
            seed: schema.seed,
            test_fraction: schema.test_fraction,
        })
    }
}
