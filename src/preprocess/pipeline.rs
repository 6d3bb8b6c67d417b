//! Combined categorical + numeric preprocessing.

use ndarray::{Array1, Array2, ArrayView1};

use super::encoder::{OneHotEncoder, TransformError, UnknownPolicy};
use super::scaler::StandardScaler;
use crate::data::FeatureRecord;

/// Fitting failed because there was nothing to fit on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot fit preprocessing on an empty dataset")]
pub struct EmptyFitError;

/// Fitted feature transformation: one-hot blocks followed by scaled numerics.
///
/// The output layout is fixed at fit time:
/// `[Education.., Location.., Job_Title.., Gender.., Experience, Age]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessor {
    encoder: OneHotEncoder,
    scaler: StandardScaler,
}

impl Preprocessor {
    /// Fit encoder and scaler on `records`.
    pub fn fit(records: &[FeatureRecord], unknown_policy: UnknownPolicy) -> Result<Self, EmptyFitError> {
        let scaler = StandardScaler::fit(records).ok_or(EmptyFitError)?;
        let encoder = OneHotEncoder::fit(records, unknown_policy);
        Ok(Self { encoder, scaler })
    }

    pub fn from_parts(encoder: OneHotEncoder, scaler: StandardScaler) -> Self {
        Self { encoder, scaler }
    }

    pub fn encoder(&self) -> &OneHotEncoder {
        &self.encoder
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn unknown_policy(&self) -> UnknownPolicy {
        self.encoder.unknown_policy()
    }

    /// Replace the unknown-category policy, keeping the fitted state.
    pub fn with_unknown_policy(mut self, policy: UnknownPolicy) -> Self {
        self.encoder.set_unknown_policy(policy);
        self
    }

    /// Width of a transformed row.
    pub fn n_features(&self) -> usize {
        self.encoder.n_outputs() + self.scaler.n_outputs()
    }

    /// Output column names in transform order.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = self.encoder.feature_names();
        names.extend(self.scaler.feature_names());
        names
    }

    fn transform_into(&self, record: &FeatureRecord, out: &mut [f64]) -> Result<(), TransformError> {
        let (cat, num) = out.split_at_mut(self.encoder.n_outputs());
        self.encoder.encode_into(record, cat)?;
        self.scaler.scale_into(record, num);
        Ok(())
    }

    /// Transform a single record.
    pub fn transform_record(&self, record: &FeatureRecord) -> Result<Array1<f64>, TransformError> {
        let mut row = vec![0.0; self.n_features()];
        self.transform_into(record, &mut row)?;
        Ok(Array1::from_vec(row))
    }

    /// Transform many records into a sample-major matrix `[n_samples, n_features]`.
    pub fn transform(&self, records: &[FeatureRecord]) -> Result<Array2<f64>, TransformError> {
        let mut matrix = Array2::zeros((records.len(), self.n_features()));
        let mut scratch = vec![0.0; self.n_features()];
        for (record, mut row) in records.iter().zip(matrix.rows_mut()) {
            self.transform_into(record, &mut scratch)?;
            row.assign(&ArrayView1::from(&scratch[..]));
        }
        Ok(matrix)
    }
}
