//! Standardization of numeric columns.

use crate::data::{FeatureRecord, NumericColumn};

/// Standard deviations below this are treated as constant columns.
const MIN_SCALE: f64 = 10.0 * f64::EPSILON;

/// Per-column `(x - mean) / scale` over every [`NumericColumn`], in column order.
///
/// `scale` is the population standard deviation, or `1.0` for constant columns.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    /// Fit means and scales from `records`. Returns `None` when `records` is empty.
    pub fn fit(records: &[FeatureRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }
        let n = records.len() as f64;
        let mut means = Vec::with_capacity(NumericColumn::ALL.len());
        let mut scales = Vec::with_capacity(NumericColumn::ALL.len());

        for column in NumericColumn::ALL {
            let mean = records.iter().map(|r| r.numeric(column)).sum::<f64>() / n;
            let var = records
                .iter()
                .map(|r| {
                    let d = r.numeric(column) - mean;
                    d * d
                })
                .sum::<f64>()
                / n;
            let std = var.sqrt();
            means.push(mean);
            scales.push(if std < MIN_SCALE { 1.0 } else { std });
        }
        Some(Self { means, scales })
    }

    /// Rebuild from fitted parameters, one entry per [`NumericColumn`].
    pub fn from_parts(means: Vec<f64>, scales: Vec<f64>) -> Self {
        debug_assert_eq!(means.len(), scales.len());
        Self { means, scales }
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    pub fn n_outputs(&self) -> usize {
        self.means.len()
    }

    pub fn feature_names(&self) -> Vec<String> {
        NumericColumn::ALL
            .iter()
            .map(|c| c.name().to_owned())
            .collect()
    }

    /// Write the scaled numerics of `record` into `out`.
    pub fn scale_into(&self, record: &FeatureRecord, out: &mut [f64]) {
        debug_assert_eq!(out.len(), self.n_outputs());
        for (i, column) in NumericColumn::ALL.into_iter().enumerate() {
            out[i] = (record.numeric(column) - self.means[i]) / self.scales[i];
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn rec(experience: f64, age: f64) -> FeatureRecord {
        FeatureRecord {
            education: "Bachelor".into(),
            experience,
            location: "Urban".into(),
            job_title: "Engineer".into(),
            age,
            gender: "Male".into(),
        }
    }

    #[test]
    fn uses_population_std() {
        let scaler = StandardScaler::fit(&[rec(1.0, 30.0), rec(3.0, 30.0)]).unwrap();
        assert_abs_diff_eq!(scaler.means()[0], 2.0);
        assert_abs_diff_eq!(scaler.scales()[0], 1.0);
        // Constant Age column keeps unit scale.
        assert_abs_diff_eq!(scaler.scales()[1], 1.0);

        let mut out = [0.0; 2];
        scaler.scale_into(&rec(3.0, 32.0), &mut out);
        assert_abs_diff_eq!(out[0], 1.0);
        assert_abs_diff_eq!(out[1], 2.0);
    }

    #[test]
    fn scaled_training_data_is_standardized() {
        let records: Vec<_> = (0..10).map(|i| rec(i as f64, 20.0 + 3.0 * i as f64)).collect();
        let scaler = StandardScaler::fit(&records).unwrap();
        let scaled: Vec<[f64; 2]> = records
            .iter()
            .map(|r| {
                let mut out = [0.0; 2];
                scaler.scale_into(r, &mut out);
                out
            })
            .collect();
        for col in 0..2 {
            let mean = scaled.iter().map(|s| s[col]).sum::<f64>() / 10.0;
            let var = scaled.iter().map(|s| (s[col] - mean).powi(2)).sum::<f64>() / 10.0;
            assert_abs_diff_eq!(mean, 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(var, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn empty_input_cannot_fit() {
        assert!(StandardScaler::fit(&[]).is_none());
    }
}
