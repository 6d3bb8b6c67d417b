//! Random forest hyperparameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of features considered at each split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    /// Every feature.
    #[default]
    All,
    /// `floor(sqrt(n_features))`, at least 1.
    Sqrt,
    /// `ceil(fraction * n_features)`, at least 1. Fraction in `(0, 1]`.
    Fraction(f64),
}

impl MaxFeatures {
    /// Resolve to a concrete count for `n_features` columns.
    pub fn resolve(self, n_features: usize) -> usize {
        let k = match self {
            Self::All => n_features,
            Self::Sqrt => (n_features as f64).sqrt().floor() as usize,
            Self::Fraction(f) => (f * n_features as f64).ceil() as usize,
        };
        k.clamp(1, n_features.max(1))
    }
}

impl fmt::Display for MaxFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Sqrt => f.write_str("sqrt"),
            Self::Fraction(x) => write!(f, "{x}"),
        }
    }
}

impl FromStr for MaxFeatures {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "sqrt" => Ok(Self::Sqrt),
            other => other
                .parse::<f64>()
                .map(Self::Fraction)
                .map_err(|_| format!("expected 'all', 'sqrt' or a fraction, got '{other}'")),
        }
    }
}

/// Parameters for growing a random forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: u32,
    /// `None` grows until leaves are pure or too small to split.
    pub max_depth: Option<u32>,
    pub min_samples_split: u32,
    pub min_samples_leaf: u32,
    pub max_features: MaxFeatures,
    /// Sample `n` rows with replacement per tree; otherwise every tree sees all rows.
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::All,
            bootstrap: true,
            seed: 42,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(MaxFeatures::All, 17, 17)]
    #[case(MaxFeatures::Sqrt, 17, 4)]
    #[case(MaxFeatures::Sqrt, 1, 1)]
    #[case(MaxFeatures::Fraction(0.5), 17, 9)]
    #[case(MaxFeatures::Fraction(0.01), 17, 1)]
    fn resolves_feature_count(#[case] mf: MaxFeatures, #[case] n: usize, #[case] expected: usize) {
        assert_eq!(mf.resolve(n), expected);
    }

    #[test]
    fn parses_from_str() {
        assert_eq!("all".parse::<MaxFeatures>(), Ok(MaxFeatures::All));
        assert_eq!("sqrt".parse::<MaxFeatures>(), Ok(MaxFeatures::Sqrt));
        assert_eq!("0.3".parse::<MaxFeatures>(), Ok(MaxFeatures::Fraction(0.3)));
        assert!("most".parse::<MaxFeatures>().is_err());
    }
}
