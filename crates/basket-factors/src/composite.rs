//! Composite score weighting.

use crate::error::FactorError;
use serde::{Deserialize, Serialize};

/// Relative weights of the four percentile dimensions.
///
/// Weights are normalized by their sum, so `[1, 1, 1, 1]` (the default) is a
/// plain mean and `[2, 1, 1, 0]` gives the first dimension half the score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct CompositeWeights([f64; 4]);

impl CompositeWeights {
    /// Equal weight on every dimension.
    pub const EQUAL: Self = Self([1.0; 4]);

    /// Validate and wrap custom weights.
    pub fn new(weights: [f64; 4]) -> Result<Self, FactorError> {
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(FactorError::InvalidWeights {
                weights,
                reason: "weights must be finite and non-negative",
            });
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(FactorError::InvalidWeights {
                weights,
                reason: "at least one weight must be positive",
            });
        }
        Ok(Self(weights))
    }

    /// Raw weights as supplied.
    pub const fn as_array(&self) -> [f64; 4] {
        self.0
    }

    /// Whether every dimension carries the same weight.
    pub fn is_equal(&self) -> bool {
        self.0.iter().all(|w| *w == self.0[0])
    }

    /// Weighted mean of `percentiles`.
    pub fn combine(&self, percentiles: &[f64; 4]) -> f64 {
        let total: f64 = self.0.iter().sum();
        let weighted: f64 = self
            .0
            .iter()
            .zip(percentiles)
            .map(|(w, p)| w * p)
            .sum();
        weighted / total
    }
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self::EQUAL
    }
}

impl TryFrom<[f64; 4]> for CompositeWeights {
    type Error = FactorError;

    fn try_from(weights: [f64; 4]) -> Result<Self, Self::Error> {
        Self::new(weights)
    }
}

impl From<CompositeWeights> for [f64; 4] {
    fn from(weights: CompositeWeights) -> Self {
        weights.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_equal_weights_are_the_mean() {
        let weights = CompositeWeights::default();
        assert!(weights.is_equal());
        assert_relative_eq!(weights.combine(&[0.2, 0.4, 0.6, 0.8]), 0.5);
    }

    #[test]
    fn test_custom_weights_are_normalized() {
        let weights = CompositeWeights::new([2.0, 1.0, 1.0, 0.0]).unwrap();
        assert_relative_eq!(weights.combine(&[1.0, 0.0, 0.0, 1.0]), 0.5);
    }

    #[test]
    fn test_rejects_bad_weights() {
        assert!(CompositeWeights::new([0.0; 4]).is_err());
        assert!(CompositeWeights::new([1.0, -1.0, 1.0, 1.0]).is_err());
        assert!(CompositeWeights::new([1.0, f64::NAN, 1.0, 1.0]).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: CompositeWeights = serde_json::from_str("[1, 2, 3, 4]").unwrap();
        assert_eq!(ok.as_array(), [1.0, 2.0, 3.0, 4.0]);
        assert!(serde_json::from_str::<CompositeWeights>("[0, 0, 0, 0]").is_err());
    }
}
