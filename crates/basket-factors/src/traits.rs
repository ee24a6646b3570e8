//! Core trait definitions for composite factors.
//!
//! A composite factor turns one raw input per security into four
//! percentile columns and a single composite score. Percentiles are always
//! computed over the whole cross-section passed in, never row by row.

use crate::composite::CompositeWeights;
use serde::{Deserialize, Serialize};

/// Which end of the composite score is preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RankOrder {
    /// Highest score first (momentum).
    HigherIsBetter,
    /// Lowest score first (value: cheap multiples rank low).
    LowerIsBetter,
}

/// Percentiles and composite score for one security.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorScores {
    /// Percentile per dimension, each in `[0, 1]`
    pub percentiles: [f64; 4],
    /// Weighted mean of `percentiles`
    pub composite: f64,
}

/// A four-dimension percentile factor.
pub trait CompositeFactor: Send + Sync + std::fmt::Debug {
    /// Raw per-security input.
    type Raw;

    /// Configuration type for this factor.
    type Config: Default + Clone + std::fmt::Debug;

    /// Unique identifier, snake_case.
    fn name(&self) -> &str;

    /// Dimension labels in column order.
    fn dimensions(&self) -> [&'static str; 4];

    /// Preferred end of the composite score.
    fn rank_order(&self) -> RankOrder;

    /// Composite weights in use.
    fn weights(&self) -> &CompositeWeights;

    /// One percentile column per dimension over the whole cross-section.
    fn percentiles(&self, raws: &[Self::Raw]) -> [Vec<f64>; 4];

    /// Percentiles and composite score for every security, in input order.
    fn score(&self, raws: &[Self::Raw]) -> Vec<FactorScores> {
        let columns = self.percentiles(raws);
        let weights = self.weights();
        (0..raws.len())
            .map(|i| {
                let percentiles = [columns[0][i], columns[1][i], columns[2][i], columns[3][i]];
                FactorScores {
                    percentiles,
                    composite: weights.combine(&percentiles),
                }
            })
            .collect()
    }

    /// Create a new factor with the given configuration.
    fn with_config(config: Self::Config) -> Self
    where
        Self: Sized;

    /// Returns the current configuration.
    fn config(&self) -> &Self::Config;
}
