//! Composite Momentum Factor
//!
//! Combines one-year, six-month, three-month and one-month return
//! percentiles into a single score.

use crate::composite::CompositeWeights;
use crate::percentile::percentile_ranks;
use crate::returns::{Horizon, HorizonReturns};
use crate::traits::{CompositeFactor, RankOrder};
use serde::{Deserialize, Serialize};

/// Configuration for the momentum factor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MomentumConfig {
    /// Weights for one-year, six-month, three-month and one-month percentiles
    pub weights: CompositeWeights,
}

/// Momentum computes a composite percentile score from multi-horizon returns
#[derive(Debug)]
pub struct MomentumFactor {
    config: MomentumConfig,
}

impl CompositeFactor for MomentumFactor {
    type Raw = HorizonReturns;
    type Config = MomentumConfig;

    fn name(&self) -> &str {
        "momentum"
    }

    fn dimensions(&self) -> [&'static str; 4] {
        Horizon::ALL.map(Horizon::label)
    }

    fn rank_order(&self) -> RankOrder {
        RankOrder::HigherIsBetter
    }

    fn weights(&self) -> &CompositeWeights {
        &self.config.weights
    }

    fn percentiles(&self, raws: &[HorizonReturns]) -> [Vec<f64>; 4] {
        Horizon::ALL.map(|horizon| {
            // Returns are never missing; a non-finite one is treated as flat.
            let column: Vec<f64> = raws
                .iter()
                .map(|r| r.get(horizon))
                .map(|r| if r.is_finite() { r } else { 0.0 })
                .collect();
            percentile_ranks(&column)
        })
    }

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

impl Default for MomentumFactor {
    fn default() -> Self {
        Self::with_config(MomentumConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn returns(one_year: f64, six_month: f64, three_month: f64, one_month: f64) -> HorizonReturns {
        HorizonReturns {
            one_year,
            six_month,
            three_month,
            one_month,
        }
    }

    #[test]
    fn test_factor_name() {
        let factor = MomentumFactor::default();
        assert_eq!(factor.name(), "momentum");
        assert_eq!(factor.rank_order(), RankOrder::HigherIsBetter);
        assert_eq!(
            factor.dimensions(),
            ["One-Year", "Six-Month", "Three-Month", "One-Month"]
        );
    }

    #[test]
    fn test_higher_returns_score_higher() {
        let factor = MomentumFactor::default();
        let scores = factor.score(&[
            returns(0.10, 0.05, 0.02, 0.01),
            returns(0.50, 0.30, 0.10, 0.04),
            returns(-0.20, -0.10, -0.05, -0.02),
        ]);

        assert_eq!(scores[1].percentiles, [1.0; 4]);
        assert_relative_eq!(scores[1].composite, 1.0);
        assert_relative_eq!(scores[2].composite, 1.0 / 3.0);
        assert!(scores[0].composite > scores[2].composite);
    }

    #[test]
    fn test_flat_fallback_ranks_in_the_middle() {
        let factor = MomentumFactor::default();
        // The second security is a new listing with no one-year history.
        let scores = factor.score(&[
            returns(0.30, 0.1, 0.1, 0.1),
            returns(0.0, 0.1, 0.1, 0.1),
            returns(-0.30, 0.1, 0.1, 0.1),
        ]);

        assert_relative_eq!(scores[1].percentiles[0], 2.0 / 3.0);
    }

    #[test]
    fn test_composite_is_the_mean_of_percentiles() {
        let factor = MomentumFactor::default();
        let scores = factor.score(&[
            returns(0.1, 0.4, 0.3, 0.1),
            returns(0.2, 0.3, 0.1, 0.2),
            returns(0.3, 0.2, 0.2, 0.3),
            returns(0.4, 0.1, 0.4, 0.4),
        ]);

        for score in &scores {
            let mean = score.percentiles.iter().sum::<f64>() / 4.0;
            assert_relative_eq!(score.composite, mean);
            assert!(score.percentiles.iter().all(|p| (0.0..=1.0).contains(p)));
        }
    }
}
