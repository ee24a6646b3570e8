//! Composite Value Factor
//!
//! Combines four valuation multiple percentiles into a single score. A
//! missing or non-positive multiple is replaced by +infinity before ranking,
//! so it lands at the expensive end of its column.

use crate::composite::CompositeWeights;
use crate::percentile::{fill_invalid, percentile_ranks};
use crate::traits::{CompositeFactor, RankOrder};
use serde::{Deserialize, Serialize};

/// Valuation multiples for one security. Any of them may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuationRatios {
    /// Price-to-earnings ratio
    pub price_to_earnings: Option<f64>,
    /// Price-to-book ratio
    pub price_to_book: Option<f64>,
    /// Enterprise value to EBITDA
    pub ev_to_ebitda: Option<f64>,
    /// Enterprise value to gross profit
    pub ev_to_gross_profit: Option<f64>,
}

impl ValuationRatios {
    /// Multiples in dimension order.
    pub const fn as_array(&self) -> [Option<f64>; 4] {
        [
            self.price_to_earnings,
            self.price_to_book,
            self.ev_to_ebitda,
            self.ev_to_gross_profit,
        ]
    }

    /// Whether every multiple is present and usable.
    pub fn is_complete(&self) -> bool {
        self.as_array().iter().all(|v| v.is_some_and(is_usable))
    }
}

/// What to do with a security that lacks one of its multiples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingPolicy {
    /// Keep it and rank the missing multiple as the most expensive.
    #[default]
    Worst,
    /// Drop it from the cross-section before ranking.
    Exclude,
}

/// Configuration for the value factor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValueConfig {
    /// Weights for P/E, P/B, EV/EBITDA and EV/GP percentiles
    pub weights: CompositeWeights,
    /// Handling of missing multiples
    pub missing: MissingPolicy,
}

/// Value computes a composite percentile score from valuation multiples
#[derive(Debug)]
pub struct ValueFactor {
    config: ValueConfig,
}

impl ValueFactor {
    /// Whether `ratios` takes part in the cross-section under the configured
    /// [`MissingPolicy`].
    pub fn retains(&self, ratios: &ValuationRatios) -> bool {
        match self.config.missing {
            MissingPolicy::Worst => true,
            MissingPolicy::Exclude => ratios.is_complete(),
        }
    }
}

impl CompositeFactor for ValueFactor {
    type Raw = ValuationRatios;
    type Config = ValueConfig;

    fn name(&self) -> &str {
        "value"
    }

    fn dimensions(&self) -> [&'static str; 4] {
        ["Price-to-Earnings Ratio", "Price-to-Book Ratio", "EV/EBITDA", "EV/GP"]
    }

    fn rank_order(&self) -> RankOrder {
        RankOrder::LowerIsBetter
    }

    fn weights(&self) -> &CompositeWeights {
        &self.config.weights
    }

    fn percentiles(&self, raws: &[ValuationRatios]) -> [Vec<f64>; 4] {
        [0, 1, 2, 3].map(|dimension| {
            let column: Vec<Option<f64>> = raws.iter().map(|r| r.as_array()[dimension]).collect();
            percentile_ranks(&fill_invalid(&column, is_usable, f64::INFINITY))
        })
    }

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

impl Default for ValueFactor {
    fn default() -> Self {
        Self::with_config(ValueConfig::default())
    }
}

fn is_usable(ratio: f64) -> bool {
    ratio.is_finite() && ratio > 0.0
}
