//! Methodology registry
//!
//! The screens this crate knows how to run, with the labels used in
//! reports.

use crate::error::FactorError;
use crate::traits::RankOrder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Available screening methodologies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Methodology {
    /// Multi-horizon price momentum
    Momentum,
    /// Multi-multiple valuation
    Value,
    /// Unranked, equal dollars in every security
    EqualWeight,
}

/// Methodology metadata
#[derive(Debug, Clone)]
pub struct MethodologyInfo {
    /// Methodology name (unique identifier)
    pub name: &'static str,
    /// Brief description of the screen
    pub description: &'static str,
    /// Label of the composite score column, if the screen is scored
    pub score_label: Option<&'static str>,
    /// Preferred end of the composite score, if the screen is scored
    pub rank_order: Option<RankOrder>,
}

impl Methodology {
    /// All methodologies.
    pub const ALL: [Self; 3] = [Self::Momentum, Self::Value, Self::EqualWeight];

    /// Metadata for this methodology.
    pub const fn info(self) -> MethodologyInfo {
        match self {
            Self::Momentum => MethodologyInfo {
                name: "momentum",
                description: "High-quality momentum: mean percentile of 1y, 6m, 3m and 1m returns",
                score_label: Some("HQM Score"),
                rank_order: Some(RankOrder::HigherIsBetter),
            },
            Self::Value => MethodologyInfo {
                name: "value",
                description: "Robust value: mean percentile of P/E, P/B, EV/EBITDA and EV/GP",
                score_label: Some("RV Score"),
                rank_order: Some(RankOrder::LowerIsBetter),
            },
            Self::EqualWeight => MethodologyInfo {
                name: "equal-weight",
                description: "Equal dollar amount in every security with a price and market cap",
                score_label: None,
                rank_order: None,
            },
        }
    }

    /// Methodology name.
    pub const fn name(self) -> &'static str {
        self.info().name
    }
}

impl fmt::Display for Methodology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Methodology {
    type Err = FactorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|m| m.name() == wanted)
            .ok_or_else(|| FactorError::UnknownMethodology(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for methodology in Methodology::ALL {
            assert_eq!(methodology.name().parse::<Methodology>().unwrap(), methodology);
        }
        assert_eq!("Equal_Weight".parse::<Methodology>().unwrap(), Methodology::EqualWeight);
    }

    #[test]
    fn test_unknown_methodology() {
        assert!(matches!(
            "quality".parse::<Methodology>(),
            Err(FactorError::UnknownMethodology(_))
        ));
    }

    #[test]
    fn test_only_scored_screens_have_an_order() {
        for methodology in Methodology::ALL {
            let info = methodology.info();
            assert_eq!(info.score_label.is_some(), info.rank_order.is_some());
        }
        assert_eq!(Methodology::Value.info().rank_order, Some(RankOrder::LowerIsBetter));
    }
}
