//! Multi-horizon price returns.
//!
//! Horizons are measured in trading sessions. A series too short for a
//! horizon yields a return of exactly 0 rather than a missing value, so new
//! listings rank as flat instead of dropping out of the column.

use serde::{Deserialize, Serialize};

/// Return horizon in trading sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Horizon {
    /// 252 sessions
    OneYear,
    /// 126 sessions
    SixMonth,
    /// 63 sessions
    ThreeMonth,
    /// 21 sessions
    OneMonth,
}

impl Horizon {
    /// Horizons in column order.
    pub const ALL: [Self; 4] = [Self::OneYear, Self::SixMonth, Self::ThreeMonth, Self::OneMonth];

    /// Lookback in trading sessions.
    pub const fn sessions(self) -> usize {
        match self {
            Self::OneYear => 252,
            Self::SixMonth => 126,
            Self::ThreeMonth => 63,
            Self::OneMonth => 21,
        }
    }

    /// Display label, e.g. `"Six-Month"`.
    pub const fn label(self) -> &'static str {
        match self {
            Self::OneYear => "One-Year",
            Self::SixMonth => "Six-Month",
            Self::ThreeMonth => "Three-Month",
            Self::OneMonth => "One-Month",
        }
    }
}

/// Fractional return of the latest close over `lookback` sessions.
///
/// `closes` is ordered oldest to newest. The reference close sits
/// `lookback` positions before the latest one. Returns `0.0` when the
/// series is not longer than `lookback`, or the reference close is not a
/// positive finite number.
pub fn fractional_return(closes: &[f64], lookback: usize) -> f64 {
    if closes.len() <= lookback {
        return 0.0;
    }

    let latest = closes[closes.len() - 1];
    let reference = closes[closes.len() - 1 - lookback];
    if !(reference.is_finite() && reference > 0.0 && latest.is_finite()) {
        return 0.0;
    }

    (latest - reference) / reference
}

/// Returns over the four standard horizons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HorizonReturns {
    /// 252-session return
    pub one_year: f64,
    /// 126-session return
    pub six_month: f64,
    /// 63-session return
    pub three_month: f64,
    /// 21-session return
    pub one_month: f64,
}

impl HorizonReturns {
    /// Compute all four horizons from a close series.
    pub fn from_closes(closes: &[f64]) -> Self {
        Self {
            one_year: fractional_return(closes, Horizon::OneYear.sessions()),
            six_month: fractional_return(closes, Horizon::SixMonth.sessions()),
            three_month: fractional_return(closes, Horizon::ThreeMonth.sessions()),
            one_month: fractional_return(closes, Horizon::OneMonth.sessions()),
        }
    }

    /// Returns in [`Horizon::ALL`] order.
    pub const fn as_array(&self) -> [f64; 4] {
        [self.one_year, self.six_month, self.three_month, self.one_month]
    }

    /// Return for a single horizon.
    pub const fn get(&self, horizon: Horizon) -> f64 {
        match horizon {
            Horizon::OneYear => self.one_year,
            Horizon::SixMonth => self.six_month,
            Horizon::ThreeMonth => self.three_month,
            Horizon::OneMonth => self.one_month,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_one_session_lookback() {
        assert_relative_eq!(fractional_return(&[10.0, 20.0, 30.0], 1), 0.5);
    }

    #[rstest]
    #[case(&[], 1)]
    #[case(&[10.0, 11.0], 5)]
    #[case(&[10.0, 11.0, 12.0], 3)]
    fn test_short_history_is_flat(#[case] closes: &[f64], #[case] lookback: usize) {
        assert_eq!(fractional_return(closes, lookback), 0.0);
    }

    #[test]
    fn test_negative_return() {
        assert_relative_eq!(fractional_return(&[40.0, 50.0, 30.0], 2), -0.25);
    }

    #[test]
    fn test_zero_reference_is_flat() {
        assert_eq!(fractional_return(&[0.0, 10.0], 1), 0.0);
    }

    #[test]
    fn test_horizon_returns() {
        // 300 sessions of +1 per session starting at 100.
        let closes: Vec<f64> = (0..300).map(|i| 100.0 + i as f64).collect();
        let returns = HorizonReturns::from_closes(&closes);

        assert_relative_eq!(returns.one_year, (399.0 - 147.0) / 147.0);
        assert_relative_eq!(returns.six_month, (399.0 - 273.0) / 273.0);
        assert_relative_eq!(returns.three_month, (399.0 - 336.0) / 336.0);
        assert_relative_eq!(returns.one_month, (399.0 - 378.0) / 378.0);
        assert_eq!(returns.get(Horizon::OneMonth), returns.as_array()[3]);
    }

    #[test]
    fn test_new_listing_only_has_short_horizons() {
        let closes: Vec<f64> = (0..70).map(|i| 50.0 + i as f64).collect();
        let returns = HorizonReturns::from_closes(&closes);

        assert_eq!(returns.one_year, 0.0);
        assert_eq!(returns.six_month, 0.0);
        assert!(returns.three_month > 0.0);
        assert!(returns.one_month > 0.0);
    }
}
