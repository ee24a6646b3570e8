//! Per-security working records.

use basket_data::{MetricDetail, RawMetrics, Valuation};
use basket_factors::{FactorScores, HorizonReturns, Ranked, ValuationRatios};
use serde::{Deserialize, Serialize};

/// Methodology-specific raw inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawFactors {
    /// Multi-horizon price returns
    Momentum(HorizonReturns),
    /// Valuation multiples
    Value(ValuationRatios),
    /// Market capitalization
    MarketCap(f64),
}

impl From<MetricDetail> for RawFactors {
    fn from(detail: MetricDetail) -> Self {
        match detail {
            MetricDetail::History(closes) => Self::Momentum(HorizonReturns::from_closes(&closes)),
            MetricDetail::Valuation(valuation) => Self::Value(ratios(&valuation)),
            MetricDetail::MarketCap(cap) => Self::MarketCap(cap),
        }
    }
}

/// Valuation multiples in factor order.
///
/// Gross profit is not published directly, so EV/revenue stands in for
/// EV/GP.
pub const fn ratios(valuation: &Valuation) -> ValuationRatios {
    ValuationRatios {
        price_to_earnings: valuation.trailing_pe,
        price_to_book: valuation.price_to_book,
        ev_to_ebitda: valuation.ev_to_ebitda,
        ev_to_gross_profit: valuation.ev_to_revenue,
    }
}

/// One row of the working set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityRecord {
    /// Ticker symbol, unique within a run
    pub ticker: String,
    /// Company name
    pub company_name: String,
    /// Latest price, always positive
    pub price: f64,
    /// Raw factor inputs
    pub factors: RawFactors,
    /// Percentiles and composite score, once scored
    pub scores: Option<FactorScores>,
    /// Whole shares to buy, once allocated
    pub shares_to_buy: Option<u64>,
}

impl SecurityRecord {
    /// Create an unscored record from fetched metrics.
    pub fn from_metrics(metrics: RawMetrics, company_name: impl Into<String>) -> Self {
        Self {
            ticker: metrics.symbol,
            company_name: company_name.into(),
            price: metrics.price,
            factors: metrics.detail.into(),
            scores: None,
            shares_to_buy: None,
        }
    }

    /// Composite score, if scored.
    pub fn composite_score(&self) -> Option<f64> {
        self.scores.map(|s| s.composite)
    }

    /// Horizon returns for momentum records.
    pub const fn returns(&self) -> Option<&HorizonReturns> {
        match &self.factors {
            RawFactors::Momentum(returns) => Some(returns),
            RawFactors::Value(_) | RawFactors::MarketCap(_) => None,
        }
    }

    /// Valuation multiples for value records.
    pub const fn valuation(&self) -> Option<&ValuationRatios> {
        match &self.factors {
            RawFactors::Value(ratios) => Some(ratios),
            RawFactors::Momentum(_) | RawFactors::MarketCap(_) => None,
        }
    }

    /// Market capitalization for equal-weight records.
    pub const fn market_cap(&self) -> Option<f64> {
        match self.factors {
            RawFactors::MarketCap(cap) => Some(cap),
            RawFactors::Momentum(_) | RawFactors::Value(_) => None,
        }
    }
}

impl Ranked for SecurityRecord {
    fn ticker(&self) -> &str {
        &self.ticker
    }

    fn score(&self) -> f64 {
        self.composite_score().unwrap_or(f64::NAN)
    }
}
