//! The screen pipeline.
//!
//! Fetch → (returns) → percentiles → composite → selection → allocation.
//! Fetching is the only concurrent stage; everything after it is a
//! whole-column transform over the working set in universe order, so a
//! frozen snapshot always produces the same cohort.

use crate::error::Result;
use crate::record::SecurityRecord;
use crate::report::{FetchStats, RunReport, SkippedTicker};
use crate::universe::Universe;
use basket_data::{
    FetchConfig, FetchObserver, FetchOutcome, MarketDataProvider, MetricFetcher, MetricSet,
    RawMetrics,
};
use basket_factors::{
    CompositeFactor, FactorError, Methodology, MomentumConfig, MomentumFactor, SelectionConfig,
    ValueConfig, ValueFactor, rank,
};
use basket_portfolio::{Allocation, AllocationError, EqualWeightAllocator};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Configuration for a screen run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScreenConfig {
    /// Metric fetching
    pub fetch: FetchConfig,
    /// Cohort selection
    pub selection: SelectionConfig,
    /// Momentum scoring
    pub momentum: MomentumConfig,
    /// Value scoring
    pub value: ValueConfig,
}

/// Fields each methodology needs from the provider.
pub const fn metric_set(methodology: Methodology) -> MetricSet {
    match methodology {
        Methodology::Momentum => MetricSet::PriceHistory,
        Methodology::Value => MetricSet::Valuation,
        Methodology::EqualWeight => MetricSet::MarketCap,
    }
}

/// Runs one methodology over a universe.
#[derive(Debug)]
pub struct Screen<P> {
    fetcher: MetricFetcher<P>,
    methodology: Methodology,
    config: ScreenConfig,
}

impl<P: MarketDataProvider> Screen<P> {
    /// Create a screen with default configuration.
    pub fn new(provider: P, methodology: Methodology) -> Self {
        Self::with_config(provider, methodology, ScreenConfig::default())
    }

    /// Create a screen with custom configuration.
    pub fn with_config(provider: P, methodology: Methodology, config: ScreenConfig) -> Self {
        Self {
            fetcher: MetricFetcher::with_config(provider, config.fetch.clone()),
            methodology,
            config,
        }
    }

    /// Methodology being run.
    pub const fn methodology(&self) -> Methodology {
        self.methodology
    }

    /// Active configuration.
    pub const fn config(&self) -> &ScreenConfig {
        &self.config
    }

    /// Underlying provider.
    pub const fn provider(&self) -> &P {
        self.fetcher.provider()
    }

    /// Fetch every member and build the working set.
    pub async fn fetch_records<O>(
        &self,
        universe: &Universe,
        observer: &O,
    ) -> (Vec<SecurityRecord>, FetchStats)
    where
        O: FetchObserver + ?Sized,
    {
        let symbols = universe.symbols();
        tracing::info!(
            methodology = %self.methodology,
            tickers = symbols.len(),
            concurrency = self.config.fetch.concurrency,
            "fetching metrics"
        );
        let results = self
            .fetcher
            .fetch_all(&symbols, metric_set(self.methodology), observer)
            .await;
        collect_records(universe, results)
    }

    /// Run the full screen and size the cohort for `budget`.
    pub async fn run<O>(&self, universe: &Universe, budget: Decimal, observer: &O) -> Result<RunReport>
    where
        O: FetchObserver + ?Sized,
    {
        // Reject a bad budget or an empty cut before spending time on the
        // network.
        let allocator = EqualWeightAllocator::new(budget)?;
        if self.methodology.info().rank_order.is_some() && self.config.selection.cohort_size == 0 {
            return Err(AllocationError::EmptyCohort.into());
        }

        let (records, stats) = self.fetch_records(universe, observer).await;
        self.finish(records, stats, &allocator)
    }

    /// Score, select and allocate an already fetched working set.
    pub fn finish(
        &self,
        records: Vec<SecurityRecord>,
        mut stats: FetchStats,
        allocator: &EqualWeightAllocator,
    ) -> Result<RunReport> {
        let records = self.apply_missing_policy(records, &mut stats);
        let mut scored = score_records(records, self.methodology, &self.config)?;

        let mut cohort = match self.methodology.info().rank_order {
            Some(order) => {
                rank(&mut scored, order);
                scored
                    .iter()
                    .take(self.config.selection.cohort_size)
                    .cloned()
                    .collect()
            }
            None => scored.clone(),
        };
        tracing::info!(
            scored = scored.len(),
            cohort = cohort.len(),
            "selected cohort"
        );

        let allocation = allocate(&mut cohort, allocator)?;
        tracing::info!(
            position_size = %allocation.position_size,
            cash_left = %allocation.cash_left,
            "allocated budget"
        );

        Ok(RunReport {
            methodology: self.methodology,
            generated_at: Utc::now(),
            budget: allocation.budget,
            position_size: allocation.position_size,
            invested: allocation.invested,
            cash_left: allocation.cash_left,
            universe: scored,
            cohort,
            stats,
        })
    }

    fn apply_missing_policy(
        &self,
        records: Vec<SecurityRecord>,
        stats: &mut FetchStats,
    ) -> Vec<SecurityRecord> {
        if self.methodology != Methodology::Value {
            return records;
        }

        let factor = ValueFactor::with_config(self.config.value.clone());
        let (kept, dropped): (Vec<_>, Vec<_>) = records
            .into_iter()
            .partition(|r| r.valuation().is_some_and(|v| factor.retains(v)));

        stats.fetched = kept.len();
        for record in dropped {
            tracing::warn!(symbol = %record.ticker, "excluding: incomplete valuation multiples");
            stats.skipped.push(SkippedTicker {
                ticker: record.ticker,
                reason: "incomplete valuation multiples".to_string(),
            });
        }
        kept
    }
}

/// Turn per-ticker fetch results into the working set.
///
/// `results` must be in universe order. Company names come from the
/// universe; failed tickers are recorded in the returned stats.
pub fn collect_records(
    universe: &Universe,
    results: Vec<std::result::Result<RawMetrics, FetchOutcome>>,
) -> (Vec<SecurityRecord>, FetchStats) {
    let mut stats = FetchStats {
        requested: results.len(),
        ..Default::default()
    };
    let mut records = Vec::with_capacity(results.len());

    for (member, result) in universe.constituents().iter().zip(results) {
        match result {
            Ok(metrics) => {
                records.push(SecurityRecord::from_metrics(metrics, member.name.clone()));
            }
            Err(outcome) => stats.skipped.push(SkippedTicker {
                ticker: outcome.symbol().to_string(),
                reason: outcome.to_string(),
            }),
        }
    }

    stats.fetched = records.len();
    (records, stats)
}

/// Attach percentiles and composite scores to every record.
///
/// Percentiles are computed over the whole working set at once.
/// Equal-weight records are returned unscored.
pub fn score_records(
    mut records: Vec<SecurityRecord>,
    methodology: Methodology,
    config: &ScreenConfig,
) -> std::result::Result<Vec<SecurityRecord>, FactorError> {
    match methodology {
        Methodology::Momentum => {
            let factor = MomentumFactor::with_config(config.momentum.clone());
            apply_scores(&factor, &mut records, |r| r.returns().copied())?;
        }
        Methodology::Value => {
            let factor = ValueFactor::with_config(config.value.clone());
            apply_scores(&factor, &mut records, |r| r.valuation().copied())?;
        }
        Methodology::EqualWeight => {}
    }
    Ok(records)
}

fn apply_scores<F, R>(
    factor: &F,
    records: &mut [SecurityRecord],
    raw: R,
) -> std::result::Result<(), FactorError>
where
    F: CompositeFactor,
    R: Fn(&SecurityRecord) -> Option<F::Raw>,
{
    let raws: Vec<F::Raw> = records.iter().filter_map(&raw).collect();
    if raws.len() != records.len() {
        return Err(FactorError::LengthMismatch {
            expected: records.len(),
            actual: raws.len(),
        });
    }

    for (record, scores) in records.iter_mut().zip(factor.score(&raws)) {
        record.scores = Some(scores);
    }
    Ok(())
}

/// Size `cohort` with `allocator` and write the share counts back.
pub fn allocate(
    cohort: &mut [SecurityRecord],
    allocator: &EqualWeightAllocator,
) -> Result<Allocation> {
    let allocation = allocator.allocate(cohort.iter().map(|r| (r.ticker.as_str(), r.price)))?;
    for (record, line) in cohort.iter_mut().zip(&allocation.lines) {
        record.shares_to_buy = Some(line.shares);
    }
    Ok(allocation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RawFactors;
    use basket_factors::{HorizonReturns, MissingPolicy, ValuationRatios};
    use rust_decimal_macros::dec;

    fn momentum_record(ticker: &str, price: f64, one_year: f64) -> SecurityRecord {
        SecurityRecord {
            ticker: ticker.to_string(),
            company_name: format!("{ticker} Corp"),
            price,
            factors: RawFactors::Momentum(HorizonReturns {
                one_year,
                six_month: one_year,
                three_month: one_year,
                one_month: one_year,
            }),
            scores: None,
            shares_to_buy: None,
        }
    }

    fn value_record(ticker: &str, pe: Option<f64>) -> SecurityRecord {
        SecurityRecord {
            ticker: ticker.to_string(),
            company_name: format!("{ticker} Corp"),
            price: 50.0,
            factors: RawFactors::Value(ValuationRatios {
                price_to_earnings: pe,
                price_to_book: Some(2.0),
                ev_to_ebitda: Some(10.0),
                ev_to_gross_profit: Some(3.0),
            }),
            scores: None,
            shares_to_buy: None,
        }
    }

    fn stats(n: usize) -> FetchStats {
        FetchStats {
            requested: n,
            fetched: n,
            skipped: Vec::new(),
        }
    }

    #[test]
    fn test_momentum_cohort_is_highest_first() {
        let screen = Screen::with_config(
            basket_data::SnapshotProvider::new(),
            Methodology::Momentum,
            ScreenConfig {
                selection: SelectionConfig { cohort_size: 2 },
                ..Default::default()
            },
        );
        let records = vec![
            momentum_record("A", 45.0, 0.30),
            momentum_record("B", 230.0, 0.10),
            momentum_record("C", 230.0, 0.50),
        ];

        let allocator = EqualWeightAllocator::new(dec!(10000)).unwrap();
        let report = screen.finish(records, stats(3), &allocator).unwrap();

        let tickers: Vec<&str> = report.cohort.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, ["C", "A"]);
        assert_eq!(report.cohort[0].shares_to_buy, Some(21));
        assert_eq!(report.cohort[1].shares_to_buy, Some(111));
        assert_eq!(report.universe.len(), 3);
        assert!(report.universe.iter().all(|r| r.shares_to_buy.is_none()));
        assert_eq!(report.position_size, dec!(5000));
    }

    #[test]
    fn test_value_cohort_is_lowest_first() {
        let screen = Screen::with_config(
            basket_data::SnapshotProvider::new(),
            Methodology::Value,
            ScreenConfig {
                selection: SelectionConfig { cohort_size: 1 },
                ..Default::default()
            },
        );
        let records = vec![
            value_record("EXP", Some(40.0)),
            value_record("MISS", None),
            value_record("CHEAP", Some(8.0)),
        ];

        let allocator = EqualWeightAllocator::new(dec!(1000)).unwrap();
        let report = screen.finish(records, stats(3), &allocator).unwrap();

        assert_eq!(report.cohort[0].ticker, "CHEAP");
        assert_eq!(report.universe.len(), 3);
        // Missing P/E ranks as the most expensive.
        let missing = report.universe.iter().find(|r| r.ticker == "MISS").unwrap();
        assert_eq!(missing.scores.unwrap().percentiles[0], 1.0);
    }

    #[test]
    fn test_exclude_policy_drops_incomplete_records() {
        let screen = Screen::with_config(
            basket_data::SnapshotProvider::new(),
            Methodology::Value,
            ScreenConfig {
                value: ValueConfig {
                    missing: MissingPolicy::Exclude,
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        let records = vec![value_record("EXP", Some(40.0)), value_record("MISS", None)];

        let allocator = EqualWeightAllocator::new(dec!(1000)).unwrap();
        let report = screen.finish(records, stats(2), &allocator).unwrap();

        assert_eq!(report.universe.len(), 1);
        assert_eq!(report.stats.fetched, 1);
        assert_eq!(report.stats.skipped[0].ticker, "MISS");
    }

    #[test]
    fn test_exclude_policy_recounts_caller_stats() {
        let screen = Screen::with_config(
            basket_data::SnapshotProvider::new(),
            Methodology::Value,
            ScreenConfig {
                value: ValueConfig {
                    missing: MissingPolicy::Exclude,
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        let records = vec![
            value_record("A", Some(12.0)),
            value_record("B", None),
            value_record("C", None),
        ];

        let allocator = EqualWeightAllocator::new(dec!(1000)).unwrap();
        let report = screen
            .finish(records, FetchStats::default(), &allocator)
            .unwrap();

        assert_eq!(report.stats.fetched, 1);
        assert_eq!(report.stats.skipped.len(), 2);
    }

    #[test]
    fn test_empty_working_set_fails_allocation() {
        let screen = Screen::new(basket_data::SnapshotProvider::new(), Methodology::Momentum);
        let allocator = EqualWeightAllocator::new(dec!(1000)).unwrap();
        let err = screen.finish(Vec::new(), stats(0), &allocator).unwrap_err();
        assert!(err.to_string().contains("empty cohort"));
    }

    #[test]
    fn test_mixed_records_are_rejected() {
        let records = vec![momentum_record("A", 10.0, 0.1), value_record("B", Some(5.0))];
        let err = score_records(records, Methodology::Momentum, &ScreenConfig::default()).unwrap_err();
        assert_eq!(
            err,
            FactorError::LengthMismatch {
                expected: 2,
                actual: 1
            }
        );
    }
}
