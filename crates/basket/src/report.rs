//! Run results and their tabular views.

use crate::record::SecurityRecord;
use basket_factors::{CompositeFactor, Horizon, Methodology, ValueFactor};
use basket_output::{
    Cell, ColumnKind, ExportError, ExportFormat, Exporter, Schema, Table, artifact_path,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A ticker that produced no record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedTicker {
    /// Ticker symbol
    pub ticker: String,
    /// Why it was skipped
    pub reason: String,
}

/// Fetch bookkeeping for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchStats {
    /// Tickers in the universe
    pub requested: usize,
    /// Tickers that made it into the working set
    pub fetched: usize,
    /// Tickers dropped, in universe order
    pub skipped: Vec<SkippedTicker>,
}

/// Everything a screen run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Methodology that was run
    pub methodology: Methodology,
    /// When the run finished
    pub generated_at: DateTime<Utc>,
    /// Budget that was allocated
    pub budget: Decimal,
    /// Dollars per cohort member
    pub position_size: Decimal,
    /// Sum of `shares * price` over the cohort
    pub invested: Decimal,
    /// `budget - invested`
    pub cash_left: Decimal,
    /// Full scored working set, best first for ranked methodologies
    pub universe: Vec<SecurityRecord>,
    /// Selected cohort with share counts
    pub cohort: Vec<SecurityRecord>,
    /// Fetch bookkeeping
    pub stats: FetchStats,
}

impl RunReport {
    fn is_scored(&self) -> bool {
        self.methodology.info().score_label.is_some()
    }

    /// Prefix used for artifact file names.
    pub fn file_prefix(&self) -> String {
        self.methodology.name().replace('-', "_")
    }

    /// Table of every scored record.
    pub fn universe_table(&self) -> Result<Table, ExportError> {
        let shares: HashMap<&str, u64> = self
            .cohort
            .iter()
            .filter_map(|r| Some((r.ticker.as_str(), r.shares_to_buy?)))
            .collect();

        let scored = self.is_scored();
        let mut table = Table::new("Universe Analysis", schema(self.methodology));
        for record in &self.universe {
            let shares = shares.get(record.ticker.as_str()).copied();
            table.push_row(row(record, scored, shares))?;
        }
        Ok(table)
    }

    /// Table of the cohort with share counts.
    pub fn cohort_table(&self) -> Result<Table, ExportError> {
        let title = match self.methodology {
            Methodology::EqualWeight => "Recommended Trades".to_string(),
            Methodology::Momentum => format!("Top {} Momentum Stocks", self.cohort.len()),
            Methodology::Value => format!("Top {} Value Stocks", self.cohort.len()),
        };

        let scored = self.is_scored();
        let mut table = Table::new(title, schema(self.methodology));
        for record in &self.cohort {
            table.push_row(row(record, scored, record.shares_to_buy))?;
        }
        Ok(table)
    }

    /// Write `<prefix>_universe.<ext>` and `<prefix>_cohort.<ext>` into `dir`.
    ///
    /// Returns the written paths.
    pub fn write_artifacts(&self, dir: &Path, format: ExportFormat) -> Result<Vec<PathBuf>, ExportError> {
        std::fs::create_dir_all(dir)?;
        let prefix = self.file_prefix();

        let mut written = Vec::with_capacity(2);
        for (suffix, table) in [
            ("universe", self.universe_table()?),
            ("cohort", self.cohort_table()?),
        ] {
            let path = artifact_path(dir, &prefix, suffix, format);
            table.export_to_file(&path, format)?;
            tracing::info!(path = %path.display(), rows = table.len(), "wrote report");
            written.push(path);
        }
        Ok(written)
    }
}

/// Column schema for `methodology`'s report tables.
pub fn schema(methodology: Methodology) -> Schema {
    let mut schema = Schema::new()
        .column("Ticker", ColumnKind::Text)
        .column("Company Name", ColumnKind::Text)
        .column("Price", ColumnKind::Currency);

    match methodology {
        Methodology::Momentum => {
            for horizon in Horizon::ALL {
                schema = schema
                    .column(format!("{} Price Return", horizon.label()), ColumnKind::Percentage)
                    .column(format!("{} Return Percentile", horizon.label()), ColumnKind::Percentage);
            }
        }
        Methodology::Value => {
            for dimension in ValueFactor::default().dimensions() {
                schema = schema
                    .column(dimension, ColumnKind::Decimal)
                    .column(format!("{dimension} Percentile"), ColumnKind::Percentage);
            }
        }
        Methodology::EqualWeight => {
            schema = schema.column("Market Capitalization", ColumnKind::Currency);
        }
    }

    if let Some(label) = methodology.info().score_label {
        schema = schema.column(label, ColumnKind::Percentage);
    }
    schema.column("Number of Shares to Buy", ColumnKind::Integer)
}

fn row(record: &SecurityRecord, scored: bool, shares: Option<u64>) -> Vec<Cell> {
    let mut cells: Vec<Cell> = vec![
        record.ticker.clone().into(),
        record.company_name.clone().into(),
        record.price.into(),
    ];

    let percentiles = record.scores.map(|s| s.percentiles);
    let percentile = |i: usize| Cell::from(percentiles.map(|p| p[i]));

    if let Some(returns) = record.returns() {
        for (i, value) in returns.as_array().into_iter().enumerate() {
            cells.push(value.into());
            cells.push(percentile(i));
        }
    } else if let Some(ratios) = record.valuation() {
        for (i, value) in ratios.as_array().into_iter().enumerate() {
            cells.push(value.into());
            cells.push(percentile(i));
        }
    } else if let Some(cap) = record.market_cap() {
        cells.push(cap.into());
    }

    if scored {
        cells.push(record.composite_score().into());
    }
    cells.push(shares.into());
    cells
}
