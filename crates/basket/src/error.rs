//! Error types for screen runs.

use basket_data::DataError;
use basket_factors::FactorError;
use basket_output::ExportError;
use basket_portfolio::AllocationError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for screen runs.
pub type Result<T> = std::result::Result<T, BasketError>;

/// Errors that abort a screen run.
///
/// Per-ticker fetch failures never show up here; they are reported in
/// [`FetchStats`](crate::FetchStats).
#[derive(Debug, Error)]
pub enum BasketError {
    /// The universe file could not be opened.
    #[error("Cannot read universe file {}: {source}", path.display())]
    UniverseFile {
        /// File that was requested
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The universe file is not valid CSV or lacks a `Symbol` column.
    #[error("Invalid universe CSV: {0}")]
    UniverseCsv(#[from] csv::Error),

    /// The universe source produced no usable tickers.
    #[error("Universe {0} has no members")]
    EmptyUniverse(String),

    /// Market data setup failed.
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Factor configuration is invalid.
    #[error("Factor error: {0}")]
    Factor(#[from] FactorError),

    /// Allocation precondition violated.
    #[error("Allocation error: {0}")]
    Allocation(#[from] AllocationError),

    /// A report could not be built or written.
    #[error("Render error: {0}")]
    Render(#[from] ExportError),
}
