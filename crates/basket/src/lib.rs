#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/basket/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod record;
pub mod report;
pub mod screen;
pub mod universe;

// Re-export main types from sub-crates
pub use basket_data as data;
pub use basket_factors as factors;
pub use basket_output as output;
pub use basket_portfolio as portfolio;

pub use error::{BasketError, Result};
pub use record::{RawFactors, SecurityRecord};
pub use report::{FetchStats, RunReport, SkippedTicker};
pub use screen::{Screen, ScreenConfig, metric_set};
pub use universe::{Constituent, CsvUniverse, SP500Universe, Universe, UniverseSource};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
