#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/basket/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod fetcher;
pub mod provider;
pub mod snapshot;
pub mod yahoo;

pub use error::{DataError, Result};
pub use fetcher::{
    FetchConfig, FetchObserver, FetchOutcome, MetricDetail, MetricFetcher, MetricSet, RawMetrics,
    TracingObserver,
};
pub use provider::{MarketDataProvider, Valuation};
pub use snapshot::{RecordingProvider, SnapshotEntry, SnapshotProvider};
pub use yahoo::YahooProvider;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
