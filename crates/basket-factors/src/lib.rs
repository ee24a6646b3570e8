#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/basket/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod composite;
pub mod error;
pub mod methodology;
pub mod momentum;
pub mod percentile;
pub mod returns;
pub mod selection;
pub mod traits;
pub mod value;

pub use composite::CompositeWeights;
pub use error::FactorError;
pub use methodology::{Methodology, MethodologyInfo};
pub use momentum::{MomentumConfig, MomentumFactor};
pub use percentile::{fill_invalid, percentile_ranks};
pub use returns::{Horizon, HorizonReturns, fractional_return};
pub use selection::{Ranked, SelectionConfig, rank, select_top};
pub use traits::{CompositeFactor, FactorScores, RankOrder};
pub use value::{MissingPolicy, ValuationRatios, ValueConfig, ValueFactor};
