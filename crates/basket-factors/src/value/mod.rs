//! Value factor - measures of relative cheapness
//!
//! Ranks securities by price-to-earnings, price-to-book, EV/EBITDA and
//! EV/gross profit. Each multiple is converted to a cross-sectional
//! percentile and the composite ("RV score") is their mean. Lower is better.

pub mod composite;

pub use composite::{MissingPolicy, ValuationRatios, ValueConfig, ValueFactor};
