//! Momentum factor - measures of trend persistence
//!
//! Ranks securities by price return over one year, six months, three months
//! and one month. Each horizon is converted to a cross-sectional percentile
//! and the composite ("HQM score") is their mean. Higher is better.

pub mod composite;

pub use composite::{MomentumConfig, MomentumFactor};
