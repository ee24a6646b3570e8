//! Error types for factor scoring.

use thiserror::Error;

/// Errors raised while configuring or running a factor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FactorError {
    /// Composite weights are unusable.
    #[error("Invalid composite weights {weights:?}: {reason}")]
    InvalidWeights {
        /// Weights that were supplied
        weights: [f64; 4],
        /// Why they were rejected
        reason: &'static str,
    },

    /// A cross-section input does not line up with the records it scores.
    #[error("Expected {expected} inputs, got {actual}")]
    LengthMismatch {
        /// Number of records
        expected: usize,
        /// Number of usable inputs
        actual: usize,
    },

    /// No methodology with this name exists.
    #[error("Unknown methodology: {0}")]
    UnknownMethodology(String),
}
