//! Error types for moment estimation.

use thiserror::Error;

/// Result type for moment estimation.
pub type Result<T> = std::result::Result<T, StatisticsError>;

/// Errors that can occur while computing means and covariances.
#[derive(Debug, Error)]
pub enum StatisticsError {
    /// Too few complete observations for a sample covariance.
    #[error("Degenerate statistics: need at least {required} complete observations, got {actual}")]
    Degenerate {
        /// Required number of observations
        required: usize,
        /// Observations left after removing incomplete rows
        actual: usize,
    },

    /// Every column was empty.
    #[error("No usable symbols: every column is missing data")]
    NoUsableSymbols,

    /// Shapes that should agree do not.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl StatisticsError {
    /// Whether the input had too little data to estimate anything.
    pub const fn is_degenerate(&self) -> bool {
        matches!(self, Self::Degenerate { .. } | Self::NoUsableSymbols)
    }
}
