//! Covariance estimation
//!
//! Estimates the symbol-by-symbol covariance matrix of a price panel whose
//! rows are observations (dates) and whose columns are symbols.

pub mod sample;
pub mod utils;

pub use sample::SampleCovarianceEstimator;
pub use utils::{column_means, correlation_from_covariance};

use crate::error::Result;
use ndarray::Array2;

/// Trait for covariance matrix estimators
pub trait CovarianceEstimator {
    /// Estimate the covariance matrix
    ///
    /// # Arguments
    /// * `observations` - Matrix where each row is a date and each column is a symbol.
    ///   Every value must be finite.
    ///
    /// # Returns
    /// * Estimated covariance matrix (N x N where N is the number of columns), in
    ///   input column order
    fn estimate(&self, observations: &Array2<f64>) -> Result<Array2<f64>>;
}
